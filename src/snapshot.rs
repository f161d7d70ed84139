//! Versioned JSON snapshots of the annotation collection.
//!
//! Hosts use snapshots to persist annotations next to the diagram source or
//! to move them through the clipboard. Selection and history are not part of
//! a snapshot.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::{Annotation, AnnotationId};
use crate::store::AnnotationStore;

/// Current snapshot format version.
/// Increment this when making breaking changes to the annotation format.
pub const SNAPSHOT_VERSION: u32 = 1;

/// The serialized form of an annotation collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    /// Annotations in render order.
    pub annotations: Vec<Annotation>,
}

impl Snapshot {
    pub fn new(annotations: Vec<Annotation>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            annotations,
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate a snapshot.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)?;

        if snapshot.version > SNAPSHOT_VERSION {
            return Err(SnapshotError::VersionTooNew {
                file_version: snapshot.version,
                supported_version: SNAPSHOT_VERSION,
            });
        }

        let mut seen = HashSet::with_capacity(snapshot.annotations.len());
        for annotation in &snapshot.annotations {
            if annotation.id > AnnotationId::MAX {
                return Err(SnapshotError::IdOutOfRange(annotation.id));
            }
            if !seen.insert(annotation.id) {
                return Err(SnapshotError::DuplicateId(annotation.id));
            }
        }

        Ok(snapshot)
    }
}

impl AnnotationStore {
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot::new(self.annotations().to_vec())
    }

    pub fn to_snapshot_json(&self) -> Result<String, SnapshotError> {
        self.to_snapshot().to_json()
    }

    /// Build a fresh store from snapshot JSON.
    pub fn from_snapshot_json(json: &str) -> Result<Self, SnapshotError> {
        let mut store = Self::new();
        store.load_snapshot_json(json)?;
        Ok(store)
    }

    /// Replace the collection with the snapshot's annotations.
    ///
    /// On error the store is left untouched. Returns the number of
    /// annotations loaded.
    pub fn load_snapshot_json(&mut self, json: &str) -> Result<usize, SnapshotError> {
        let snapshot = Snapshot::from_json(json)?;
        let count = snapshot.annotations.len();
        self.replace_all(snapshot.annotations);
        log::info!("Loaded {} annotations from snapshot", count);
        Ok(count)
    }
}

/// Errors that can occur when loading a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// JSON parsing error
    #[error("Failed to parse snapshot: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Snapshot version is newer than supported
    #[error("Snapshot version {file_version} is newer than supported version {supported_version}")]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// Two annotations in the snapshot share an id
    #[error("Duplicate annotation id {0} in snapshot")]
    DuplicateId(AnnotationId),

    /// An id too large for the store's id counter
    #[error("Annotation id {0} in snapshot is out of range")]
    IdOutOfRange(AnnotationId),
}
