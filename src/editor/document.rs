//! Store operations that are recorded in the undo history.

use crate::model::{Annotation, AnnotationDraft, AnnotationId, AnnotationPatch};
use crate::store::AnnotationStore;
use crate::undo::{Command, UndoStack};

/// The annotation collection together with its edit history.
///
/// Every user-visible mutation goes through one of these methods so it
/// becomes exactly one undo step.
#[derive(Debug, Default)]
pub struct Document {
    pub store: AnnotationStore,
    pub history: UndoStack,
}

impl Document {
    pub fn new(store: AnnotationStore, history: UndoStack) -> Self {
        Self { store, history }
    }

    pub fn create(&mut self, draft: AnnotationDraft) -> AnnotationId {
        let id = self.store.create(draft);
        if let (Some(index), Some(annotation)) = (self.store.index_of(id), self.store.get(id)) {
            self.history.push(Command::Create {
                index,
                annotation: annotation.clone(),
            });
        }
        id
    }

    /// Apply a patch as a single undo step. Returns `true` if anything changed.
    pub fn modify(&mut self, id: AnnotationId, patch: &AnnotationPatch) -> bool {
        let Some(before) = self.store.get(id).cloned() else {
            return false;
        };
        self.store.update(id, patch);
        match self.store.get(id) {
            Some(after) if *after != before => {
                let after = after.clone();
                self.history.push(Command::Modify { before, after });
                true
            }
            _ => false,
        }
    }

    /// Record a change that was already applied incrementally (a drag gesture).
    pub fn record_modify(&mut self, before: Annotation, after: Annotation) {
        if before != after {
            self.history.push(Command::Modify { before, after });
        }
    }

    pub fn delete(&mut self, id: AnnotationId) -> bool {
        match self.store.delete(id) {
            Some((index, annotation)) => {
                self.history.push(Command::Delete { index, annotation });
                true
            }
            None => false,
        }
    }

    /// Remove all annotations. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let annotations = self.store.clear();
        let count = annotations.len();
        if count > 0 {
            self.history.push(Command::Clear { annotations });
        }
        count
    }

    /// Duplicate the annotation with `id`, returning the copy's id.
    pub fn duplicate(&mut self, id: AnnotationId) -> Option<AnnotationId> {
        let source = self.store.get(id)?.clone();
        let copy = self.store.duplicate(&source);
        let index = self.store.index_of(copy.id)?;
        let copy_id = copy.id;
        self.history.push(Command::Create {
            index,
            annotation: copy,
        });
        Some(copy_id)
    }

    /// Undo the most recent command. Returns `false` if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.pop_undo() {
            Some(command) => {
                command.undo(&mut self.store);
                true
            }
            None => false,
        }
    }

    /// Redo the most recently undone command.
    pub fn redo(&mut self) -> bool {
        match self.history.pop_redo() {
            Some(command) => {
                command.redo(&mut self.store);
                true
            }
            None => false,
        }
    }
}
