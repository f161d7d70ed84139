//! Mermaid Annotate - the annotation layer of a Mermaid diagram editor.
//!
//! Arrows, lines, rectangles, circles and text labels drawn on top of a
//! rendered diagram. The crate holds the annotation data model, the pointer and
//! keyboard state machine, client/canvas coordinate mapping, undo history and
//! an SVG overlay renderer. Hosts feed [`InputEvent`]s into an
//! [`AnnotationEditor`] and redraw from [`AnnotationEditor::render`].

pub mod config;
pub mod constants;
pub mod controller;
pub mod editor;
pub mod event;
pub mod geometry;
pub mod handles;
pub mod keybindings;
pub mod model;
pub mod render;
pub mod snapshot;
pub mod store;
pub mod undo;
pub mod zoom_math;

pub use config::{AppConfig, ConfigError};
pub use editor::AnnotationEditor;
pub use event::{Effect, InputEvent, Key, Modifiers};
pub use model::{Annotation, AnnotationId, AnnotationShape, AnnotationTool, Point};
pub use snapshot::{Snapshot, SnapshotError};
pub use store::AnnotationStore;

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
