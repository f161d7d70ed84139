//! Undo/Redo system for annotation operations.
//!
//! This module implements the Command pattern to enable undo/redo functionality
//! for annotation operations. Each undoable action is represented as a Command
//! that knows how to undo and redo itself against an [`AnnotationStore`].

use crate::constants::UNDO_HISTORY_SIZE;
use crate::model::Annotation;
use crate::store::AnnotationStore;

// ============================================================================
// Command Types
// ============================================================================

/// A command that can be undone and redone.
/// Each command stores enough information to reverse its effect.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Add an annotation
    Create {
        /// Position in the collection the annotation was appended at
        index: usize,
        /// The annotation that was added
        annotation: Annotation,
    },
    /// Remove an annotation
    Delete {
        /// Position the annotation was removed from
        index: usize,
        /// The annotation that was removed (stored for undo)
        annotation: Annotation,
    },
    /// Change an annotation's geometry or style
    Modify {
        /// The record before modification
        before: Annotation,
        /// The record after modification
        after: Annotation,
    },
    /// Clear all annotations
    Clear {
        /// All annotations that were cleared (stored for undo)
        annotations: Vec<Annotation>,
    },
}

impl Command {
    /// Get a human-readable description of this command
    pub fn description(&self) -> String {
        match self {
            Command::Create { annotation, .. } => format!("Add {}", annotation.shape.name()),
            Command::Delete { annotation, .. } => format!("Delete {}", annotation.shape.name()),
            Command::Modify { after, .. } => format!("Edit {}", after.shape.name()),
            Command::Clear { annotations } => {
                format!("Clear {} annotations", annotations.len())
            }
        }
    }

    /// Reverse the effect of this command.
    pub fn undo(&self, store: &mut AnnotationStore) {
        match self {
            Command::Create { annotation, .. } => {
                store.delete(annotation.id);
            }
            Command::Delete { index, annotation } => {
                store.restore(*index, annotation.clone());
            }
            Command::Modify { before, .. } => {
                store.replace(before.clone());
            }
            Command::Clear { annotations } => {
                for (index, annotation) in annotations.iter().enumerate() {
                    store.restore(index, annotation.clone());
                }
            }
        }
    }

    /// Re-apply the effect of this command.
    pub fn redo(&self, store: &mut AnnotationStore) {
        match self {
            Command::Create { index, annotation } => {
                store.restore(*index, annotation.clone());
            }
            Command::Delete { annotation, .. } => {
                store.delete(annotation.id);
            }
            Command::Modify { after, .. } => {
                store.replace(after.clone());
            }
            Command::Clear { .. } => {
                store.clear();
            }
        }
    }
}

// ============================================================================
// Undo Stack
// ============================================================================

/// Configuration for the undo stack
#[derive(Debug, Clone)]
pub struct UndoConfig {
    /// Maximum number of commands to keep in history
    pub max_history: usize,
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self {
            max_history: UNDO_HISTORY_SIZE,
        }
    }
}

/// The undo/redo history stack.
///
/// Maintains two stacks:
/// - `undo_stack`: Commands that can be undone (most recent at the end)
/// - `redo_stack`: Commands that can be redone (most recent at the end)
///
/// When a new command is executed, it's pushed to undo_stack and redo_stack is cleared.
/// When undo is called, the command is moved from undo_stack to redo_stack.
/// When redo is called, the command is moved from redo_stack to undo_stack.
#[derive(Debug, Clone, Default)]
pub struct UndoStack {
    /// Stack of commands that can be undone
    undo_stack: Vec<Command>,
    /// Stack of commands that can be redone
    redo_stack: Vec<Command>,
    /// Configuration
    config: UndoConfig,
}

impl UndoStack {
    /// Create a new empty undo stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration
    pub fn with_config(config: UndoConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Push a command to the undo stack.
    /// This clears the redo stack (can't redo after a new action).
    pub fn push(&mut self, command: Command) {
        log::debug!("Undo: pushed '{}'", command.description());
        self.undo_stack.push(command);
        self.redo_stack.clear();

        // Limit history size
        if self.undo_stack.len() > self.config.max_history {
            let excess = self.undo_stack.len() - self.config.max_history;
            self.undo_stack.drain(..excess);
        }
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Pop a command from the undo stack for undoing.
    /// The command is moved to the redo stack.
    pub fn pop_undo(&mut self) -> Option<Command> {
        let cmd = self.undo_stack.pop()?;
        log::debug!("Undo: '{}'", cmd.description());
        self.redo_stack.push(cmd.clone());
        Some(cmd)
    }

    /// Pop a command from the redo stack for redoing.
    /// The command is moved back to the undo stack.
    pub fn pop_redo(&mut self) -> Option<Command> {
        let cmd = self.redo_stack.pop()?;
        log::debug!("Redo: '{}'", cmd.description());
        self.undo_stack.push(cmd.clone());
        Some(cmd)
    }

    /// Get the description of the command that would be undone
    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.last().map(|c| c.description())
    }

    /// Get the description of the command that would be redone
    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.last().map(|c| c.description())
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        log::debug!("Undo history cleared");
    }

    /// Number of commands that can be undone
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnnotationPatch, AnnotationShape, Point, ToolStyle};

    fn line(x: f32) -> AnnotationShape {
        AnnotationShape::Line {
            start: Point::new(x, 0.0),
            end: Point::new(x + 40.0, 0.0),
        }
    }

    fn create(store: &mut AnnotationStore, x: f32) -> Command {
        let id = store.create(ToolStyle::default().draft(line(x)));
        Command::Create {
            index: store.index_of(id).expect("present"),
            annotation: store.get(id).cloned().expect("present"),
        }
    }

    #[test]
    fn test_push_clears_redo() {
        let mut store = AnnotationStore::new();
        let mut stack = UndoStack::new();
        stack.push(create(&mut store, 0.0));
        stack.pop_undo();
        assert!(stack.can_redo());

        stack.push(create(&mut store, 10.0));
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut store = AnnotationStore::new();
        let mut stack = UndoStack::with_config(UndoConfig { max_history: 3 });
        for i in 0..5 {
            stack.push(create(&mut store, i as f32));
        }
        assert_eq!(stack.undo_count(), 3);
    }

    #[test]
    fn test_create_undo_redo_keeps_id() {
        let mut store = AnnotationStore::new();
        let cmd = create(&mut store, 0.0);
        let Command::Create { annotation, .. } = &cmd else {
            panic!("Expected Create");
        };
        let id = annotation.id;

        cmd.undo(&mut store);
        assert!(store.is_empty());
        cmd.redo(&mut store);
        assert_eq!(store.get(id).map(|a| a.id), Some(id));
    }

    #[test]
    fn test_modify_undo_restores_previous_record() {
        let mut store = AnnotationStore::new();
        let id = store.create(ToolStyle::default().draft(line(0.0)));
        let before = store.get(id).cloned().expect("present");
        store.update(id, &AnnotationPatch::stroke_width(6.0));
        let after = store.get(id).cloned().expect("present");

        let cmd = Command::Modify { before: before.clone(), after: after.clone() };
        cmd.undo(&mut store);
        assert_eq!(store.get(id), Some(&before));
        cmd.redo(&mut store);
        assert_eq!(store.get(id), Some(&after));
    }

    #[test]
    fn test_clear_undo_restores_order() {
        let mut store = AnnotationStore::new();
        create(&mut store, 0.0);
        create(&mut store, 10.0);
        create(&mut store, 20.0);
        let order: Vec<_> = store.iter().map(|a| a.id).collect();

        let cmd = Command::Clear {
            annotations: store.clear(),
        };
        assert!(store.is_empty());

        cmd.undo(&mut store);
        let restored: Vec<_> = store.iter().map(|a| a.id).collect();
        assert_eq!(restored, order);
        assert_eq!(cmd.description(), "Clear 3 annotations");
    }

    #[test]
    fn test_descriptions() {
        let mut store = AnnotationStore::new();
        let mut stack = UndoStack::new();
        assert!(stack.undo_description().is_none());
        stack.push(create(&mut store, 0.0));
        assert_eq!(stack.undo_description().as_deref(), Some("Add line"));
        stack.pop_undo();
        assert_eq!(stack.redo_description().as_deref(), Some("Add line"));
    }
}
