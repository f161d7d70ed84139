//! Input events consumed by the interaction controller and the effects it reports.
//!
//! Events are framework independent: a host translates its DOM (or native)
//! events into [`InputEvent`] values, and recorded sessions can be stored as
//! JSON and replayed.

use serde::{Deserialize, Serialize};

use crate::geometry::ContainerRect;
use crate::model::{AnnotationId, AnnotationTool};
use crate::zoom_math::ViewTransform;

/// Events that drive the annotation overlay.
///
/// Pointer coordinates are in client space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum InputEvent {
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp { x: f32, y: f32 },
    DoubleClick { x: f32, y: f32 },
    KeyDown {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// The inline text field's value changed.
    EditInput { text: String },
    /// The inline text field lost focus.
    EditBlur,
    /// A tool was picked from the toolbar.
    SelectTool { tool: AnnotationTool },
    /// The overlay container was measured (or unmounted with `None`).
    ContainerChanged { rect: Option<ContainerRect> },
    /// The diagram view was panned or zoomed.
    ViewChanged { view: ViewTransform },
}

/// Keyboard keys (simplified set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Delete,
    Tab,
    Space,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Option<Key> {
        match key {
            "Enter" => Some(Key::Enter),
            "Escape" | "Esc" => Some(Key::Escape),
            "Backspace" => Some(Key::Backspace),
            "Delete" | "Del" => Some(Key::Delete),
            "Tab" => Some(Key::Tab),
            " " | "Spacebar" => Some(Key::Space),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Key::Char(c)),
                    _ => None,
                }
            }
        }
    }

    /// Case-insensitive match against a character key.
    pub fn is_char(&self, expected: char) -> bool {
        matches!(self, Key::Char(c) if c.eq_ignore_ascii_case(&expected))
    }
}

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// What an event changed, reported back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Effect {
    Created(AnnotationId),
    Updated(AnnotationId),
    Deleted(AnnotationId),
    Cleared,
    /// The whole collection was replaced from a snapshot holding this many annotations.
    Loaded(usize),
    SelectionChanged(Option<AnnotationId>),
    ToolChanged(AnnotationTool),
    EditStarted(AnnotationId),
    EditCommitted(AnnotationId),
    EditCancelled(AnnotationId),
    /// Undo or redo rewrote the collection.
    HistoryApplied,
    /// Only transient state (such as the draw preview) changed.
    Redraw,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_dom() {
        assert_eq!(Key::from_dom("Escape"), Some(Key::Escape));
        assert_eq!(Key::from_dom("Backspace"), Some(Key::Backspace));
        assert_eq!(Key::from_dom("d"), Some(Key::Char('d')));
        assert_eq!(Key::from_dom("ArrowLeft"), None);
        assert!(Key::Char('D').is_char('d'));
    }

    #[test]
    fn test_events_parse_from_json() {
        let json = r#"[
            {"type": "selectTool", "tool": "rect"},
            {"type": "pointerDown", "x": 10, "y": 20.5},
            {"type": "keyDown", "key": {"char": "d"}, "modifiers": {"ctrl": true}},
            {"type": "keyDown", "key": "escape"},
            {"type": "containerChanged", "rect": {"left": 0, "top": 0, "width": 800, "height": 600}},
            {"type": "editBlur"}
        ]"#;
        let events: Vec<InputEvent> = serde_json::from_str(json).expect("valid events");
        assert_eq!(
            events[0],
            InputEvent::SelectTool {
                tool: AnnotationTool::Rect
            }
        );
        assert_eq!(events[1], InputEvent::PointerDown { x: 10.0, y: 20.5 });
        assert_eq!(
            events[2],
            InputEvent::KeyDown {
                key: Key::Char('d'),
                modifiers: Modifiers {
                    ctrl: true,
                    ..Default::default()
                },
            }
        );
        assert_eq!(
            events[3],
            InputEvent::KeyDown {
                key: Key::Escape,
                modifiers: Modifiers::default(),
            }
        );
        assert_eq!(events[5], InputEvent::EditBlur);
    }

    #[test]
    fn test_command_modifier() {
        let mac = Modifiers {
            meta: true,
            ..Default::default()
        };
        assert!(mac.command());
        assert!(!Modifiers::default().command());
        assert!(!Modifiers::default().any());
    }
}
