//! Customizable tool hotkeys.
//!
//! Single keys without modifiers switch the active annotation tool. Bindings
//! are stored in the configuration file and can be changed from the settings UI.

use serde::{Deserialize, Serialize};

use crate::event::Key;
use crate::model::AnnotationTool;

/// Keybinding configuration for the annotation tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Hotkey for Select tool
    pub tool_select: Key,
    /// Hotkey for Arrow tool
    pub tool_arrow: Key,
    /// Hotkey for Text tool
    pub tool_text: Key,
    /// Hotkey for Rect tool
    pub tool_rect: Key,
    /// Hotkey for Circle tool
    pub tool_circle: Key,
    /// Hotkey for Line tool
    pub tool_line: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            tool_select: Key::Char('v'),
            tool_arrow: Key::Char('a'),
            tool_text: Key::Char('t'),
            tool_rect: Key::Char('r'),
            tool_circle: Key::Char('c'),
            tool_line: Key::Char('l'),
        }
    }
}

/// Character keys compare case-insensitively so Shift/CapsLock don't matter.
fn same_key(a: Key, b: Key) -> bool {
    match (a, b) {
        (Key::Char(x), Key::Char(y)) => x.eq_ignore_ascii_case(&y),
        _ => a == b,
    }
}

impl KeyBindings {
    /// Create new keybindings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the tool that corresponds to a key press, if any.
    pub fn tool_for_key(&self, key: Key) -> Option<AnnotationTool> {
        AnnotationTool::all()
            .iter()
            .copied()
            .find(|tool| same_key(self.key_for_tool(*tool), key))
    }

    /// Get the hotkey for a specific tool.
    pub fn key_for_tool(&self, tool: AnnotationTool) -> Key {
        match tool {
            AnnotationTool::Select => self.tool_select,
            AnnotationTool::Arrow => self.tool_arrow,
            AnnotationTool::Text => self.tool_text,
            AnnotationTool::Rect => self.tool_rect,
            AnnotationTool::Circle => self.tool_circle,
            AnnotationTool::Line => self.tool_line,
        }
    }

    /// Set the hotkey for a tool.
    pub fn set_tool_key(&mut self, tool: AnnotationTool, key: Key) {
        match tool {
            AnnotationTool::Select => self.tool_select = key,
            AnnotationTool::Arrow => self.tool_arrow = key,
            AnnotationTool::Text => self.tool_text = key,
            AnnotationTool::Rect => self.tool_rect = key,
            AnnotationTool::Circle => self.tool_circle = key,
            AnnotationTool::Line => self.tool_line = key,
        }
    }

    /// The tool other than `exclude_tool` that already uses `key`, if any.
    pub fn key_conflict(&self, key: Key, exclude_tool: Option<AnnotationTool>) -> Option<AnnotationTool> {
        AnnotationTool::all()
            .iter()
            .copied()
            .filter(|tool| Some(*tool) != exclude_tool)
            .find(|tool| same_key(self.key_for_tool(*tool), key))
    }

    /// Bind `key` to `tool` unless another tool already uses it.
    pub fn try_set_tool_key(&mut self, tool: AnnotationTool, key: Key) -> Result<(), KeyBindingError> {
        if let Some(other) = self.key_conflict(key, Some(tool)) {
            return Err(KeyBindingError::Conflict {
                key: key_to_string(key),
                used_by: other.name(),
            });
        }
        self.set_tool_key(tool, key);
        Ok(())
    }
}

/// Error from rebinding a tool hotkey.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyBindingError {
    /// The key already switches to another tool
    #[error("{key} is already used by the {used_by} tool")]
    Conflict { key: String, used_by: &'static str },
}

/// Convert a Key to a display string.
pub fn key_to_string(key: Key) -> String {
    match key {
        Key::Char(c) => c.to_uppercase().to_string(),
        Key::Enter => "Enter".to_string(),
        Key::Escape => "Esc".to_string(),
        Key::Backspace => "Backspace".to_string(),
        Key::Delete => "Del".to_string(),
        Key::Tab => "Tab".to_string(),
        Key::Space => "Space".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings_cover_every_tool() {
        let bindings = KeyBindings::default();
        for tool in AnnotationTool::all() {
            let key = bindings.key_for_tool(*tool);
            assert_eq!(bindings.tool_for_key(key), Some(*tool));
        }
    }

    #[test]
    fn test_lookup_ignores_case() {
        let bindings = KeyBindings::default();
        assert_eq!(
            bindings.tool_for_key(Key::Char('R')),
            Some(AnnotationTool::Rect)
        );
        assert_eq!(bindings.tool_for_key(Key::Char('z')), None);
    }

    #[test]
    fn test_key_conflict() {
        let mut bindings = KeyBindings::default();
        assert_eq!(
            bindings.key_conflict(Key::Char('r'), None),
            Some(AnnotationTool::Rect)
        );
        assert_eq!(
            bindings.key_conflict(Key::Char('r'), Some(AnnotationTool::Rect)),
            None
        );

        bindings.set_tool_key(AnnotationTool::Rect, Key::Char('b'));
        assert_eq!(bindings.key_conflict(Key::Char('r'), None), None);
        assert_eq!(
            bindings.tool_for_key(Key::Char('b')),
            Some(AnnotationTool::Rect)
        );
    }

    #[test]
    fn test_try_set_tool_key_rejects_conflicts() {
        let mut bindings = KeyBindings::default();
        assert_eq!(
            bindings.try_set_tool_key(AnnotationTool::Line, Key::Char('A')),
            Err(KeyBindingError::Conflict {
                key: "A".to_string(),
                used_by: "Arrow",
            })
        );
        assert_eq!(bindings.tool_line, Key::Char('l'));

        // Rebinding a tool to its own key is fine.
        assert!(bindings.try_set_tool_key(AnnotationTool::Line, Key::Char('L')).is_ok());
        assert!(bindings.try_set_tool_key(AnnotationTool::Line, Key::Char('n')).is_ok());
        assert_eq!(bindings.tool_for_key(Key::Char('n')), Some(AnnotationTool::Line));
    }

    #[test]
    fn test_key_to_string() {
        assert_eq!(key_to_string(Key::Char('v')), "V");
        assert_eq!(key_to_string(Key::Escape), "Esc");
    }
}
