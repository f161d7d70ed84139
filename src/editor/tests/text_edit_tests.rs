//! Inline editing of text annotations.

use super::*;
use crate::model::{AnnotationId, AnnotationShape, AnnotationTool};

fn place_text(editor: &mut AnnotationEditor, x: f32, y: f32) -> AnnotationId {
    editor.set_tool(AnnotationTool::Text);
    click(editor, x, y);
    editor.annotations()[editor.annotation_count() - 1].id
}

fn text_of(editor: &AnnotationEditor, id: AnnotationId) -> Option<String> {
    match editor.get(id).map(|a| &a.shape) {
        Some(AnnotationShape::Text { text, .. }) => Some(text.clone()),
        _ => None,
    }
}

fn type_text(editor: &mut AnnotationEditor, text: &str) -> Vec<Effect> {
    editor.handle_event(InputEvent::EditInput {
        text: text.to_string(),
    })
}

#[test]
fn test_double_click_type_click_elsewhere_commits() {
    let mut editor = editor();
    let id = place_text(&mut editor, 0.0, 0.0);

    click(&mut editor, 0.0, 0.0);
    let effects = double_click(&mut editor, 0.0, 0.0);
    assert!(effects.contains(&Effect::EditStarted(id)));
    assert_eq!(editor.edit().map(|e| e.draft.as_str()), Some("Text"));

    type_text(&mut editor, "Hello");
    // The draft is not written until the edit is committed.
    assert_eq!(text_of(&editor, id).as_deref(), Some("Text"));

    let effects = pointer_down(&mut editor, 200.0, 200.0);
    assert!(effects.contains(&Effect::EditCommitted(id)));
    assert!(effects.contains(&Effect::Updated(id)));
    assert_eq!(text_of(&editor, id).as_deref(), Some("Hello"));
    assert!(editor.edit().is_none());
}

#[test]
fn test_enter_and_blur_commit() {
    let mut editor = editor();
    let id = place_text(&mut editor, 0.0, 0.0);

    double_click(&mut editor, 0.0, 0.0);
    type_text(&mut editor, "First");
    press(&mut editor, Key::Enter);
    assert_eq!(text_of(&editor, id).as_deref(), Some("First"));

    double_click(&mut editor, 0.0, 0.0);
    type_text(&mut editor, "Second");
    editor.handle_event(InputEvent::EditBlur);
    assert_eq!(text_of(&editor, id).as_deref(), Some("Second"));
}

#[test]
fn test_escape_discards_draft() {
    let mut editor = editor();
    let id = place_text(&mut editor, 0.0, 0.0);

    double_click(&mut editor, 0.0, 0.0);
    type_text(&mut editor, "Never mind");
    let effects = press(&mut editor, Key::Escape);

    assert_eq!(effects, vec![Effect::EditCancelled(id)]);
    assert_eq!(text_of(&editor, id).as_deref(), Some("Text"));
    assert!(editor.edit().is_none());
    // Escape only closed the edit; the selection survives.
    assert_eq!(editor.selected(), Some(id));
}

#[test]
fn test_blank_draft_keeps_previous_text() {
    let mut editor = editor();
    let id = place_text(&mut editor, 0.0, 0.0);
    let steps = editor.history().undo_count();

    double_click(&mut editor, 0.0, 0.0);
    type_text(&mut editor, "   ");
    press(&mut editor, Key::Enter);

    assert_eq!(text_of(&editor, id).as_deref(), Some("Text"));
    assert_eq!(editor.history().undo_count(), steps);
}

#[test]
fn test_double_click_on_shape_does_nothing() {
    let mut editor = editor();
    editor.set_tool(AnnotationTool::Line);
    drag(&mut editor, (0.0, 0.0), (100.0, 0.0));

    let effects = double_click(&mut editor, 50.0, 0.0);
    assert!(effects.is_empty());
    assert!(editor.edit().is_none());
}

#[test]
fn test_shortcuts_are_inactive_while_editing() {
    let mut editor = editor();
    let id = place_text(&mut editor, 0.0, 0.0);
    double_click(&mut editor, 0.0, 0.0);

    press(&mut editor, Key::Delete);
    press(&mut editor, Key::Char('r'));
    press_with(&mut editor, Key::Char('d'), ctrl());
    press_with(&mut editor, Key::Char('z'), ctrl());

    assert_eq!(editor.annotation_count(), 1);
    assert!(editor.get(id).is_some());
    assert_eq!(editor.tool(), AnnotationTool::Select);
    assert!(editor.edit().is_some());
}

#[test]
fn test_commit_is_one_undo_step() {
    let mut editor = editor();
    let id = place_text(&mut editor, 0.0, 0.0);

    double_click(&mut editor, 0.0, 0.0);
    type_text(&mut editor, "Changed");
    press(&mut editor, Key::Enter);
    assert_eq!(text_of(&editor, id).as_deref(), Some("Changed"));

    press_with(&mut editor, Key::Char('z'), ctrl());
    assert_eq!(text_of(&editor, id).as_deref(), Some("Text"));
}

#[test]
fn test_selecting_another_annotation_commits_pending_edit() {
    let mut editor = editor();
    let first = place_text(&mut editor, 0.0, 0.0);
    let second = place_text(&mut editor, 0.0, 100.0);

    double_click(&mut editor, 0.0, 0.0);
    type_text(&mut editor, "Kept");
    let effects = editor.select(Some(second));

    assert!(effects.contains(&Effect::EditCommitted(first)));
    assert_eq!(text_of(&editor, first).as_deref(), Some("Kept"));
    assert_eq!(editor.selected(), Some(second));
}

#[test]
fn test_editor_replaces_label_in_render() {
    let mut editor = editor();
    let id = place_text(&mut editor, 0.0, 0.0);
    double_click(&mut editor, 0.0, 0.0);
    type_text(&mut editor, "Live");

    let svg = editor.render_svg(false);
    assert!(svg.contains(r#"data-editing="true""#));
    assert!(svg.contains(">Live</text>"));
    assert!(svg.contains(&format!(r#"data-annotation-id="{}""#, id)));
}

#[test]
fn test_toolbar_undo_closes_edit_and_keeps_shortcuts_live() {
    let mut editor = editor();
    let id = place_text(&mut editor, 0.0, 0.0);
    double_click(&mut editor, 0.0, 0.0);
    type_text(&mut editor, "Draft");

    let effects = editor.undo();
    assert!(effects.contains(&Effect::EditCancelled(id)));
    assert!(editor.edit().is_none());
    assert_eq!(editor.annotation_count(), 0);

    let shift_ctrl = Modifiers {
        shift: true,
        ctrl: true,
        ..Default::default()
    };
    let effects = press_with(&mut editor, Key::Char('Z'), shift_ctrl);
    assert!(effects.contains(&Effect::HistoryApplied));
    assert_eq!(text_of(&editor, id).as_deref(), Some("Text"));

    press(&mut editor, Key::Char('r'));
    assert_eq!(editor.tool(), AnnotationTool::Rect);
}
