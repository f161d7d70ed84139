//! Scenario tests for the annotation editor.
//!
//! These tests drive [`AnnotationEditor`] purely through client-space input
//! events, the way a host would, and check the resulting annotations.

mod drag_tests;
mod drawing_tests;
mod text_edit_tests;

use super::AnnotationEditor;
use crate::event::{Effect, InputEvent, Key, Modifiers};
use crate::geometry::ContainerRect;

/// Client position of the canvas origin in the editor built by [`editor`]:
/// container offset (100, 50) plus half its 800x600 size.
const ORIGIN: (f32, f32) = (500.0, 350.0);

const EPSILON: f32 = 0.001;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// Editor with a measured container and the identity view.
fn editor() -> AnnotationEditor {
    let mut editor = AnnotationEditor::default();
    editor.set_container(Some(ContainerRect::new(100.0, 50.0, 800.0, 600.0)));
    editor
}

// Helpers below take canvas coordinates and send client coordinates.

fn pointer_down(editor: &mut AnnotationEditor, x: f32, y: f32) -> Vec<Effect> {
    editor.handle_event(InputEvent::PointerDown {
        x: x + ORIGIN.0,
        y: y + ORIGIN.1,
    })
}

fn pointer_move(editor: &mut AnnotationEditor, x: f32, y: f32) -> Vec<Effect> {
    editor.handle_event(InputEvent::PointerMove {
        x: x + ORIGIN.0,
        y: y + ORIGIN.1,
    })
}

fn pointer_up(editor: &mut AnnotationEditor, x: f32, y: f32) -> Vec<Effect> {
    editor.handle_event(InputEvent::PointerUp {
        x: x + ORIGIN.0,
        y: y + ORIGIN.1,
    })
}

fn double_click(editor: &mut AnnotationEditor, x: f32, y: f32) -> Vec<Effect> {
    editor.handle_event(InputEvent::DoubleClick {
        x: x + ORIGIN.0,
        y: y + ORIGIN.1,
    })
}

fn click(editor: &mut AnnotationEditor, x: f32, y: f32) -> Vec<Effect> {
    let mut effects = pointer_down(editor, x, y);
    effects.extend(pointer_up(editor, x, y));
    effects
}

/// Press at `from`, move in two steps to `to`, release.
fn drag(editor: &mut AnnotationEditor, from: (f32, f32), to: (f32, f32)) -> Vec<Effect> {
    let mid = ((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0);
    let mut effects = pointer_down(editor, from.0, from.1);
    effects.extend(pointer_move(editor, mid.0, mid.1));
    effects.extend(pointer_move(editor, to.0, to.1));
    effects.extend(pointer_up(editor, to.0, to.1));
    effects
}

fn press(editor: &mut AnnotationEditor, key: Key) -> Vec<Effect> {
    press_with(editor, key, Modifiers::default())
}

fn press_with(editor: &mut AnnotationEditor, key: Key, modifiers: Modifiers) -> Vec<Effect> {
    editor.handle_event(InputEvent::KeyDown { key, modifiers })
}

fn ctrl() -> Modifiers {
    Modifiers {
        ctrl: true,
        ..Default::default()
    }
}
