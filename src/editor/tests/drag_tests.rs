//! Selecting, moving and resizing with the select tool.

use super::*;
use crate::controller::InteractionState;
use crate::handles::HandleKind;
use crate::model::{AnnotationId, AnnotationShape, AnnotationTool, Point};

fn draw(
    editor: &mut AnnotationEditor,
    tool: AnnotationTool,
    from: (f32, f32),
    to: (f32, f32),
) -> AnnotationId {
    editor.set_tool(tool);
    drag(editor, from, to);
    editor.annotations()[editor.annotation_count() - 1].id
}

#[test]
fn test_press_on_annotation_selects_it() {
    let mut editor = editor();
    let id = draw(&mut editor, AnnotationTool::Line, (0.0, 0.0), (100.0, 0.0));

    let effects = pointer_down(&mut editor, 50.0, 2.0);
    assert_eq!(editor.selected(), Some(id));
    assert!(effects.contains(&Effect::SelectionChanged(Some(id))));
    assert!(matches!(
        editor.state(),
        InteractionState::Dragging { handle: None, .. }
    ));
    pointer_up(&mut editor, 50.0, 2.0);

    let effects = click(&mut editor, 300.0, 300.0);
    assert_eq!(editor.selected(), None);
    assert!(effects.contains(&Effect::SelectionChanged(None)));
}

#[test]
fn test_drag_translates_every_position_field() {
    let mut editor = editor();
    let id = draw(&mut editor, AnnotationTool::Arrow, (0.0, 0.0), (100.0, 50.0));

    let effects = drag(&mut editor, (50.0, 25.0), (80.0, 35.0));

    assert_eq!(
        editor.get(id).map(|a| a.shape.clone()),
        Some(AnnotationShape::Arrow {
            start: Point::new(30.0, 10.0),
            end: Point::new(130.0, 60.0),
        })
    );
    assert!(effects.contains(&Effect::Updated(id)));
    assert!(editor.state().is_idle());
}

#[test]
fn test_grab_offset_is_relative_to_anchor() {
    let mut editor = editor();
    draw(&mut editor, AnnotationTool::Rect, (0.0, 0.0), (40.0, 30.0));

    pointer_down(&mut editor, 25.0, 15.0);
    match editor.state() {
        InteractionState::Dragging { grab_offset, .. } => {
            assert_eq!(*grab_offset, (25.0, 15.0));
        }
        other => panic!("Expected Dragging, got {:?}", other),
    }
}

#[test]
fn test_circle_resize_below_minimum_is_rejected() {
    let mut editor = editor();
    let id = draw(&mut editor, AnnotationTool::Circle, (0.0, 0.0), (15.0, 0.0));
    click(&mut editor, 0.0, 0.0);
    assert_eq!(editor.selected(), Some(id));

    // Radius grip sits at center + (radius, 0).
    pointer_down(&mut editor, 15.0, 0.0);
    assert!(matches!(
        editor.state(),
        InteractionState::Dragging {
            handle: Some(HandleKind::Radius),
            ..
        }
    ));
    pointer_move(&mut editor, 5.0, 0.0);
    pointer_up(&mut editor, 5.0, 0.0);

    match &editor.get(id).map(|a| a.shape.clone()) {
        Some(AnnotationShape::Circle { center, radius, .. }) => {
            assert_eq!(*center, Point::new(0.0, 0.0));
            assert!(approx_eq(*radius, 15.0));
        }
        other => panic!("Expected circle, got {:?}", other),
    }
}

#[test]
fn test_circle_radius_grip_grows_circle() {
    let mut editor = editor();
    let id = draw(&mut editor, AnnotationTool::Circle, (0.0, 0.0), (20.0, 0.0));
    click(&mut editor, 0.0, 0.0);

    drag(&mut editor, (20.0, 0.0), (30.0, 0.0));

    match editor.get(id).map(|a| &a.shape) {
        Some(AnnotationShape::Circle { radius, .. }) => assert!(approx_eq(*radius, 30.0)),
        other => panic!("Expected circle, got {:?}", other),
    }
}

#[test]
fn test_rect_corner_resize_and_floor() {
    let mut editor = editor();
    let id = draw(&mut editor, AnnotationTool::Rect, (0.0, 0.0), (40.0, 30.0));
    click(&mut editor, 20.0, 15.0);

    drag(&mut editor, (40.0, 30.0), (60.0, 50.0));
    let expected = |x: f32, y: f32, w: f32, h: f32| AnnotationShape::Rect {
        position: Point::new(x, y),
        width: w,
        height: h,
        fill: "transparent".to_string(),
        opacity: 1.0,
    };
    assert_eq!(
        editor.get(id).map(|a| a.shape.clone()),
        Some(expected(0.0, 0.0, 60.0, 50.0))
    );

    // Top-left moved in one step to where the width would be 5.
    pointer_down(&mut editor, 0.0, 0.0);
    pointer_move(&mut editor, 55.0, 0.0);
    pointer_up(&mut editor, 55.0, 0.0);
    assert_eq!(
        editor.get(id).map(|a| a.shape.clone()),
        Some(expected(0.0, 0.0, 60.0, 50.0))
    );

    // Exactly the minimum is allowed.
    pointer_down(&mut editor, 0.0, 0.0);
    pointer_move(&mut editor, 50.0, 40.0);
    pointer_up(&mut editor, 50.0, 40.0);
    assert_eq!(
        editor.get(id).map(|a| a.shape.clone()),
        Some(expected(50.0, 40.0, 10.0, 10.0))
    );
}

#[test]
fn test_arrow_end_handle_moves_only_end() {
    let mut editor = editor();
    let id = draw(&mut editor, AnnotationTool::Arrow, (0.0, 0.0), (100.0, 0.0));
    click(&mut editor, 50.0, 0.0);

    drag(&mut editor, (100.0, 0.0), (100.0, 80.0));

    assert_eq!(
        editor.get(id).map(|a| a.shape.clone()),
        Some(AnnotationShape::Arrow {
            start: Point::new(0.0, 0.0),
            end: Point::new(100.0, 80.0),
        })
    );
}

#[test]
fn test_handles_only_work_on_the_selected_annotation() {
    let mut editor = editor();
    let id = draw(&mut editor, AnnotationTool::Line, (0.0, 0.0), (100.0, 0.0));
    assert_eq!(editor.selected(), None);

    // Pressing the unselected line's end point grabs the whole line.
    drag(&mut editor, (100.0, 0.0), (100.0, 20.0));

    assert_eq!(
        editor.get(id).map(|a| a.shape.clone()),
        Some(AnnotationShape::Line {
            start: Point::new(0.0, 20.0),
            end: Point::new(100.0, 20.0),
        })
    );
}

#[test]
fn test_topmost_annotation_wins() {
    let mut editor = editor();
    let bottom = draw(&mut editor, AnnotationTool::Rect, (0.0, 0.0), (100.0, 100.0));
    let top = draw(&mut editor, AnnotationTool::Circle, (50.0, 50.0), (70.0, 50.0));

    click(&mut editor, 50.0, 50.0);
    assert_eq!(editor.selected(), Some(top));

    click(&mut editor, 10.0, 10.0);
    assert_eq!(editor.selected(), Some(bottom));
}

#[test]
fn test_whole_drag_is_one_undo_step() {
    let mut editor = editor();
    let id = draw(&mut editor, AnnotationTool::Line, (0.0, 0.0), (100.0, 0.0));
    let before = editor.get(id).cloned();
    let steps = editor.history().undo_count();

    drag(&mut editor, (50.0, 0.0), (90.0, 40.0));
    assert_eq!(editor.history().undo_count(), steps + 1);

    editor.undo();
    assert_eq!(editor.get(id).cloned(), before);
}

#[test]
fn test_click_without_moving_records_nothing() {
    let mut editor = editor();
    draw(&mut editor, AnnotationTool::Line, (0.0, 0.0), (100.0, 0.0));
    let steps = editor.history().undo_count();

    click(&mut editor, 50.0, 0.0);
    assert_eq!(editor.history().undo_count(), steps);
}

#[test]
fn test_thin_rect_draw_is_floored_and_stays_resizable() {
    let mut editor = editor();
    let id = draw(&mut editor, AnnotationTool::Rect, (0.0, 0.0), (40.0, 2.0));
    click(&mut editor, 20.0, 5.0);
    assert_eq!(editor.selected(), Some(id));

    // Bottom-right grip of the floored 40x10 rect, pulled down in 1-unit steps.
    pointer_down(&mut editor, 40.0, 10.0);
    for step in 1..=30 {
        pointer_move(&mut editor, 40.0, 10.0 + step as f32);
    }
    pointer_up(&mut editor, 40.0, 40.0);

    match editor.get(id).map(|a| &a.shape) {
        Some(AnnotationShape::Rect { width, height, .. }) => {
            assert!(approx_eq(*width, 40.0));
            assert!(approx_eq(*height, 40.0));
        }
        other => panic!("Expected rect, got {:?}", other),
    }
}
