//! Drawing tools: gesture to annotation.

use super::*;
use crate::controller::InteractionState;
use crate::model::{AnnotationShape, AnnotationTool, ColorRole, Point};
use crate::zoom_math::ViewTransform;

#[test]
fn test_arrow_drag_creates_one_arrow_and_returns_to_select() {
    let mut editor = editor();
    editor.set_tool(AnnotationTool::Arrow);

    let effects = drag(&mut editor, (0.0, 0.0), (100.0, 50.0));

    assert_eq!(editor.annotation_count(), 1);
    let arrow = &editor.annotations()[0];
    assert_eq!(
        arrow.shape,
        AnnotationShape::Arrow {
            start: Point::new(0.0, 0.0),
            end: Point::new(100.0, 50.0),
        }
    );
    assert_eq!(arrow.role, ColorRole::Primary);
    assert_eq!(editor.tool(), AnnotationTool::Select);
    assert!(editor.state().is_idle());
    assert!(effects.contains(&Effect::Created(arrow.id)));
    assert!(effects.contains(&Effect::ToolChanged(AnnotationTool::Select)));
}

#[test]
fn test_rect_drawn_up_and_left_is_normalized() {
    let mut editor = editor();
    editor.set_tool(AnnotationTool::Rect);
    drag(&mut editor, (50.0, 50.0), (10.0, 20.0));

    match &editor.annotations()[0].shape {
        AnnotationShape::Rect {
            position,
            width,
            height,
            ..
        } => {
            assert_eq!(*position, Point::new(10.0, 20.0));
            assert!(approx_eq(*width, 40.0));
            assert!(approx_eq(*height, 30.0));
        }
        other => panic!("Expected rect, got {:?}", other),
    }
}

#[test]
fn test_circle_radius_is_drag_distance() {
    let mut editor = editor();
    editor.set_tool(AnnotationTool::Circle);
    drag(&mut editor, (10.0, 10.0), (40.0, 50.0));

    match &editor.annotations()[0].shape {
        AnnotationShape::Circle { center, radius, .. } => {
            assert_eq!(*center, Point::new(10.0, 10.0));
            assert!(approx_eq(*radius, 50.0));
        }
        other => panic!("Expected circle, got {:?}", other),
    }
}

#[test]
fn test_short_gestures_are_clicks() {
    for tool in [
        AnnotationTool::Arrow,
        AnnotationTool::Line,
        AnnotationTool::Rect,
        AnnotationTool::Circle,
    ] {
        let mut editor = editor();
        editor.set_tool(tool);

        drag(&mut editor, (0.0, 0.0), (6.0, 7.9));
        assert_eq!(editor.annotation_count(), 0, "{} created on a click", tool.name());
        assert_eq!(editor.tool(), tool);
        assert!(editor.state().is_idle());

        drag(&mut editor, (0.0, 0.0), (6.0, 8.0));
        assert_eq!(editor.annotation_count(), 1, "{} not created", tool.name());
    }
}

#[test]
fn test_text_tool_places_placeholder_on_press() {
    let mut editor = editor();
    editor.set_tool(AnnotationTool::Text);

    let effects = pointer_down(&mut editor, 30.0, 40.0);

    assert_eq!(editor.annotation_count(), 1);
    let text = &editor.annotations()[0];
    match &text.shape {
        AnnotationShape::Text { position, text, .. } => {
            assert_eq!(*position, Point::new(30.0, 40.0));
            assert_eq!(text, "Text");
        }
        other => panic!("Expected text, got {:?}", other),
    }
    assert_eq!(text.role, ColorRole::Text);
    assert!(editor.state().is_idle());
    assert_eq!(editor.tool(), AnnotationTool::Select);
    assert_eq!(editor.selected(), None);
    assert!(effects.contains(&Effect::Created(text.id)));

    pointer_up(&mut editor, 30.0, 40.0);
    assert_eq!(editor.annotation_count(), 1);
}

#[test]
fn test_preview_follows_pointer_and_disappears_on_release() {
    let mut editor = editor();
    editor.set_tool(AnnotationTool::Line);

    pointer_down(&mut editor, 0.0, 0.0);
    let effects = pointer_move(&mut editor, 40.0, 0.0);
    assert_eq!(effects, vec![Effect::Redraw]);
    assert_eq!(
        *editor.state(),
        InteractionState::Drawing {
            tool: AnnotationTool::Line,
            start: Point::new(0.0, 0.0),
            current: Point::new(40.0, 0.0),
        }
    );
    assert!(editor.render().has_preview());

    pointer_up(&mut editor, 40.0, 0.0);
    assert!(!editor.render().has_preview());
}

#[test]
fn test_escape_cancels_draw() {
    let mut editor = editor();
    editor.set_tool(AnnotationTool::Rect);
    pointer_down(&mut editor, 0.0, 0.0);
    pointer_move(&mut editor, 80.0, 80.0);

    press(&mut editor, Key::Escape);
    pointer_up(&mut editor, 80.0, 80.0);

    assert_eq!(editor.annotation_count(), 0);
    assert!(editor.state().is_idle());
}

#[test]
fn test_switching_tool_cancels_draw() {
    let mut editor = editor();
    editor.set_tool(AnnotationTool::Rect);
    pointer_down(&mut editor, 0.0, 0.0);
    pointer_move(&mut editor, 80.0, 80.0);

    editor.set_tool(AnnotationTool::Circle);
    pointer_up(&mut editor, 80.0, 80.0);

    assert_eq!(editor.annotation_count(), 0);
    assert_eq!(editor.tool(), AnnotationTool::Circle);
}

#[test]
fn test_events_without_container_are_dropped() {
    let mut editor = AnnotationEditor::default();
    editor.set_tool(AnnotationTool::Text);

    let effects = editor.handle_event(InputEvent::PointerDown { x: 10.0, y: 10.0 });

    assert!(effects.is_empty());
    assert_eq!(editor.annotation_count(), 0);
    assert_eq!(editor.tool(), AnnotationTool::Text);
}

#[test]
fn test_draw_threshold_is_in_canvas_units() {
    let mut editor = editor();
    editor.set_view(ViewTransform::new(Point::default(), 2.0));
    editor.set_tool(AnnotationTool::Line);

    // 16 client pixels at 2x zoom is 8 canvas units.
    editor.handle_event(InputEvent::PointerDown {
        x: ORIGIN.0,
        y: ORIGIN.1,
    });
    editor.handle_event(InputEvent::PointerUp {
        x: ORIGIN.0 + 16.0,
        y: ORIGIN.1,
    });
    assert_eq!(editor.annotation_count(), 0);

    editor.handle_event(InputEvent::PointerDown {
        x: ORIGIN.0,
        y: ORIGIN.1,
    });
    editor.handle_event(InputEvent::PointerUp {
        x: ORIGIN.0 + 40.0,
        y: ORIGIN.1,
    });
    assert_eq!(editor.annotation_count(), 1);
    assert_eq!(
        editor.annotations()[0].shape,
        AnnotationShape::Line {
            start: Point::new(0.0, 0.0),
            end: Point::new(20.0, 0.0),
        }
    );
}
