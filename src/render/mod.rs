//! Overlay rendering.
//!
//! [`render_overlay`] is a pure mapping from editor state to a flat list of
//! [`OverlayElement`]s in canvas coordinates. Hosts either draw the elements
//! themselves or serialize them with [`to_svg`].

mod svg;
mod toolbar;

pub use svg::{SvgOptions, to_svg};
pub use toolbar::{ContextToolbar, ToolbarControl, context_toolbar};

use serde::Serialize;

use crate::constants::{
    ARROW_HEAD_ANGLE, ARROW_HEAD_LENGTH, CENTER_DOT_RADIUS, HANDLE_RADIUS, PREVIEW_DASH,
    PREVIEW_OPACITY, RECT_CORNER_RADIUS,
};
use crate::controller::{InteractionState, TextEdit};
use crate::handles::{HandleKind, center_marker, handles_for};
use crate::model::{
    Annotation, AnnotationId, AnnotationShape, AnnotationTool, FontWeight, Point, ToolStyle,
};
use crate::zoom_math::ViewTransform;

/// Outline style of a rendered shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeStyle {
    pub color: String,
    pub width: f32,
    /// SVG dash pattern; set on draw previews.
    pub dash: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FillStyle {
    pub color: String,
    pub opacity: f32,
}

/// One drawable primitive of the overlay.
///
/// `annotation` is `None` for the draw preview, which has no record yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum OverlayElement {
    Line {
        annotation: Option<AnnotationId>,
        from: Point,
        to: Point,
        stroke: StrokeStyle,
        opacity: f32,
    },
    /// Filled triangle at the end of an arrow; `points[0]` is the tip.
    ArrowHead {
        annotation: Option<AnnotationId>,
        points: [Point; 3],
        color: String,
        opacity: f32,
    },
    Rect {
        annotation: Option<AnnotationId>,
        position: Point,
        width: f32,
        height: f32,
        corner_radius: f32,
        stroke: StrokeStyle,
        fill: FillStyle,
        opacity: f32,
    },
    Circle {
        annotation: Option<AnnotationId>,
        center: Point,
        radius: f32,
        stroke: StrokeStyle,
        fill: FillStyle,
        opacity: f32,
    },
    /// Text centered on `position`.
    Label {
        annotation: Option<AnnotationId>,
        position: Point,
        text: String,
        color: String,
        font_size: f32,
        font_weight: FontWeight,
        font_family: Option<String>,
        opacity: f32,
    },
    /// Inline edit field replacing the label of the text being edited.
    TextEditor {
        annotation: AnnotationId,
        position: Point,
        value: String,
        color: String,
        font_size: f32,
        font_weight: FontWeight,
        font_family: Option<String>,
    },
    /// Interactive grip; `radius` is in canvas units.
    Handle {
        annotation: AnnotationId,
        handle: HandleKind,
        center: Point,
        radius: f32,
    },
    CenterDot {
        annotation: AnnotationId,
        center: Point,
        radius: f32,
    },
}

/// Everything the overlay is a function of.
#[derive(Debug, Clone, Copy)]
pub struct OverlayInput<'a> {
    pub annotations: &'a [Annotation],
    pub selected: Option<AnnotationId>,
    pub tool: AnnotationTool,
    pub state: &'a InteractionState,
    pub edit: Option<&'a TextEdit>,
    pub style: &'a ToolStyle,
    pub view: &'a ViewTransform,
}

/// Rendered overlay: primitives in paint order plus the optional toolbar.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    pub elements: Vec<OverlayElement>,
    pub toolbar: Option<ContextToolbar>,
}

impl Overlay {
    /// Whether a dashed draw preview is part of the overlay.
    pub fn has_preview(&self) -> bool {
        self.elements
            .iter()
            .any(|element| element.annotation().is_none())
    }
}

impl OverlayElement {
    pub fn annotation(&self) -> Option<AnnotationId> {
        match self {
            OverlayElement::Line { annotation, .. }
            | OverlayElement::ArrowHead { annotation, .. }
            | OverlayElement::Rect { annotation, .. }
            | OverlayElement::Circle { annotation, .. }
            | OverlayElement::Label { annotation, .. } => *annotation,
            OverlayElement::TextEditor { annotation, .. }
            | OverlayElement::Handle { annotation, .. }
            | OverlayElement::CenterDot { annotation, .. } => Some(*annotation),
        }
    }
}

/// Paint settings shared by every primitive of one shape.
struct Paint<'a> {
    id: Option<AnnotationId>,
    color: &'a str,
    stroke_width: f32,
    opacity: f32,
    dash: Option<&'static str>,
}

impl Paint<'_> {
    fn stroke(&self) -> StrokeStyle {
        StrokeStyle {
            color: self.color.to_string(),
            width: self.stroke_width,
            dash: self.dash,
        }
    }
}

/// Triangle for an arrowhead at `end`, pointing along `start -> end`.
pub fn arrow_head(start: &Point, end: &Point) -> [Point; 3] {
    let angle = (end.y - start.y).atan2(end.x - start.x);
    let wing = |offset: f32| {
        Point::new(
            end.x - ARROW_HEAD_LENGTH * (angle + offset).cos(),
            end.y - ARROW_HEAD_LENGTH * (angle + offset).sin(),
        )
    };
    [*end, wing(-ARROW_HEAD_ANGLE), wing(ARROW_HEAD_ANGLE)]
}

fn push_shape(elements: &mut Vec<OverlayElement>, shape: &AnnotationShape, paint: &Paint<'_>) {
    match shape {
        AnnotationShape::Arrow { start, end } => {
            elements.push(OverlayElement::Line {
                annotation: paint.id,
                from: *start,
                to: *end,
                stroke: paint.stroke(),
                opacity: paint.opacity,
            });
            elements.push(OverlayElement::ArrowHead {
                annotation: paint.id,
                points: arrow_head(start, end),
                color: paint.color.to_string(),
                opacity: paint.opacity,
            });
        }
        AnnotationShape::Line { start, end } => elements.push(OverlayElement::Line {
            annotation: paint.id,
            from: *start,
            to: *end,
            stroke: paint.stroke(),
            opacity: paint.opacity,
        }),
        AnnotationShape::Text {
            position,
            text,
            font_size,
            font_weight,
            font_family,
        } => elements.push(OverlayElement::Label {
            annotation: paint.id,
            position: *position,
            text: text.clone(),
            color: paint.color.to_string(),
            font_size: *font_size,
            font_weight: *font_weight,
            font_family: font_family.clone(),
            opacity: paint.opacity,
        }),
        AnnotationShape::Rect {
            position,
            width,
            height,
            fill,
            opacity,
        } => elements.push(OverlayElement::Rect {
            annotation: paint.id,
            position: *position,
            width: *width,
            height: *height,
            corner_radius: RECT_CORNER_RADIUS,
            stroke: paint.stroke(),
            fill: FillStyle {
                color: fill.clone(),
                opacity: *opacity,
            },
            opacity: paint.opacity,
        }),
        AnnotationShape::Circle {
            center,
            radius,
            fill,
            opacity,
        } => elements.push(OverlayElement::Circle {
            annotation: paint.id,
            center: *center,
            radius: *radius,
            stroke: paint.stroke(),
            fill: FillStyle {
                color: fill.clone(),
                opacity: *opacity,
            },
            opacity: paint.opacity,
        }),
    }
}

/// Build the overlay for the given state.
pub fn render_overlay(input: &OverlayInput<'_>) -> Overlay {
    let mut elements = Vec::with_capacity(input.annotations.len() + 4);
    let editing = input.edit.map(|edit| edit.id);

    for annotation in input.annotations {
        if editing == Some(annotation.id)
            && let (Some(edit), AnnotationShape::Text {
                position,
                font_size,
                font_weight,
                font_family,
                ..
            }) = (input.edit, &annotation.shape)
        {
            elements.push(OverlayElement::TextEditor {
                annotation: annotation.id,
                position: *position,
                value: edit.draft.clone(),
                color: annotation.color.clone(),
                font_size: *font_size,
                font_weight: *font_weight,
                font_family: font_family.clone(),
            });
            continue;
        }
        push_shape(
            &mut elements,
            &annotation.shape,
            &Paint {
                id: Some(annotation.id),
                color: &annotation.color,
                stroke_width: annotation.stroke_width,
                opacity: 1.0,
                dash: None,
            },
        );
    }

    if let InteractionState::Drawing {
        tool,
        start,
        current,
    } = input.state
        && let Some(shape) = tool.build_shape(*start, *current, input.style)
    {
        let draft = input.style.draft(shape);
        push_shape(
            &mut elements,
            &draft.shape,
            &Paint {
                id: None,
                color: &draft.color,
                stroke_width: draft.stroke_width,
                opacity: PREVIEW_OPACITY,
                dash: Some(PREVIEW_DASH),
            },
        );
    }

    let selected = input
        .selected
        .and_then(|id| input.annotations.iter().find(|a| a.id == id));

    if let Some(annotation) = selected
        && editing != Some(annotation.id)
    {
        let radius = input.view.screen_to_canvas_len(HANDLE_RADIUS);
        for handle in handles_for(&annotation.shape) {
            elements.push(OverlayElement::Handle {
                annotation: annotation.id,
                handle: handle.kind,
                center: handle.position,
                radius,
            });
        }
        if let Some(center) = center_marker(&annotation.shape) {
            elements.push(OverlayElement::CenterDot {
                annotation: annotation.id,
                center,
                radius: input.view.screen_to_canvas_len(CENTER_DOT_RADIUS),
            });
        }
    }

    let toolbar = match (selected, input.state) {
        (Some(annotation), InteractionState::Idle) if input.tool == AnnotationTool::Select => {
            Some(context_toolbar(annotation, &input.style.palette, input.view))
        }
        _ => None,
    };

    Overlay { elements, toolbar }
}
