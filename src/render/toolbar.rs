//! Floating context toolbar for the selected annotation.

use serde::Serialize;

use crate::constants::{FONT_FAMILY_OPTIONS, FONT_SIZE_OPTIONS, STROKE_WIDTH_OPTIONS, TOOLBAR_OFFSET};
use crate::model::{Annotation, AnnotationId, AnnotationShape, FontWeight, Palette, Point};
use crate::zoom_math::ViewTransform;

/// A control on the context toolbar, with its current value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "control", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ToolbarControl {
    Color {
        current: String,
        swatches: Vec<String>,
    },
    Duplicate,
    Delete,
    StrokeWidth {
        current: f32,
        options: &'static [f32],
    },
    FontFamily {
        current: Option<String>,
        options: &'static [&'static str],
    },
    FontSize {
        current: f32,
        options: &'static [f32],
    },
    FontWeight {
        current: FontWeight,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextToolbar {
    pub annotation: AnnotationId,
    /// Bottom-center of the toolbar in canvas coordinates.
    pub anchor: Point,
    pub controls: Vec<ToolbarControl>,
}

/// Toolbar for `annotation`, placed a fixed screen distance above its bounds.
///
/// Shapes get a stroke width picker, text gets font controls.
pub fn context_toolbar(
    annotation: &Annotation,
    palette: &Palette,
    view: &ViewTransform,
) -> ContextToolbar {
    let top = annotation.shape.bounds().top_center();
    let anchor = top.offset(0.0, -view.screen_to_canvas_len(TOOLBAR_OFFSET));

    let mut controls = vec![
        ToolbarControl::Color {
            current: annotation.color.clone(),
            swatches: vec![
                palette.primary.clone(),
                palette.secondary.clone(),
                palette.text.clone(),
            ],
        },
        ToolbarControl::Duplicate,
        ToolbarControl::Delete,
    ];

    match &annotation.shape {
        AnnotationShape::Text {
            font_size,
            font_weight,
            font_family,
            ..
        } => {
            controls.push(ToolbarControl::FontFamily {
                current: font_family.clone(),
                options: &FONT_FAMILY_OPTIONS,
            });
            controls.push(ToolbarControl::FontSize {
                current: *font_size,
                options: &FONT_SIZE_OPTIONS,
            });
            controls.push(ToolbarControl::FontWeight {
                current: *font_weight,
            });
        }
        AnnotationShape::Arrow { .. }
        | AnnotationShape::Line { .. }
        | AnnotationShape::Rect { .. }
        | AnnotationShape::Circle { .. } => {
            controls.push(ToolbarControl::StrokeWidth {
                current: annotation.stroke_width,
                options: &STROKE_WIDTH_OPTIONS,
            });
        }
    }

    ContextToolbar {
        annotation: annotation.id,
        anchor,
        controls,
    }
}
