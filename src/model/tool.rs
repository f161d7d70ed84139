//! Annotation tools and the shapes they draw.

use serde::{Deserialize, Serialize};

use super::annotation::{AnnotationShape, Point};
use super::style::ToolStyle;
use crate::constants::MIN_SHAPE_SIZE;

/// Annotation tools available in the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationTool {
    /// Selection tool for selecting, moving and resizing existing annotations
    #[default]
    Select,
    Arrow,
    /// Places a text label with a single click
    Text,
    Rect,
    Circle,
    Line,
}

impl AnnotationTool {
    /// Get the display name for this tool.
    pub fn name(&self) -> &'static str {
        match self {
            AnnotationTool::Select => "Select",
            AnnotationTool::Arrow => "Arrow",
            AnnotationTool::Text => "Text",
            AnnotationTool::Rect => "Rectangle",
            AnnotationTool::Circle => "Circle",
            AnnotationTool::Line => "Line",
        }
    }

    /// Get all available annotation tools.
    pub fn all() -> &'static [AnnotationTool] {
        &[
            AnnotationTool::Select,
            AnnotationTool::Arrow,
            AnnotationTool::Text,
            AnnotationTool::Rect,
            AnnotationTool::Circle,
            AnnotationTool::Line,
        ]
    }

    /// Parse the lowercase identifier used by hosts (`"rect"`, `"arrow"`, ...).
    pub fn from_id(id: &str) -> Option<AnnotationTool> {
        match id.to_ascii_lowercase().as_str() {
            "select" => Some(AnnotationTool::Select),
            "arrow" => Some(AnnotationTool::Arrow),
            "text" => Some(AnnotationTool::Text),
            "rect" | "rectangle" => Some(AnnotationTool::Rect),
            "circle" => Some(AnnotationTool::Circle),
            "line" => Some(AnnotationTool::Line),
            _ => None,
        }
    }

    /// Check if this tool is a drawing tool (not Select).
    pub fn is_drawing_tool(&self) -> bool {
        !matches!(self, AnnotationTool::Select)
    }

    /// Build the shape a drag from `start` to `end` produces with this tool.
    ///
    /// Used both for the live preview and for the final annotation, so the two
    /// always agree. Rect sides and circle radius are raised to
    /// [`MIN_SHAPE_SIZE`]. Returns `None` for tools without a drag gesture.
    pub fn build_shape(&self, start: Point, end: Point, style: &ToolStyle) -> Option<AnnotationShape> {
        match self {
            AnnotationTool::Select | AnnotationTool::Text => None,
            AnnotationTool::Arrow => Some(AnnotationShape::Arrow { start, end }),
            AnnotationTool::Line => Some(AnnotationShape::Line { start, end }),
            AnnotationTool::Rect => {
                let x = start.x.min(end.x);
                let y = start.y.min(end.y);
                Some(AnnotationShape::Rect {
                    position: Point::new(x, y),
                    width: (end.x - start.x).abs().max(MIN_SHAPE_SIZE),
                    height: (end.y - start.y).abs().max(MIN_SHAPE_SIZE),
                    fill: style.fill.clone(),
                    opacity: style.fill_opacity,
                })
            }
            AnnotationTool::Circle => Some(AnnotationShape::Circle {
                center: start,
                radius: start.distance_to(&end).max(MIN_SHAPE_SIZE),
                fill: style.fill.clone(),
                opacity: style.fill_opacity,
            }),
        }
    }
}
