//! Default styling for new annotations and the theme palette.

use serde::{Deserialize, Serialize};

use super::annotation::{AnnotationDraft, AnnotationShape, ColorRole, FontWeight, Point};
use crate::constants::{
    DEFAULT_FILL, DEFAULT_FILL_OPACITY, DEFAULT_FONT_SIZE, DEFAULT_PRIMARY_COLOR,
    DEFAULT_SECONDARY_COLOR, DEFAULT_STROKE_WIDTH, DEFAULT_TEXT_COLOR, DEFAULT_TEXT_PLACEHOLDER,
};

/// Theme colors annotations follow through their [`ColorRole`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub primary: String,
    pub secondary: String,
    pub text: String,
}

impl Palette {
    /// The color for a role, or `None` for [`ColorRole::Custom`].
    pub fn color_for(&self, role: ColorRole) -> Option<&str> {
        match role {
            ColorRole::Primary => Some(&self.primary),
            ColorRole::Secondary => Some(&self.secondary),
            ColorRole::Text => Some(&self.text),
            ColorRole::Custom => None,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY_COLOR.to_string(),
            secondary: DEFAULT_SECONDARY_COLOR.to_string(),
            text: DEFAULT_TEXT_COLOR.to_string(),
        }
    }
}

/// Style applied to annotations created by the drawing tools.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolStyle {
    pub palette: Palette,
    pub stroke_width: f32,
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub font_family: Option<String>,
    pub fill: String,
    pub fill_opacity: f32,
    pub text_placeholder: String,
}

impl Default for ToolStyle {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            font_size: DEFAULT_FONT_SIZE,
            font_weight: FontWeight::Normal,
            font_family: None,
            fill: DEFAULT_FILL.to_string(),
            fill_opacity: DEFAULT_FILL_OPACITY,
            text_placeholder: DEFAULT_TEXT_PLACEHOLDER.to_string(),
        }
    }
}

impl ToolStyle {
    /// Placeholder text shape at `position`.
    pub fn text_at(&self, position: Point) -> AnnotationShape {
        AnnotationShape::Text {
            position,
            text: self.text_placeholder.clone(),
            font_size: self.font_size,
            font_weight: self.font_weight,
            font_family: self.font_family.clone(),
        }
    }

    /// Wrap a freshly drawn shape with the current style.
    ///
    /// Text follows the palette's text color, everything else the primary color.
    pub fn draft(&self, shape: AnnotationShape) -> AnnotationDraft {
        let role = if shape.is_text() {
            ColorRole::Text
        } else {
            ColorRole::Primary
        };
        let color = self
            .palette
            .color_for(role)
            .unwrap_or(&self.palette.primary)
            .to_string();
        AnnotationDraft {
            color,
            stroke_width: self.stroke_width,
            role,
            shape,
        }
    }
}
