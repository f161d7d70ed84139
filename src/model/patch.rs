//! Partial updates for annotations.
//!
//! A patch carries only the fields that change. Shape fields are grouped per
//! variant so a patch can only name fields its variant actually has; a shape
//! patch for the wrong variant is logged and skipped.

use super::annotation::{Annotation, AnnotationShape, ColorRole, FontWeight, Point};

/// Field-level update for the two endpoints of arrows and lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentPatch {
    pub start: Option<Point>,
    pub end: Option<Point>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextPatch {
    pub position: Option<Point>,
    pub text: Option<String>,
    pub font_size: Option<f32>,
    pub font_weight: Option<FontWeight>,
    /// `Some(None)` resets to the host's default font.
    pub font_family: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RectPatch {
    pub position: Option<Point>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub fill: Option<String>,
    pub opacity: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CirclePatch {
    pub center: Option<Point>,
    pub radius: Option<f32>,
    pub fill: Option<String>,
    pub opacity: Option<f32>,
}

/// Shape fields of a patch, narrowed to one variant.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapePatch {
    Arrow(SegmentPatch),
    Line(SegmentPatch),
    Text(TextPatch),
    Rect(RectPatch),
    Circle(CirclePatch),
}

impl ShapePatch {
    pub fn name(&self) -> &'static str {
        match self {
            ShapePatch::Arrow(_) => "arrow",
            ShapePatch::Line(_) => "line",
            ShapePatch::Text(_) => "text",
            ShapePatch::Rect(_) => "rect",
            ShapePatch::Circle(_) => "circle",
        }
    }

    /// Merge into `shape`. Returns `false` if the variants differ.
    fn merge_into(&self, shape: &mut AnnotationShape) -> bool {
        match (self, shape) {
            (ShapePatch::Arrow(patch), AnnotationShape::Arrow { start, end })
            | (ShapePatch::Line(patch), AnnotationShape::Line { start, end }) => {
                set(start, &patch.start);
                set(end, &patch.end);
                true
            }
            (
                ShapePatch::Text(patch),
                AnnotationShape::Text {
                    position,
                    text,
                    font_size,
                    font_weight,
                    font_family,
                },
            ) => {
                set(position, &patch.position);
                set(text, &patch.text);
                set(font_size, &patch.font_size);
                set(font_weight, &patch.font_weight);
                set(font_family, &patch.font_family);
                true
            }
            (
                ShapePatch::Rect(patch),
                AnnotationShape::Rect {
                    position,
                    width,
                    height,
                    fill,
                    opacity,
                },
            ) => {
                set(position, &patch.position);
                set(width, &patch.width);
                set(height, &patch.height);
                set(fill, &patch.fill);
                set(opacity, &patch.opacity);
                true
            }
            (
                ShapePatch::Circle(patch),
                AnnotationShape::Circle {
                    center,
                    radius,
                    fill,
                    opacity,
                },
            ) => {
                set(center, &patch.center);
                set(radius, &patch.radius);
                set(fill, &patch.fill);
                set(opacity, &patch.opacity);
                true
            }
            _ => false,
        }
    }
}

fn set<T: Clone>(field: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *field = value.clone();
    }
}

/// Replace every geometric and style field of the variant.
impl From<&AnnotationShape> for ShapePatch {
    fn from(shape: &AnnotationShape) -> Self {
        match shape.clone() {
            AnnotationShape::Arrow { start, end } => ShapePatch::Arrow(SegmentPatch {
                start: Some(start),
                end: Some(end),
            }),
            AnnotationShape::Line { start, end } => ShapePatch::Line(SegmentPatch {
                start: Some(start),
                end: Some(end),
            }),
            AnnotationShape::Text {
                position,
                text,
                font_size,
                font_weight,
                font_family,
            } => ShapePatch::Text(TextPatch {
                position: Some(position),
                text: Some(text),
                font_size: Some(font_size),
                font_weight: Some(font_weight),
                font_family: Some(font_family),
            }),
            AnnotationShape::Rect {
                position,
                width,
                height,
                fill,
                opacity,
            } => ShapePatch::Rect(RectPatch {
                position: Some(position),
                width: Some(width),
                height: Some(height),
                fill: Some(fill),
                opacity: Some(opacity),
            }),
            AnnotationShape::Circle {
                center,
                radius,
                fill,
                opacity,
            } => ShapePatch::Circle(CirclePatch {
                center: Some(center),
                radius: Some(radius),
                fill: Some(fill),
                opacity: Some(opacity),
            }),
        }
    }
}

/// Partial update for an [`Annotation`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationPatch {
    /// Setting a color pins it: the annotation stops following the palette.
    pub color: Option<String>,
    /// Palette entry to follow from now on. Applied after `color`.
    pub role: Option<ColorRole>,
    pub stroke_width: Option<f32>,
    pub shape: Option<ShapePatch>,
}

impl AnnotationPatch {
    pub fn color(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Default::default()
        }
    }

    /// Take `color` from the palette entry `role` and keep following it.
    pub fn themed_color(role: ColorRole, color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            role: Some(role),
            ..Default::default()
        }
    }

    pub fn stroke_width(width: f32) -> Self {
        Self {
            stroke_width: Some(width),
            ..Default::default()
        }
    }

    /// Patch that overwrites the whole geometry with `shape`.
    pub fn geometry(shape: &AnnotationShape) -> Self {
        Self {
            shape: Some(ShapePatch::from(shape)),
            ..Default::default()
        }
    }

    pub fn text(patch: TextPatch) -> Self {
        Self {
            shape: Some(ShapePatch::Text(patch)),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.color.is_none()
            && self.role.is_none()
            && self.stroke_width.is_none()
            && self.shape.is_none()
    }
}

impl Annotation {
    /// Best-effort merge of `patch` into this annotation.
    ///
    /// Style fields always apply. Shape fields apply only when the patch's
    /// variant matches; a mismatched shape patch is ignored.
    pub fn apply_patch(&mut self, patch: &AnnotationPatch) {
        if let Some(color) = &patch.color {
            self.color = color.clone();
            self.role = ColorRole::Custom;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(width) = patch.stroke_width {
            self.stroke_width = width;
        }
        if let Some(shape_patch) = &patch.shape
            && !shape_patch.merge_into(&mut self.shape)
        {
            log::debug!(
                "Ignoring {} fields for {} annotation {}",
                shape_patch.name(),
                self.shape.name(),
                self.id
            );
        }
    }
}
