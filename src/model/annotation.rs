//! Annotation types and geometry queries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::DUPLICATE_OFFSET;
use crate::geometry::{Bounds, distance_to_segment};

/// Unique identifier for an annotation.
///
/// Ids are handed out by [`crate::AnnotationStore`] from a counter that only
/// ever grows, so an id is never reused within a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(u64);

impl AnnotationId {
    /// Largest id a store hands out or accepts; the counter must be able to pass it.
    pub const MAX: AnnotationId = AnnotationId(u64::MAX - 1);

    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "annotation-{}", self.0)
    }
}

/// A 2D point in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another point.
    pub fn distance_to(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// This point moved by `(dx, dy)`.
    pub fn offset(&self, dx: f32, dy: f32) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    /// Vector from `self` to `other`.
    pub fn delta_to(&self, other: &Point) -> (f32, f32) {
        (other.x - self.x, other.y - self.y)
    }
}

/// Font weight for text annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    /// CSS/SVG value for this weight.
    pub fn as_str(&self) -> &'static str {
        match self {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
        }
    }
}

/// Which palette entry an annotation's color follows.
///
/// Assigned when the annotation is created. Annotations whose color was set
/// explicitly become [`ColorRole::Custom`] and are left alone on palette changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorRole {
    #[default]
    Primary,
    Secondary,
    Text,
    Custom,
}

/// Shape data for an annotation (in canvas coordinates).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum AnnotationShape {
    /// Line with an arrowhead at `end`.
    Arrow { start: Point, end: Point },
    /// Plain line segment.
    Line { start: Point, end: Point },
    /// Text label centered on `position`.
    Text {
        position: Point,
        text: String,
        font_size: f32,
        font_weight: FontWeight,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font_family: Option<String>,
    },
    /// Rectangle with `position` as its top-left corner.
    Rect {
        position: Point,
        width: f32,
        height: f32,
        fill: String,
        opacity: f32,
    },
    /// Circle around `center`.
    Circle {
        center: Point,
        radius: f32,
        fill: String,
        opacity: f32,
    },
}

impl AnnotationShape {
    /// Lowercase variant name, matching the serialized `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            AnnotationShape::Arrow { .. } => "arrow",
            AnnotationShape::Line { .. } => "line",
            AnnotationShape::Text { .. } => "text",
            AnnotationShape::Rect { .. } => "rect",
            AnnotationShape::Circle { .. } => "circle",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, AnnotationShape::Text { .. })
    }

    /// The point a drag is measured against: `start`, `position` or `center`.
    pub fn anchor(&self) -> Point {
        match self {
            AnnotationShape::Arrow { start, .. } | AnnotationShape::Line { start, .. } => *start,
            AnnotationShape::Text { position, .. } | AnnotationShape::Rect { position, .. } => {
                *position
            }
            AnnotationShape::Circle { center, .. } => *center,
        }
    }

    /// Copy of this shape with every position-like field moved by `(dx, dy)`.
    pub fn translated(&self, dx: f32, dy: f32) -> AnnotationShape {
        let mut shape = self.clone();
        match &mut shape {
            AnnotationShape::Arrow { start, end } | AnnotationShape::Line { start, end } => {
                *start = start.offset(dx, dy);
                *end = end.offset(dx, dy);
            }
            AnnotationShape::Text { position, .. } | AnnotationShape::Rect { position, .. } => {
                *position = position.offset(dx, dy);
            }
            AnnotationShape::Circle { center, .. } => {
                *center = center.offset(dx, dy);
            }
        }
        shape
    }

    /// Axis-aligned bounds of the shape.
    ///
    /// Text bounds are estimated from the character count since glyph metrics
    /// belong to the host.
    pub fn bounds(&self) -> Bounds {
        match self {
            AnnotationShape::Arrow { start, end } | AnnotationShape::Line { start, end } => {
                Bounds::from_corners(*start, *end)
            }
            AnnotationShape::Text {
                position,
                text,
                font_size,
                ..
            } => Bounds::around_text(*position, text, *font_size),
            AnnotationShape::Rect {
                position,
                width,
                height,
                ..
            } => Bounds::new(
                position.x,
                position.y,
                position.x + width,
                position.y + height,
            ),
            AnnotationShape::Circle { center, radius, .. } => Bounds::new(
                center.x - radius,
                center.y - radius,
                center.x + radius,
                center.y + radius,
            ),
        }
    }

    /// Check if a point hits this shape.
    ///
    /// `tolerance` widens thin strokes and outlines so they can be grabbed.
    pub fn contains_point(&self, point: &Point, stroke_width: f32, tolerance: f32) -> bool {
        match self {
            AnnotationShape::Arrow { start, end } | AnnotationShape::Line { start, end } => {
                distance_to_segment(point, start, end) <= tolerance + stroke_width / 2.0
            }
            AnnotationShape::Text { .. } | AnnotationShape::Rect { .. } => {
                self.bounds().expanded(tolerance).contains(point)
            }
            AnnotationShape::Circle { center, radius, .. } => {
                center.distance_to(point) <= radius + tolerance
            }
        }
    }
}

/// A completed annotation with its shared style fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub id: AnnotationId,
    pub color: String,
    pub stroke_width: f32,
    #[serde(default)]
    pub role: ColorRole,
    #[serde(flatten)]
    pub shape: AnnotationShape,
}

impl Annotation {
    /// Attach an id to a draft.
    pub fn from_draft(id: AnnotationId, draft: AnnotationDraft) -> Self {
        Self {
            id,
            color: draft.color,
            stroke_width: draft.stroke_width,
            role: draft.role,
            shape: draft.shape,
        }
    }

    /// Strip the id, keeping style and geometry.
    pub fn to_draft(&self) -> AnnotationDraft {
        AnnotationDraft {
            color: self.color.clone(),
            stroke_width: self.stroke_width,
            role: self.role,
            shape: self.shape.clone(),
        }
    }

    pub fn contains_point(&self, point: &Point, tolerance: f32) -> bool {
        self.shape.contains_point(point, self.stroke_width, tolerance)
    }
}

/// An annotation that has not been given an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationDraft {
    pub color: String,
    pub stroke_width: f32,
    pub role: ColorRole,
    pub shape: AnnotationShape,
}

impl AnnotationDraft {
    /// Draft of a copy shifted by the duplicate offset.
    pub fn duplicate_of(source: &Annotation) -> Self {
        let mut draft = source.to_draft();
        draft.shape = draft.shape.translated(DUPLICATE_OFFSET, DUPLICATE_OFFSET);
        draft
    }
}
