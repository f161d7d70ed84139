//! Coordinate transforms between client space and canvas space.
//!
//! The overlay content is centered in its container, then translated by the
//! pan `position` and scaled by `scale` around that center. [`to_canvas`]
//! inverts exactly that transform; [`to_client`] applies it.

use serde::{Deserialize, Serialize};

use crate::constants::{TEXT_CHAR_WIDTH_RATIO, TEXT_LINE_HEIGHT_RATIO};
use crate::model::Point;
use crate::zoom_math::ViewTransform;

/// Bounding rectangle of the overlay's container, in client pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ContainerRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Center of the container, relative to its own top-left corner.
    pub fn local_center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Convert a pointer position in client space to canvas space.
///
/// Returns `None` when the container has not been measured yet or the scale
/// cannot be inverted.
pub fn to_canvas(
    client_x: f32,
    client_y: f32,
    container: Option<&ContainerRect>,
    view: &ViewTransform,
) -> Option<Point> {
    let rect = container?;
    if !view.is_invertible() {
        return None;
    }

    let container_x = client_x - rect.left;
    let container_y = client_y - rect.top;

    let canvas_x = (container_x - rect.width / 2.0 - view.position.x) / view.scale;
    let canvas_y = (container_y - rect.height / 2.0 - view.position.y) / view.scale;

    Some(Point::new(canvas_x, canvas_y))
}

/// Convert a canvas point to client space (inverse of [`to_canvas`]).
pub fn to_client(point: &Point, container: &ContainerRect, view: &ViewTransform) -> Point {
    Point::new(
        container.left + container.width / 2.0 + view.position.x + point.x * view.scale,
        container.top + container.height / 2.0 + view.position.y + point.y * view.scale,
    )
}

/// Shortest distance from `point` to the segment `a`-`b`.
pub fn distance_to_segment(point: &Point, a: &Point, b: &Point) -> f32 {
    let (dx, dy) = a.delta_to(b);
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f32::EPSILON {
        return point.distance_to(a);
    }

    let t = (((point.x - a.x) * dx + (point.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    point.distance_to(&Point::new(a.x + t * dx, a.y + t * dy))
}

/// Axis-aligned bounds in canvas space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Create bounds spanning two corner points.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        Self::new(
            p1.x.min(p2.x),
            p1.y.min(p2.y),
            p1.x.max(p2.x),
            p1.y.max(p2.y),
        )
    }

    /// Estimated box of a single line of text centered on `center`.
    /// Empty text is measured as one character wide.
    pub fn around_text(center: Point, text: &str, font_size: f32) -> Self {
        let width = text.chars().count().max(1) as f32 * font_size * TEXT_CHAR_WIDTH_RATIO;
        let height = font_size * TEXT_LINE_HEIGHT_RATIO;
        Self::new(
            center.x - width / 2.0,
            center.y - height / 2.0,
            center.x + width / 2.0,
            center.y + height / 2.0,
        )
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Midpoint of the top edge.
    pub fn top_center(&self) -> Point {
        Point::new((self.min_x + self.max_x) / 2.0, self.min_y)
    }

    /// Grow the bounds by `margin` on every side.
    pub fn expanded(&self, margin: f32) -> Self {
        Self::new(
            self.min_x - margin,
            self.min_y - margin,
            self.max_x + margin,
            self.max_y + margin,
        )
    }

    /// Check if a point is inside the bounds (edges included).
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.min_x && point.x <= self.max_x && point.y >= self.min_y && point.y <= self.max_y
    }
}
