//! Selection handles: where they sit and what dragging them does.
//!
//! Both the renderer and the interaction controller go through
//! [`handles_for`], so a handle is always hit-tested at the exact point it is
//! drawn.

use serde::{Deserialize, Serialize};

use crate::constants::MIN_SHAPE_SIZE;
use crate::model::{AnnotationShape, Point};

/// Which geometric parameter a handle controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HandleKind {
    Start,
    End,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Radius,
}

impl HandleKind {
    /// Handle name as used in the rendered overlay (`data-handle`).
    pub fn name(&self) -> &'static str {
        match self {
            HandleKind::Start => "start",
            HandleKind::End => "end",
            HandleKind::TopLeft => "topLeft",
            HandleKind::TopRight => "topRight",
            HandleKind::BottomLeft => "bottomLeft",
            HandleKind::BottomRight => "bottomRight",
            HandleKind::Radius => "radius",
        }
    }
}

/// A resize/endpoint handle at its canvas position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub kind: HandleKind,
    pub position: Point,
}

impl Handle {
    fn new(kind: HandleKind, position: Point) -> Self {
        Self { kind, position }
    }
}

/// The resize handles a shape exposes when selected.
pub fn handles_for(shape: &AnnotationShape) -> Vec<Handle> {
    match shape {
        AnnotationShape::Arrow { start, end } | AnnotationShape::Line { start, end } => vec![
            Handle::new(HandleKind::Start, *start),
            Handle::new(HandleKind::End, *end),
        ],
        AnnotationShape::Rect {
            position,
            width,
            height,
            ..
        } => vec![
            Handle::new(HandleKind::TopLeft, *position),
            Handle::new(HandleKind::TopRight, position.offset(*width, 0.0)),
            Handle::new(HandleKind::BottomLeft, position.offset(0.0, *height)),
            Handle::new(HandleKind::BottomRight, position.offset(*width, *height)),
        ],
        AnnotationShape::Circle { center, radius, .. } => {
            vec![Handle::new(HandleKind::Radius, center.offset(*radius, 0.0))]
        }
        AnnotationShape::Text { .. } => Vec::new(),
    }
}

/// The non-interactive center dot shown on selected text and circles.
pub fn center_marker(shape: &AnnotationShape) -> Option<Point> {
    match shape {
        AnnotationShape::Text { position, .. } => Some(*position),
        AnnotationShape::Circle { center, .. } => Some(*center),
        _ => None,
    }
}

/// Find the handle under `point`, preferring the closest one.
pub fn hit_test_handle(shape: &AnnotationShape, point: &Point, radius: f32) -> Option<HandleKind> {
    handles_for(shape)
        .into_iter()
        .map(|handle| (handle.kind, handle.position.distance_to(point)))
        .filter(|(_, distance)| *distance <= radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(kind, _)| kind)
}

/// Move the parameter controlled by `handle` by `(dx, dy)`.
///
/// Returns `None` when the handle does not belong to this shape's variant or
/// when the result would shrink a rect side or circle radius to below
/// [`MIN_SHAPE_SIZE`]; the caller keeps the previous geometry in that case.
pub fn apply_handle_drag(
    shape: &AnnotationShape,
    handle: HandleKind,
    dx: f32,
    dy: f32,
) -> Option<AnnotationShape> {
    let mut shape = shape.clone();
    match (&mut shape, handle) {
        (
            AnnotationShape::Arrow { start, .. } | AnnotationShape::Line { start, .. },
            HandleKind::Start,
        ) => {
            *start = start.offset(dx, dy);
        }
        (
            AnnotationShape::Arrow { end, .. } | AnnotationShape::Line { end, .. },
            HandleKind::End,
        ) => {
            *end = end.offset(dx, dy);
        }
        (
            AnnotationShape::Rect {
                position,
                width,
                height,
                ..
            },
            corner @ (HandleKind::TopLeft
            | HandleKind::TopRight
            | HandleKind::BottomLeft
            | HandleKind::BottomRight),
        ) => {
            let (mut x, mut y, mut w, mut h) = (position.x, position.y, *width, *height);
            match corner {
                HandleKind::TopLeft => {
                    x += dx;
                    y += dy;
                    w -= dx;
                    h -= dy;
                }
                HandleKind::TopRight => {
                    y += dy;
                    w += dx;
                    h -= dy;
                }
                HandleKind::BottomLeft => {
                    x += dx;
                    w -= dx;
                    h += dy;
                }
                _ => {
                    w += dx;
                    h += dy;
                }
            }
            // Growing is always allowed, so an undersized imported rect can recover.
            if (w < MIN_SHAPE_SIZE && w < *width) || (h < MIN_SHAPE_SIZE && h < *height) {
                log::debug!("Rejected rect resize to {:.1}x{:.1}", w, h);
                return None;
            }
            *position = Point::new(x, y);
            *width = w;
            *height = h;
        }
        (AnnotationShape::Circle { center, radius, .. }, HandleKind::Radius) => {
            let grip = center.offset(*radius + dx, dy);
            let new_radius = center.distance_to(&grip);
            if new_radius < MIN_SHAPE_SIZE && new_radius < *radius {
                log::debug!("Rejected circle resize to radius {:.1}", new_radius);
                return None;
            }
            *radius = new_radius;
        }
        (shape, handle) => {
            log::debug!(
                "Handle {} does not apply to {} annotations",
                handle.name(),
                shape.name()
            );
            return None;
        }
    }
    Some(shape)
}
