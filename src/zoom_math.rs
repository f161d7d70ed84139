//! Pan/zoom state of the diagram view.
//!
//! The annotation layer only reads this state to map pointer events into
//! canvas space; the host owns it and updates it on wheel and drag-to-pan.

use serde::{Deserialize, Serialize};

use crate::model::Point;

/// Represents pan/zoom transform state.
///
/// Content is centered in the container, translated by `position` and then
/// scaled by `scale` around the container center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub position: Point,
    pub scale: f32,
}

impl ViewTransform {
    /// Create a new transform with the given pan offset and zoom.
    pub fn new(position: Point, scale: f32) -> Self {
        Self { position, scale }
    }

    /// Create an identity transform (scale=1, no pan).
    pub fn identity() -> Self {
        Self::new(Point::default(), 1.0)
    }

    /// Whether client coordinates can be mapped back through this transform.
    pub fn is_invertible(&self) -> bool {
        self.scale.is_finite() && self.scale > 0.0
    }

    /// Zoom to `new_scale` while keeping the canvas point under the cursor fixed.
    ///
    /// `cursor` and `center` are in the same space (typically container-local
    /// pixels, with `center` the container center).
    pub fn zoom_to_cursor(&self, new_scale: f32, cursor: Point, center: Point) -> ViewTransform {
        // Cursor position relative to container center
        let cursor_rel_x = cursor.x - center.x;
        let cursor_rel_y = cursor.y - center.y;

        // Canvas-space point under cursor (before zoom)
        let canvas_x = (cursor_rel_x - self.position.x) / self.scale;
        let canvas_y = (cursor_rel_y - self.position.y) / self.scale;

        ViewTransform {
            position: Point::new(
                cursor_rel_x - canvas_x * new_scale,
                cursor_rel_y - canvas_y * new_scale,
            ),
            scale: new_scale,
        }
    }

    /// Apply a pan delta to the transform.
    pub fn pan_by(&self, dx: f32, dy: f32) -> ViewTransform {
        ViewTransform {
            position: self.position.offset(dx, dy),
            scale: self.scale,
        }
    }

    /// Zoom in by a factor (e.g., 1.2 for 20% zoom in).
    pub fn zoom_in(&self, factor: f32, max_scale: f32) -> ViewTransform {
        ViewTransform {
            position: self.position,
            scale: (self.scale * factor).min(max_scale),
        }
    }

    /// Zoom out by a factor (e.g., 1.2 for 20% zoom out).
    pub fn zoom_out(&self, factor: f32, min_scale: f32) -> ViewTransform {
        ViewTransform {
            position: self.position,
            scale: (self.scale / factor).max(min_scale),
        }
    }

    /// Convert a length in screen pixels to canvas units at the current zoom.
    pub fn screen_to_canvas_len(&self, pixels: f32) -> f32 {
        if self.is_invertible() {
            pixels / self.scale
        } else {
            pixels
        }
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}
