//! Global constants for the annotation layer

use std::f32::consts::PI;

/// Smallest width, height or radius a rect/circle may be resized to (canvas units).
pub const MIN_SHAPE_SIZE: f32 = 10.0;

/// Draw gestures shorter than this (canvas units) are treated as clicks.
pub const MIN_DRAW_DISTANCE: f32 = 10.0;

/// Offset applied to every position-like field of a duplicated annotation.
pub const DUPLICATE_OFFSET: f32 = 20.0;

/// Radius of a selection handle, in screen pixels.
pub const HANDLE_RADIUS: f32 = 6.0;

/// Radius of the center dot drawn on selected text and circles, in screen pixels.
pub const CENTER_DOT_RADIUS: f32 = 3.0;

/// Extra slack around thin shapes when hit testing, in screen pixels.
pub const HIT_TOLERANCE: f32 = 6.0;

/// Stroke widths offered by the stroke picker.
pub const STROKE_WIDTH_OPTIONS: [f32; 5] = [1.0, 2.0, 3.0, 4.0, 6.0];

/// Font sizes offered by the font size picker.
pub const FONT_SIZE_OPTIONS: [f32; 8] = [12.0, 14.0, 16.0, 18.0, 20.0, 24.0, 28.0, 32.0];

/// Font families offered by the font picker.
pub const FONT_FAMILY_OPTIONS: [&str; 4] = [
    "Inter, sans-serif",
    "Georgia, serif",
    "Menlo, monospace",
    "Comic Sans MS, cursive",
];

/// Default stroke width for new annotations
pub const DEFAULT_STROKE_WIDTH: f32 = 2.0;

/// Default font size for new text annotations
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// Default fill for new rects and circles
pub const DEFAULT_FILL: &str = "transparent";

/// Default fill opacity for new rects and circles
pub const DEFAULT_FILL_OPACITY: f32 = 1.0;

/// Text placed into a freshly created text annotation
pub const DEFAULT_TEXT_PLACEHOLDER: &str = "Text";

/// Default palette colors
pub const DEFAULT_PRIMARY_COLOR: &str = "#ef4444";
pub const DEFAULT_SECONDARY_COLOR: &str = "#3b82f6";
pub const DEFAULT_TEXT_COLOR: &str = "#111827";

/// Corner rounding for rendered rects
pub const RECT_CORNER_RADIUS: f32 = 4.0;

/// Arrowhead length along the shaft, in canvas units
pub const ARROW_HEAD_LENGTH: f32 = 12.0;

/// Half-angle of the arrowhead triangle
pub const ARROW_HEAD_ANGLE: f32 = PI / 6.0;

/// Opacity of the in-progress draw preview
pub const PREVIEW_OPACITY: f32 = 0.6;

/// Dash pattern used by previews and the text edit outline
pub const PREVIEW_DASH: &str = "6 4";

/// Approximate glyph width as a fraction of the font size, for text bounds.
pub const TEXT_CHAR_WIDTH_RATIO: f32 = 0.6;

/// Line height as a fraction of the font size, for text bounds.
pub const TEXT_LINE_HEIGHT_RATIO: f32 = 1.2;

/// Distance between the top of the selected shape and the floating toolbar (screen pixels).
pub const TOOLBAR_OFFSET: f32 = 48.0;

/// Number of undo steps kept in history
pub const UNDO_HISTORY_SIZE: usize = 100;

/// Zoom limits and step used by the viewport helpers
pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 10.0;
pub const ZOOM_STEP: f32 = 1.2;
