//! Data models for the annotation layer.

mod annotation;
mod patch;
mod style;
mod tool;

pub use annotation::{
    Annotation, AnnotationDraft, AnnotationId, AnnotationShape, ColorRole, FontWeight, Point,
};
pub use patch::{AnnotationPatch, CirclePatch, RectPatch, SegmentPatch, ShapePatch, TextPatch};
pub use style::{Palette, ToolStyle};
pub use tool::AnnotationTool;
