//! SVG serialization of a rendered overlay.
//!
//! The toolbar is host chrome and is not part of the SVG output.

use std::fmt::Write;

use super::{Overlay, OverlayElement, StrokeStyle};
use crate::geometry::{Bounds, ContainerRect};
use crate::model::{AnnotationId, FontWeight};
use crate::zoom_math::ViewTransform;

const HANDLE_FILL: &str = "#ffffff";
const HANDLE_STROKE: &str = "#2563eb";
/// Padding around the content when the document is sized to fit it.
const FIT_MARGIN: f32 = 8.0;

/// Options for [`to_svg`].
#[derive(Debug, Clone, Default)]
pub struct SvgOptions<'a> {
    /// Size the document to this container and place canvas space inside it
    /// with a `<g transform>`. Without it the view box fits the content.
    pub container: Option<&'a ContainerRect>,
    pub view: ViewTransform,
    /// Emit selection handles and center dots.
    pub include_handles: bool,
    /// Emitted as `<title>`.
    pub title: Option<&'a str>,
}

/// Escape the XML special characters for text content and attribute values.
fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

fn id_attr(annotation: Option<AnnotationId>) -> String {
    annotation
        .map(|id| format!(r#" data-annotation-id="{}""#, id))
        .unwrap_or_else(|| r#" class="annotation-preview""#.to_string())
}

fn stroke_attrs(stroke: &StrokeStyle) -> String {
    let mut attrs = format!(
        r#"stroke="{}" stroke-width="{:.1}""#,
        xml_escape(&stroke.color),
        stroke.width
    );
    if let Some(dash) = stroke.dash {
        let _ = write!(attrs, r#" stroke-dasharray="{}""#, dash);
    }
    attrs
}

fn opacity_attr(opacity: f32) -> String {
    if opacity < 1.0 {
        format!(r#" opacity="{:.2}""#, opacity)
    } else {
        String::new()
    }
}

fn font_attrs(font_size: f32, font_weight: FontWeight, font_family: Option<&str>) -> String {
    let mut attrs = format!(
        r#"font-size="{:.1}" font-weight="{}""#,
        font_size,
        font_weight.as_str()
    );
    if let Some(family) = font_family {
        let _ = write!(attrs, r#" font-family="{}""#, xml_escape(family));
    }
    attrs
}

fn element_bounds(element: &OverlayElement) -> Bounds {
    match element {
        OverlayElement::Line { from, to, stroke, .. } => {
            Bounds::from_corners(*from, *to).expanded(stroke.width / 2.0)
        }
        OverlayElement::ArrowHead { points, .. } => {
            let [a, b, c] = points;
            Bounds::new(
                a.x.min(b.x).min(c.x),
                a.y.min(b.y).min(c.y),
                a.x.max(b.x).max(c.x),
                a.y.max(b.y).max(c.y),
            )
        }
        OverlayElement::Rect {
            position,
            width,
            height,
            stroke,
            ..
        } => Bounds::new(
            position.x,
            position.y,
            position.x + width,
            position.y + height,
        )
        .expanded(stroke.width / 2.0),
        OverlayElement::Circle {
            center,
            radius,
            stroke,
            ..
        } => Bounds::new(
            center.x - radius,
            center.y - radius,
            center.x + radius,
            center.y + radius,
        )
        .expanded(stroke.width / 2.0),
        OverlayElement::Label {
            position,
            text,
            font_size,
            ..
        } => Bounds::around_text(*position, text, *font_size),
        OverlayElement::TextEditor {
            position,
            value,
            font_size,
            ..
        } => Bounds::around_text(*position, value, *font_size),
        OverlayElement::Handle { center, radius, .. }
        | OverlayElement::CenterDot { center, radius, .. } => Bounds::new(
            center.x - radius,
            center.y - radius,
            center.x + radius,
            center.y + radius,
        ),
    }
}

fn content_bounds<'a>(elements: impl Iterator<Item = &'a OverlayElement>) -> Option<Bounds> {
    elements.map(element_bounds).reduce(|acc, b| {
        Bounds::new(
            acc.min_x.min(b.min_x),
            acc.min_y.min(b.min_y),
            acc.max_x.max(b.max_x),
            acc.max_y.max(b.max_y),
        )
    })
}

fn is_decoration(element: &OverlayElement) -> bool {
    matches!(
        element,
        OverlayElement::Handle { .. } | OverlayElement::CenterDot { .. }
    )
}

fn write_element(out: &mut String, element: &OverlayElement, indent: &str) {
    match element {
        OverlayElement::Line {
            annotation,
            from,
            to,
            stroke,
            opacity,
        } => {
            let _ = writeln!(
                out,
                r#"{indent}<line{} x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" {} stroke-linecap="round"{}/>"#,
                id_attr(*annotation),
                from.x,
                from.y,
                to.x,
                to.y,
                stroke_attrs(stroke),
                opacity_attr(*opacity),
            );
        }
        OverlayElement::ArrowHead {
            annotation,
            points,
            color,
            opacity,
        } => {
            let points = points
                .iter()
                .map(|p| format!("{:.1},{:.1}", p.x, p.y))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = writeln!(
                out,
                r#"{indent}<polygon{} points="{points}" fill="{}"{}/>"#,
                id_attr(*annotation),
                xml_escape(color),
                opacity_attr(*opacity),
            );
        }
        OverlayElement::Rect {
            annotation,
            position,
            width,
            height,
            corner_radius,
            stroke,
            fill,
            opacity,
        } => {
            let _ = writeln!(
                out,
                r#"{indent}<rect{} x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" rx="{:.1}" fill="{}" fill-opacity="{:.2}" {}{}/>"#,
                id_attr(*annotation),
                position.x,
                position.y,
                width,
                height,
                corner_radius,
                xml_escape(&fill.color),
                fill.opacity,
                stroke_attrs(stroke),
                opacity_attr(*opacity),
            );
        }
        OverlayElement::Circle {
            annotation,
            center,
            radius,
            stroke,
            fill,
            opacity,
        } => {
            let _ = writeln!(
                out,
                r#"{indent}<circle{} cx="{:.1}" cy="{:.1}" r="{:.1}" fill="{}" fill-opacity="{:.2}" {}{}/>"#,
                id_attr(*annotation),
                center.x,
                center.y,
                radius,
                xml_escape(&fill.color),
                fill.opacity,
                stroke_attrs(stroke),
                opacity_attr(*opacity),
            );
        }
        OverlayElement::Label {
            annotation,
            position,
            text,
            color,
            font_size,
            font_weight,
            font_family,
            opacity,
        } => {
            let _ = writeln!(
                out,
                r#"{indent}<text{} x="{:.1}" y="{:.1}" text-anchor="middle" dominant-baseline="central" fill="{}" {}{}>{}</text>"#,
                id_attr(*annotation),
                position.x,
                position.y,
                xml_escape(color),
                font_attrs(*font_size, *font_weight, font_family.as_deref()),
                opacity_attr(*opacity),
                xml_escape(text),
            );
        }
        OverlayElement::TextEditor {
            annotation,
            position,
            value,
            color,
            font_size,
            font_weight,
            font_family,
        } => {
            let _ = writeln!(
                out,
                r#"{indent}<text{} data-editing="true" x="{:.1}" y="{:.1}" text-anchor="middle" dominant-baseline="central" fill="{}" {}>{}</text>"#,
                id_attr(Some(*annotation)),
                position.x,
                position.y,
                xml_escape(color),
                font_attrs(*font_size, *font_weight, font_family.as_deref()),
                xml_escape(value),
            );
        }
        OverlayElement::Handle {
            annotation,
            handle,
            center,
            radius,
        } => {
            let _ = writeln!(
                out,
                r#"{indent}<circle{} data-handle="{}" cx="{:.1}" cy="{:.1}" r="{:.2}" fill="{HANDLE_FILL}" stroke="{HANDLE_STROKE}" stroke-width="{:.2}"/>"#,
                id_attr(Some(*annotation)),
                handle.name(),
                center.x,
                center.y,
                radius,
                radius / 4.0,
            );
        }
        OverlayElement::CenterDot {
            annotation,
            center,
            radius,
        } => {
            let _ = writeln!(
                out,
                r#"{indent}<circle{} class="annotation-center" cx="{:.1}" cy="{:.1}" r="{:.2}" fill="{HANDLE_STROKE}"/>"#,
                id_attr(Some(*annotation)),
                center.x,
                center.y,
                radius,
            );
        }
    }
}

/// Serialize an overlay into a standalone SVG document.
pub fn to_svg(overlay: &Overlay, options: &SvgOptions<'_>) -> String {
    let mut out = String::new();
    let elements: Vec<&OverlayElement> = overlay
        .elements
        .iter()
        .filter(|element| options.include_handles || !is_decoration(element))
        .collect();

    match options.container {
        Some(rect) => {
            let _ = writeln!(
                out,
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}">"#,
                rect.width, rect.height, rect.width, rect.height,
            );
        }
        None => {
            let bounds = content_bounds(elements.iter().copied())
                .map(|b| b.expanded(FIT_MARGIN))
                .unwrap_or_else(|| Bounds::new(0.0, 0.0, 0.0, 0.0));
            let _ = writeln!(
                out,
                r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{:.1} {:.1} {:.1} {:.1}">"#,
                bounds.min_x,
                bounds.min_y,
                bounds.width(),
                bounds.height(),
            );
        }
    }

    if let Some(title) = options.title {
        let _ = writeln!(out, "  <title>{}</title>", xml_escape(title));
    }

    let indent = match options.container {
        Some(rect) => {
            let center = rect.local_center();
            let _ = writeln!(
                out,
                r#"  <g transform="translate({:.2} {:.2}) scale({:.4})">"#,
                center.x + options.view.position.x,
                center.y + options.view.position.y,
                options.view.scale,
            );
            "    "
        }
        None => "  ",
    };

    for element in &elements {
        write_element(&mut out, element, indent);
    }

    if options.container.is_some() {
        let _ = writeln!(out, "  </g>");
    }
    let _ = writeln!(out, "</svg>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handles::HandleKind;
    use crate::model::Point;
    use crate::render::FillStyle;

    fn stroke() -> StrokeStyle {
        StrokeStyle {
            color: "#ef4444".to_string(),
            width: 2.0,
            dash: None,
        }
    }

    fn overlay() -> Overlay {
        let id = AnnotationId::new(3);
        Overlay {
            elements: vec![
                OverlayElement::Rect {
                    annotation: Some(id),
                    position: Point::new(10.0, 20.0),
                    width: 40.0,
                    height: 30.0,
                    corner_radius: 4.0,
                    stroke: stroke(),
                    fill: FillStyle {
                        color: "transparent".to_string(),
                        opacity: 1.0,
                    },
                    opacity: 1.0,
                },
                OverlayElement::Label {
                    annotation: Some(AnnotationId::new(4)),
                    position: Point::new(0.0, 0.0),
                    text: "a < b & \"c\"".to_string(),
                    color: "#111827".to_string(),
                    font_size: 16.0,
                    font_weight: FontWeight::Bold,
                    font_family: None,
                    opacity: 1.0,
                },
                OverlayElement::Handle {
                    annotation: id,
                    handle: HandleKind::TopLeft,
                    center: Point::new(10.0, 20.0),
                    radius: 6.0,
                },
            ],
            toolbar: None,
        }
    }

    #[test]
    fn test_escapes_text() {
        let svg = to_svg(&overlay(), &SvgOptions::default());
        assert!(svg.contains("a &lt; b &amp; &quot;c&quot;"));
        assert!(svg.contains(r#"font-weight="bold""#));
    }

    #[test]
    fn test_handles_are_optional() {
        let without = to_svg(&overlay(), &SvgOptions::default());
        assert!(!without.contains("data-handle"));

        let with = to_svg(
            &overlay(),
            &SvgOptions {
                include_handles: true,
                ..Default::default()
            },
        );
        assert!(with.contains(r#"data-handle="topLeft""#));
        assert!(with.contains(r#"data-annotation-id="annotation-3""#));
    }

    #[test]
    fn test_container_wraps_content_in_transform() {
        let rect = ContainerRect::new(0.0, 0.0, 800.0, 600.0);
        let svg = to_svg(
            &overlay(),
            &SvgOptions {
                container: Some(&rect),
                view: ViewTransform::new(Point::new(10.0, -20.0), 2.0),
                ..Default::default()
            },
        );
        assert!(svg.contains(r#"width="800" height="600""#));
        assert!(svg.contains(r#"<g transform="translate(410.00 280.00) scale(2.0000)">"#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_empty_overlay_is_valid_document() {
        let svg = to_svg(&Overlay::default(), &SvgOptions::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="0.0 0.0 0.0 0.0""#));
    }
}
