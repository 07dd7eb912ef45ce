//! SVG output encoder.
//!
//! Charts are assembled as a flat list of vector elements, then either
//! serialized to SVG markup (inline in HTML pages, `.svg` exports) or handed
//! to the rasterizer for PNG export.

use crate::color::Rgba;
use crate::error::Result;
use std::f32::consts::TAU;
use std::fmt::Write as FmtWrite;
use std::fs;
use std::path::Path;

/// Vector scene with a fixed canvas size.
#[derive(Debug, Clone)]
pub struct SvgEncoder {
    width: u32,
    height: u32,
    background: Option<Rgba>,
    elements: Vec<SvgElement>,
}

/// An SVG element.
///
/// Field names match the SVG attributes they become.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum SvgElement {
    /// Rectangle
    Rect { x: f32, y: f32, width: f32, height: f32, fill: Rgba, stroke: Option<Rgba> },
    /// Circle
    Circle { cx: f32, cy: f32, r: f32, fill: Rgba },
    /// Line
    Line { x1: f32, y1: f32, x2: f32, y2: f32, stroke: Rgba, stroke_width: f32 },
    /// Open polyline
    Polyline { points: Vec<(f32, f32)>, stroke: Rgba, stroke_width: f32 },
    /// Pie slice; angles in radians, clockwise from 12 o'clock.
    Wedge { cx: f32, cy: f32, r: f32, start: f32, end: f32, fill: Rgba },
    /// Text
    Text { x: f32, y: f32, text: String, font_size: f32, fill: Rgba, anchor: TextAnchor },
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

impl TextAnchor {
    fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

impl Default for SvgEncoder {
    fn default() -> Self {
        Self::new(800, 500)
    }
}

impl SvgEncoder {
    /// Create an empty scene with a white background.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, background: Some(Rgba::WHITE), elements: Vec::new() }
    }

    /// Set background color (None for transparent).
    #[must_use]
    pub fn background(mut self, color: Option<Rgba>) -> Self {
        self.background = color;
        self
    }

    /// Add a filled rectangle.
    #[must_use]
    pub fn rect(mut self, x: f32, y: f32, width: f32, height: f32, fill: Rgba) -> Self {
        self.elements.push(SvgElement::Rect { x, y, width, height, fill, stroke: None });
        self
    }

    /// Add a filled rectangle with a 1px outline.
    #[must_use]
    pub fn rect_outlined(mut self, x: f32, y: f32, width: f32, height: f32, fill: Rgba, stroke: Rgba) -> Self {
        self.elements.push(SvgElement::Rect { x, y, width, height, fill, stroke: Some(stroke) });
        self
    }

    /// Add a filled circle.
    #[must_use]
    pub fn circle(mut self, cx: f32, cy: f32, r: f32, fill: Rgba) -> Self {
        self.elements.push(SvgElement::Circle { cx, cy, r, fill });
        self
    }

    /// Add a line segment.
    #[must_use]
    pub fn line(mut self, x1: f32, y1: f32, x2: f32, y2: f32, stroke: Rgba, stroke_width: f32) -> Self {
        self.elements.push(SvgElement::Line { x1, y1, x2, y2, stroke, stroke_width });
        self
    }

    /// Add an open polyline.
    #[must_use]
    pub fn polyline(mut self, points: &[(f32, f32)], stroke: Rgba, stroke_width: f32) -> Self {
        self.elements.push(SvgElement::Polyline { points: points.to_vec(), stroke, stroke_width });
        self
    }

    /// Add a pie slice.
    #[must_use]
    pub fn wedge(mut self, cx: f32, cy: f32, r: f32, start: f32, end: f32, fill: Rgba) -> Self {
        self.elements.push(SvgElement::Wedge { cx, cy, r, start, end, fill });
        self
    }

    /// Add left-aligned text.
    #[must_use]
    pub fn text(self, x: f32, y: f32, text: &str, font_size: f32, fill: Rgba) -> Self {
        self.text_anchored(x, y, text, font_size, fill, TextAnchor::Start)
    }

    /// Add text with an explicit anchor.
    #[must_use]
    pub fn text_anchored(
        mut self,
        x: f32,
        y: f32,
        text: &str,
        font_size: f32,
        fill: Rgba,
        anchor: TextAnchor,
    ) -> Self {
        self.elements.push(SvgElement::Text { x, y, text: text.to_string(), font_size, fill, anchor });
        self
    }

    /// Canvas width.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Background fill, if any.
    #[must_use]
    pub const fn background_color(&self) -> Option<Rgba> {
        self.background
    }

    /// Elements in paint order.
    #[must_use]
    pub fn elements(&self) -> &[SvgElement] {
        &self.elements
    }

    /// Serialize to a standalone SVG document.
    #[must_use]
    pub fn render(&self) -> String {
        let mut svg = String::with_capacity(4096 + self.elements.len() * 96);

        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
            w = self.width,
            h = self.height
        );
        if let Some(bg) = self.background {
            let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="{}"/>"#, bg.to_css());
        }
        for element in &self.elements {
            let _ = writeln!(svg, "  {}", element_to_svg(element));
        }
        svg.push_str("</svg>\n");
        svg
    }

    /// Write the SVG document to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.render())?;
        Ok(())
    }
}

/// Point on a circle at `angle` radians clockwise from 12 o'clock.
#[must_use]
pub fn polar(cx: f32, cy: f32, r: f32, angle: f32) -> (f32, f32) {
    (cx + r * angle.sin(), cy - r * angle.cos())
}

/// Escape `&`, `<`, `>` and quotes for XML text and attributes.
#[must_use]
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn element_to_svg(element: &SvgElement) -> String {
    match element {
        SvgElement::Rect { x, y, width, height, fill, stroke } => {
            let stroke_attr =
                stroke.map(|s| format!(r#" stroke="{}" stroke-width="1""#, s.to_css())).unwrap_or_default();
            format!(
                r#"<rect x="{x:.2}" y="{y:.2}" width="{width:.2}" height="{height:.2}" fill="{}"{stroke_attr}/>"#,
                fill.to_css()
            )
        }
        SvgElement::Circle { cx, cy, r, fill } => {
            format!(r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}" fill="{}"/>"#, fill.to_css())
        }
        SvgElement::Line { x1, y1, x2, y2, stroke, stroke_width } => format!(
            r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" stroke="{}" stroke-width="{stroke_width}"/>"#,
            stroke.to_css()
        ),
        SvgElement::Polyline { points, stroke, stroke_width } => {
            let pts: Vec<String> = points.iter().map(|(x, y)| format!("{x:.2},{y:.2}")).collect();
            format!(
                r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="{stroke_width}"/>"#,
                pts.join(" "),
                stroke.to_css()
            )
        }
        SvgElement::Wedge { cx, cy, r, start, end, fill } => {
            let sweep = end - start;
            if sweep >= TAU - 1e-4 {
                return format!(r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}" fill="{}"/>"#, fill.to_css());
            }
            let (x0, y0) = polar(*cx, *cy, *r, *start);
            let (x1, y1) = polar(*cx, *cy, *r, *end);
            let large = u8::from(sweep > std::f32::consts::PI);
            format!(
                r#"<path d="M {cx:.2} {cy:.2} L {x0:.2} {y0:.2} A {r:.2} {r:.2} 0 {large} 1 {x1:.2} {y1:.2} Z" fill="{}" stroke="white" stroke-width="1"/>"#,
                fill.to_css()
            )
        }
        SvgElement::Text { x, y, text, font_size, fill, anchor } => format!(
            r#"<text x="{x:.2}" y="{y:.2}" font-size="{font_size}" fill="{}" text-anchor="{}">{}</text>"#,
            fill.to_css(),
            anchor.as_str(),
            escape_xml(text)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_header_and_background() {
        let svg = SvgEncoder::new(200, 100).render();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="0 0 200 100""#));
        assert!(svg.contains(r#"fill="rgb(255,255,255)""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_transparent_background() {
        let svg = SvgEncoder::new(10, 10).background(None).render();
        assert!(!svg.contains("100%"));
    }

    #[test]
    fn test_elements_in_order() {
        let enc = SvgEncoder::new(100, 100)
            .rect(0.0, 0.0, 10.0, 10.0, Rgba::RED)
            .circle(50.0, 50.0, 3.0, Rgba::BLUE)
            .line(0.0, 0.0, 100.0, 100.0, Rgba::BLACK, 1.0);
        assert_eq!(enc.elements().len(), 3);
        let svg = enc.render();
        let rect = svg.find("<rect x=").unwrap();
        let circle = svg.find("<circle").unwrap();
        assert!(rect < circle);
        assert!(svg.contains(r#"r="3.00""#));
    }

    #[test]
    fn test_text_is_escaped() {
        let svg = SvgEncoder::new(10, 10).text(0.0, 0.0, "a < b & c", 12.0, Rgba::BLACK).render();
        assert!(svg.contains("a &lt; b &amp; c"));
    }

    #[test]
    fn test_wedge_path() {
        let half = SvgEncoder::new(100, 100).wedge(50.0, 50.0, 40.0, 0.0, std::f32::consts::PI, Rgba::RED).render();
        assert!(half.contains("<path d=\"M 50.00 50.00 L 50.00 10.00 A 40.00 40.00 0 0 1"));

        let full = SvgEncoder::new(100, 100).wedge(50.0, 50.0, 40.0, 0.0, TAU, Rgba::RED).render();
        assert!(full.contains("<circle"));
        assert!(!full.contains("<path"));
    }

    #[test]
    fn test_polar() {
        let (x, y) = polar(0.0, 0.0, 1.0, std::f32::consts::FRAC_PI_2);
        assert!((x - 1.0).abs() < 1e-6);
        assert!(y.abs() < 1e-6);
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.svg");
        SvgEncoder::new(10, 10).write_to_file(&path).unwrap();
        assert!(std::fs::read_to_string(path).unwrap().contains("<svg"));
    }
}
