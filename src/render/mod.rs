//! Rasterization of vector chart scenes.
//!
//! # Algorithms
//!
//! - **Wu's Anti-aliased Line**: trend lines and polylines
//! - **Bresenham's Line**: axes, ticks and rectangle outlines
//! - **Coverage test**: discs and pie slices, one blend per pixel
//!
//! Text elements are not rasterized; exported PNGs carry marks and axes
//! only, while the SVG export keeps every label.
//!
//! # References
//!
//! - Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.
//! - Bresenham, J. E. (1965). "Algorithm for computer control of a digital plotter."

mod primitives;

pub use primitives::{
    draw_line, draw_line_aa, draw_thick_line, fill_circle, fill_rect, fill_wedge, stroke_rect,
};

use crate::color::Rgba;
use crate::error::Result;
use crate::framebuffer::Framebuffer;
use crate::output::{SvgElement, SvgEncoder};

/// Paint every element of `scene` onto a new framebuffer of the same size.
///
/// # Errors
///
/// Returns an error if the scene has a zero dimension.
pub fn rasterize(scene: &SvgEncoder) -> Result<Framebuffer> {
    let mut fb = Framebuffer::new(scene.width(), scene.height())?;
    fb.clear(scene.background_color().unwrap_or(Rgba::TRANSPARENT));

    for element in scene.elements() {
        match element {
            SvgElement::Rect { x, y, width, height, fill, stroke } => {
                fill_rect(&mut fb, *x, *y, *width, *height, *fill);
                if let Some(stroke) = stroke {
                    stroke_rect(&mut fb, *x, *y, *width, *height, *stroke);
                }
            }
            SvgElement::Circle { cx, cy, r, fill } => fill_circle(&mut fb, *cx, *cy, *r, *fill),
            SvgElement::Line { x1, y1, x2, y2, stroke, stroke_width } => {
                if *stroke_width <= 1.0 {
                    draw_line(
                        &mut fb,
                        x1.round() as i32,
                        y1.round() as i32,
                        x2.round() as i32,
                        y2.round() as i32,
                        *stroke,
                    );
                } else {
                    draw_thick_line(&mut fb, (*x1, *y1), (*x2, *y2), *stroke_width, *stroke);
                }
            }
            SvgElement::Polyline { points, stroke, stroke_width } => {
                for pair in points.windows(2) {
                    draw_thick_line(&mut fb, pair[0], pair[1], *stroke_width, *stroke);
                }
            }
            SvgElement::Wedge { cx, cy, r, start, end, fill } => {
                fill_wedge(&mut fb, *cx, *cy, *r, *start, *end, *fill);
            }
            SvgElement::Text { .. } => {}
        }
    }

    Ok(fb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rasterize_matches_canvas_size() {
        let scene = SvgEncoder::new(64, 32);
        let fb = rasterize(&scene).unwrap();
        assert_eq!((fb.width(), fb.height()), (64, 32));
        assert_eq!(fb.get_pixel(10, 10), Some(Rgba::WHITE));
    }

    #[test]
    fn test_rasterize_paints_marks() {
        let scene = SvgEncoder::new(50, 50)
            .rect(5.0, 5.0, 10.0, 10.0, Rgba::RED)
            .circle(35.0, 35.0, 5.0, Rgba::BLUE)
            .text(0.0, 45.0, "ignored", 12.0, Rgba::BLACK);
        let fb = rasterize(&scene).unwrap();
        assert_eq!(fb.get_pixel(10, 10), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(35, 35), Some(Rgba::BLUE));
        assert_eq!(fb.get_pixel(1, 44), Some(Rgba::WHITE));
    }

    #[test]
    fn test_rasterize_zero_size_fails() {
        assert!(rasterize(&SvgEncoder::new(0, 10)).is_err());
    }

    #[test]
    fn test_transparent_background() {
        let fb = rasterize(&SvgEncoder::new(4, 4).background(None)).unwrap();
        assert_eq!(fb.ink_pixels(Rgba::TRANSPARENT), 0);
    }
}
