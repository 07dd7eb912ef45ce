//! Rasterization of the primitives charts are built from.

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;
use std::f32::consts::TAU;

// ============================================================================
// Lines
// ============================================================================

/// Draw a line using Bresenham's algorithm (non-antialiased).
pub fn draw_line(fb: &mut Framebuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        fb.blend_pixel(x, y, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Draw an anti-aliased line using Wu's algorithm.
///
/// Two pixels are plotted per step along the major axis, weighted by the
/// fractional distance to the ideal line.
///
/// Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.
pub fn draw_line_aa(fb: &mut Framebuffer, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba) {
    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    let (x0, y0, x1, y1) = if steep { (y0, x0, y1, x1) } else { (x0, y0, x1, y1) };
    let (x0, y0, x1, y1) = if x0 > x1 { (x1, y1, x0, y0) } else { (x0, y0, x1, y1) };

    let dx = x1 - x0;
    let gradient = if dx.abs() < f32::EPSILON { 1.0 } else { (y1 - y0) / dx };

    let mut put = |major: i32, minor: i32, weight: f32| {
        if steep {
            plot(fb, minor, major, color, weight);
        } else {
            plot(fb, major, minor, color, weight);
        }
    };

    let xstart = x0.round() as i32;
    let xend = x1.round() as i32;
    let mut intery = y0 + gradient * (x0.round() - x0);
    for major in xstart..=xend {
        let ipart = intery.floor() as i32;
        put(major, ipart, 1.0 - fpart(intery));
        put(major, ipart + 1, fpart(intery));
        intery += gradient;
    }
}

/// Draw a line of the given width by stacking anti-aliased strokes.
pub fn draw_thick_line(fb: &mut Framebuffer, from: (f32, f32), to: (f32, f32), width: f32, color: Rgba) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let len = dx.hypot(dy);
    if len < f32::EPSILON {
        fill_circle(fb, from.0, from.1, width / 2.0, color);
        return;
    }
    let (nx, ny) = (-dy / len, dx / len);
    let strokes = width.round().max(1.0) as i32;
    for i in 0..strokes {
        let offset = i as f32 - (strokes - 1) as f32 / 2.0;
        draw_line_aa(
            fb,
            from.0 + nx * offset,
            from.1 + ny * offset,
            to.0 + nx * offset,
            to.1 + ny * offset,
            color,
        );
    }
}

#[inline]
fn plot(fb: &mut Framebuffer, x: i32, y: i32, color: Rgba, intensity: f32) {
    let alpha = (f32::from(color.a) * intensity.clamp(0.0, 1.0)) as u8;
    if alpha > 0 {
        fb.blend_pixel(x, y, color.with_alpha(alpha));
    }
}

#[inline]
fn fpart(x: f32) -> f32 {
    x - x.floor()
}

// ============================================================================
// Areas
// ============================================================================

/// Fill an axis-aligned rectangle given in floating-point coordinates.
pub fn fill_rect(fb: &mut Framebuffer, x: f32, y: f32, width: f32, height: f32, color: Rgba) {
    if width <= 0.0 || height <= 0.0 {
        return;
    }
    let x0 = x.round() as i32;
    let y0 = y.round() as i32;
    let w = ((x + width).round() as i32 - x0).max(1) as u32;
    let h = ((y + height).round() as i32 - y0).max(1) as u32;
    fb.fill_rect(x0, y0, w, h, color);
}

/// Outline an axis-aligned rectangle with 1px edges.
pub fn stroke_rect(fb: &mut Framebuffer, x: f32, y: f32, width: f32, height: f32, color: Rgba) {
    let (x0, y0) = (x.round() as i32, y.round() as i32);
    let (x1, y1) = ((x + width).round() as i32, (y + height).round() as i32);
    draw_line(fb, x0, y0, x1, y0, color);
    draw_line(fb, x0, y1, x1, y1, color);
    draw_line(fb, x0, y0 + 1, x0, y1 - 1, color);
    draw_line(fb, x1, y0 + 1, x1, y1 - 1, color);
}

/// Fill a disc. Each covered pixel is blended exactly once.
pub fn fill_circle(fb: &mut Framebuffer, cx: f32, cy: f32, radius: f32, color: Rgba) {
    if radius <= 0.0 {
        return;
    }
    let r2 = radius * radius;
    let (x0, x1) = ((cx - radius).floor() as i32, (cx + radius).ceil() as i32);
    let (y0, y1) = ((cy - radius).floor() as i32, (cy + radius).ceil() as i32);
    for py in y0..=y1 {
        for px in x0..=x1 {
            let dx = px as f32 + 0.5 - cx;
            let dy = py as f32 + 0.5 - cy;
            if dx * dx + dy * dy <= r2 {
                fb.blend_pixel(px, py, color);
            }
        }
    }
}

/// Fill a pie slice. Angles are radians clockwise from 12 o'clock.
pub fn fill_wedge(fb: &mut Framebuffer, cx: f32, cy: f32, radius: f32, start: f32, end: f32, color: Rgba) {
    if radius <= 0.0 || end <= start {
        return;
    }
    let r2 = radius * radius;
    let full = end - start >= TAU - 1e-4;
    let (x0, x1) = ((cx - radius).floor() as i32, (cx + radius).ceil() as i32);
    let (y0, y1) = ((cy - radius).floor() as i32, (cy + radius).ceil() as i32);
    for py in y0..=y1 {
        for px in x0..=x1 {
            let dx = px as f32 + 0.5 - cx;
            let dy = py as f32 + 0.5 - cy;
            if dx * dx + dy * dy > r2 {
                continue;
            }
            if full {
                fb.blend_pixel(px, py, color);
                continue;
            }
            // atan2(dx, -dy) measures clockwise from straight up.
            let angle = dx.atan2(-dy).rem_euclid(TAU);
            let rel = (angle - start).rem_euclid(TAU);
            if rel < end - start {
                fb.blend_pixel(px, py, color);
            }
        }
    }
}
