//! RGBA raster canvas used when charts are exported as PNG.
//!
//! Pixel statistics go through trueno so the reductions pick the best
//! available SIMD backend.

use crate::color::Rgba;
use crate::error::{Error, Result};
use trueno::{Backend, Vector};

/// Tightly packed RGBA pixel buffer, row-major.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

/// Summary of a rendered raster, used to sanity-check exports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LuminanceStats {
    /// Darkest pixel (0-255).
    pub min: f32,
    /// Brightest pixel (0-255).
    pub max: f32,
    /// Mean luminance (0-255).
    pub mean: f32,
}

impl Framebuffer {
    /// Create a transparent canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use claim_explorer::framebuffer::Framebuffer;
    ///
    /// let fb = Framebuffer::new(800, 500).unwrap();
    /// assert_eq!(fb.width(), 800);
    /// assert_eq!(fb.pixels().len(), 800 * 500 * 4);
    /// ```
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(Self { width, height, pixels: vec![0; width as usize * height as usize * 4] })
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Fill the whole canvas.
    pub fn clear(&mut self, color: Rgba) {
        let rgba = color.to_array();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Blend a rectangle into the canvas. Coordinates are clipped.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgba) {
        let x1 = x.max(0);
        let y1 = y.max(0);
        let x2 = (i64::from(x) + i64::from(w)).min(i64::from(self.width)) as i32;
        let y2 = (i64::from(y) + i64::from(h)).min(i64::from(self.height)) as i32;
        for py in y1..y2 {
            for px in x1..x2 {
                self.blend_pixel(px, py, color);
            }
        }
    }

    /// Color at a pixel, or `None` outside the canvas.
    #[must_use]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y);
        Some(Rgba::from_array([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]))
    }

    /// Composite `color` over the pixel ("over" operator). Out-of-bounds
    /// writes are ignored.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        let Some(idx) = self.checked_index(x, y) else {
            return;
        };
        if color.a == 255 {
            self.pixels[idx..idx + 4].copy_from_slice(&color.to_array());
            return;
        }

        let src_a = f32::from(color.a) / 255.0;
        let dst_a = f32::from(self.pixels[idx + 3]) / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        if out_a <= 0.0 {
            return;
        }

        let blend = |src: u8, dst: u8| -> u8 {
            let out = (f32::from(src) * src_a + f32::from(dst) * dst_a * (1.0 - src_a)) / out_a;
            out.clamp(0.0, 255.0) as u8
        };
        self.pixels[idx] = blend(color.r, self.pixels[idx]);
        self.pixels[idx + 1] = blend(color.g, self.pixels[idx + 1]);
        self.pixels[idx + 2] = blend(color.b, self.pixels[idx + 2]);
        self.pixels[idx + 3] = (out_a * 255.0) as u8;
    }

    /// Luminance range and mean of the canvas (ITU-R BT.709).
    #[must_use]
    pub fn luminance_stats(&self) -> LuminanceStats {
        let luminances: Vec<f32> = self
            .pixels
            .chunks_exact(4)
            .map(|px| Rgba::from_array([px[0], px[1], px[2], px[3]]).luminance())
            .collect();
        let vec = Vector::from_vec(luminances);

        LuminanceStats {
            min: vec.min().unwrap_or(0.0),
            max: vec.max().unwrap_or(255.0),
            mean: vec.mean().unwrap_or(127.5),
        }
    }

    /// Number of pixels that differ from `background`.
    #[must_use]
    pub fn ink_pixels(&self, background: Rgba) -> usize {
        let bg = background.to_array();
        self.pixels.chunks_exact(4).filter(|px| *px != bg).count()
    }

    /// SIMD backend trueno selected on this machine.
    #[must_use]
    pub fn backend() -> Backend {
        Backend::select_best()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    fn checked_index(&self, x: i32, y: i32) -> Option<usize> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        (x < self.width && y < self.height).then(|| self.index(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(Framebuffer::new(0, 10), Err(Error::InvalidDimensions { .. })));
        assert!(Framebuffer::new(10, 0).is_err());
    }

    #[test]
    fn test_clear_and_get() {
        let mut fb = Framebuffer::new(4, 3).unwrap();
        fb.clear(Rgba::WHITE);
        assert_eq!(fb.get_pixel(3, 2), Some(Rgba::WHITE));
        assert_eq!(fb.get_pixel(4, 0), None);
        assert_eq!(fb.ink_pixels(Rgba::WHITE), 0);
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        fb.clear(Rgba::WHITE);
        fb.fill_rect(-5, -5, 8, 8, Rgba::BLUE);
        assert_eq!(fb.get_pixel(0, 0), Some(Rgba::BLUE));
        assert_eq!(fb.get_pixel(2, 2), Some(Rgba::BLUE));
        assert_eq!(fb.get_pixel(3, 3), Some(Rgba::WHITE));
        assert_eq!(fb.ink_pixels(Rgba::WHITE), 9);
    }

    #[test]
    fn test_blend_half_alpha() {
        let mut fb = Framebuffer::new(1, 1).unwrap();
        fb.clear(Rgba::WHITE);
        fb.blend_pixel(0, 0, Rgba::BLACK.with_alpha(128));
        let px = fb.get_pixel(0, 0).unwrap();
        assert!(px.r > 120 && px.r < 135);
        assert_eq!(px.a, 255);
    }

    #[test]
    fn test_out_of_bounds_writes_ignored() {
        let mut fb = Framebuffer::new(2, 2).unwrap();
        fb.blend_pixel(-1, 0, Rgba::RED);
        fb.blend_pixel(2, 0, Rgba::RED);
        fb.blend_pixel(0, 5, Rgba::RED);
        assert_eq!(fb.ink_pixels(Rgba::TRANSPARENT), 0);
    }

    #[test]
    fn test_luminance_stats() {
        let mut fb = Framebuffer::new(2, 1).unwrap();
        fb.blend_pixel(0, 0, Rgba::BLACK);
        fb.blend_pixel(1, 0, Rgba::WHITE);
        let stats = fb.luminance_stats();
        assert!(stats.min < 1.0);
        assert!(stats.max > 254.0);
        assert!((stats.mean - 127.5).abs() < 1.0);
    }
}
