//! Color types and chart palettes.
//!
//! [`Rgba`] is the pixel type of both the SVG scene and the rasterizer, and
//! [`Rgba::to_css`] writes the form SVG attributes expect. Categorical marks
//! (bars, pie slices) take their fill from [`Palette`], indexed by category
//! position.

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255, 255 = fully opaque).
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::new(255, 0, 0, 255);
    /// Opaque blue.
    pub const BLUE: Self = Self::new(0, 0, 255, 255);
    /// Axis and text grey.
    pub const AXIS: Self = Self::new(68, 68, 68, 255);
    /// Light grid lines.
    pub const GRID: Self = Self::new(229, 236, 246, 255);

    /// Create a new RGBA color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 255).
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create a color with modified alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Create a color with alpha from an opacity in `[0, 1]`.
    #[must_use]
    pub fn with_opacity(self, opacity: f32) -> Self {
        self.with_alpha((opacity.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    /// Convert to array representation.
    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Create from array representation.
    #[must_use]
    pub const fn from_array(arr: [u8; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }

    /// CSS color string (`rgb(..)` when opaque, `rgba(..)` otherwise).
    #[must_use]
    pub fn to_css(self) -> String {
        if self.a == 255 {
            format!("rgb({},{},{})", self.r, self.g, self.b)
        } else {
            format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, f32::from(self.a) / 255.0)
        }
    }

    /// Linear interpolation between two colors.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let inv_t = 1.0 - t;

        Self::new(
            (f32::from(self.r) * inv_t + f32::from(other.r) * t) as u8,
            (f32::from(self.g) * inv_t + f32::from(other.g) * t) as u8,
            (f32::from(self.b) * inv_t + f32::from(other.b) * t) as u8,
            (f32::from(self.a) * inv_t + f32::from(other.a) * t) as u8,
        )
    }

    /// Relative luminance (ITU-R BT.709), 0-255.
    #[must_use]
    pub fn luminance(self) -> f32 {
        0.2126 * f32::from(self.r) + 0.7152 * f32::from(self.g) + 0.0722 * f32::from(self.b)
    }
}

/// Qualitative palette used for categorical marks (bars, pie slices).
#[derive(Debug, Clone, Copy, Default)]
pub struct Palette;

impl Palette {
    /// Ten distinguishable hues, cycled by index.
    pub const CATEGORY10: [Rgba; 10] = [
        Rgba::rgb(99, 110, 250),
        Rgba::rgb(239, 85, 59),
        Rgba::rgb(0, 204, 150),
        Rgba::rgb(171, 99, 250),
        Rgba::rgb(255, 161, 90),
        Rgba::rgb(25, 211, 243),
        Rgba::rgb(255, 102, 146),
        Rgba::rgb(182, 232, 128),
        Rgba::rgb(255, 151, 255),
        Rgba::rgb(254, 203, 82),
    ];

    /// Default single-series mark color.
    pub const PRIMARY: Rgba = Self::CATEGORY10[0];

    /// Color for the `index`-th category.
    #[must_use]
    pub fn category(index: usize) -> Rgba {
        Self::CATEGORY10[index % Self::CATEGORY10.len()]
    }
}
