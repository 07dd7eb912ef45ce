//! Scale functions for data-to-visual mappings.
//!
//! Scales transform data values to visual properties (position, color).
//! Based on the Grammar of Graphics [Wilkinson 2005].

use crate::color::Rgba;
use crate::error::{Error, Result};

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);

    /// Get the range extent.
    fn range(&self) -> (R, R);
}

/// Linear scale for continuous-to-continuous mapping.
#[derive(Debug, Clone, Copy)]
pub struct LinearScale {
    domain_min: f64,
    domain_max: f64,
    range_min: f32,
    range_max: f32,
}

impl LinearScale {
    /// Create a new linear scale.
    ///
    /// # Errors
    ///
    /// Returns an error if domain_min equals domain_max.
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Result<Self> {
        if (domain.0 - domain.1).abs() < f64::EPSILON {
            return Err(Error::ScaleDomain("Domain min and max cannot be equal".to_string()));
        }

        Ok(Self { domain_min: domain.0, domain_max: domain.1, range_min: range.0, range_max: range.1 })
    }

    /// Create a scale over the data extent, padded when the data is constant.
    #[must_use]
    pub fn from_data(data: &[f64], range: (f32, f32)) -> Option<Self> {
        let (min, max) = extent(data)?;
        let (min, max) = if (max - min).abs() < f64::EPSILON { (min - 1.0, max + 1.0) } else { (min, max) };
        Self::new((min, max), range).ok()
    }

    /// Round tick values covering the domain, about `count` of them.
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = (self.domain_min.min(self.domain_max), self.domain_min.max(self.domain_max));
        let step = nice_step((hi - lo) / count.max(1) as f64);
        if step <= 0.0 || !step.is_finite() {
            return vec![lo, hi];
        }
        let first = (lo / step).ceil() * step;
        let mut ticks = Vec::new();
        let mut v = first;
        while v <= hi + step * 1e-9 {
            // Avoid printing -0.
            ticks.push(if v.abs() < step * 1e-9 { 0.0 } else { v });
            v += step;
        }
        ticks
    }
}

impl Scale<f64, f32> for LinearScale {
    fn scale(&self, value: f64) -> f32 {
        let t = (value - self.domain_min) / (self.domain_max - self.domain_min);
        self.range_min + t as f32 * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f32, f32) {
        (self.range_min, self.range_max)
    }
}

/// Min and max of finite values.
#[must_use]
pub fn extent(data: &[f64]) -> Option<(f64, f64)> {
    let mut finite = data.iter().copied().filter(|v| v.is_finite()).peekable();
    finite.peek()?;
    Some(finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

/// 1, 2 or 5 times a power of ten, at least `raw`.
fn nice_step(raw: f64) -> f64 {
    if raw <= 0.0 || !raw.is_finite() {
        return 0.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let nice = if residual <= 1.0 {
        1.0
    } else if residual <= 2.0 {
        2.0
    } else if residual <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Band scale for categorical positions (one band per category).
#[derive(Debug, Clone)]
pub struct BandScale {
    count: usize,
    range_min: f32,
    range_max: f32,
    padding: f32,
}

impl BandScale {
    /// Create a band scale over `count` categories.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no categories.
    pub fn new(count: usize, range: (f32, f32), padding: f32) -> Result<Self> {
        if count == 0 {
            return Err(Error::EmptyData);
        }
        Ok(Self { count, range_min: range.0, range_max: range.1, padding: padding.clamp(0.0, 0.9) })
    }

    /// Width of one band including padding.
    #[must_use]
    pub fn step(&self) -> f32 {
        (self.range_max - self.range_min) / self.count as f32
    }

    /// Width of the drawn mark inside a band.
    #[must_use]
    pub fn bandwidth(&self) -> f32 {
        self.step() * (1.0 - self.padding)
    }

    /// Left edge of the mark for band `index`.
    #[must_use]
    pub fn start(&self, index: usize) -> f32 {
        self.range_min + self.step() * index as f32 + self.step() * self.padding / 2.0
    }

    /// Center of band `index`.
    #[must_use]
    pub fn center(&self, index: usize) -> f32 {
        self.range_min + self.step() * (index as f32 + 0.5)
    }
}

/// Color scale for mapping values to colors.
#[derive(Debug, Clone)]
pub struct ColorScale {
    colors: Vec<Rgba>,
    domain_min: f64,
    domain_max: f64,
}

impl ColorScale {
    /// Create a new color scale.
    ///
    /// # Errors
    ///
    /// Returns an error if colors is empty or domain is invalid.
    pub fn new(colors: Vec<Rgba>, domain: (f64, f64)) -> Result<Self> {
        if colors.is_empty() {
            return Err(Error::ScaleDomain("Color scale requires at least one color".to_string()));
        }

        if (domain.0 - domain.1).abs() < f64::EPSILON {
            return Err(Error::ScaleDomain("Domain min and max cannot be equal".to_string()));
        }

        Ok(Self { colors, domain_min: domain.0, domain_max: domain.1 })
    }

    /// Create a viridis-like plasma scale (continuous bar color encoding).
    #[must_use]
    pub fn plasma(domain: (f64, f64)) -> Option<Self> {
        Self::new(
            vec![
                Rgba::rgb(13, 8, 135),
                Rgba::rgb(126, 3, 168),
                Rgba::rgb(204, 71, 120),
                Rgba::rgb(248, 149, 64),
                Rgba::rgb(240, 249, 33),
            ],
            domain,
        )
        .ok()
    }
}

impl Scale<f64, Rgba> for ColorScale {
    fn scale(&self, value: f64) -> Rgba {
        let t = ((value - self.domain_min) / (self.domain_max - self.domain_min)).clamp(0.0, 1.0);

        if self.colors.len() == 1 {
            return self.colors[0];
        }

        let segment_count = self.colors.len() - 1;
        let segment = (t * segment_count as f64).floor() as usize;
        let segment = segment.min(segment_count - 1);

        let local_t = t * segment_count as f64 - segment as f64;

        self.colors[segment].lerp(self.colors[segment + 1], local_t as f32)
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (Rgba, Rgba) {
        (*self.colors.first().unwrap_or(&Rgba::BLACK), *self.colors.last().unwrap_or(&Rgba::WHITE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_scale() {
        let scale = LinearScale::new((0.0, 100.0), (0.0, 1.0)).unwrap();
        assert!((scale.scale(0.0) - 0.0).abs() < 0.001);
        assert!((scale.scale(50.0) - 0.5).abs() < 0.001);
        assert!((scale.scale(100.0) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_linear_scale_inverted_range() {
        let scale = LinearScale::new((0.0, 10.0), (500.0, 100.0)).unwrap();
        assert!((scale.scale(0.0) - 500.0).abs() < 0.001);
        assert!((scale.scale(10.0) - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_equal_domain_rejected() {
        assert!(LinearScale::new((1.0, 1.0), (0.0, 1.0)).is_err());
        // from_data pads a constant extent instead.
        assert!(LinearScale::from_data(&[3.0, 3.0], (0.0, 1.0)).is_some());
        assert!(LinearScale::from_data(&[], (0.0, 1.0)).is_none());
    }

    #[test]
    fn test_ticks_are_round() {
        let scale = LinearScale::new((0.0, 200.0), (0.0, 1.0)).unwrap();
        let ticks = scale.ticks(5);
        assert_eq!(ticks, vec![0.0, 50.0, 100.0, 150.0, 200.0]);
    }

    #[test]
    fn test_extent_skips_non_finite() {
        assert_eq!(extent(&[f64::NAN, 2.0, -1.0, f64::INFINITY]), Some((-1.0, 2.0)));
        assert_eq!(extent(&[f64::NAN]), None);
    }

    #[test]
    fn test_band_scale() {
        let bands = BandScale::new(4, (0.0, 400.0), 0.2).unwrap();
        assert!((bands.step() - 100.0).abs() < 0.001);
        assert!((bands.bandwidth() - 80.0).abs() < 0.001);
        assert!((bands.start(1) - 110.0).abs() < 0.001);
        assert!((bands.center(3) - 350.0).abs() < 0.001);
        assert!(BandScale::new(0, (0.0, 1.0), 0.1).is_err());
    }

    #[test]
    fn test_color_scale_endpoints() {
        let scale = ColorScale::plasma((0.0, 1000.0)).unwrap();
        assert_eq!(scale.scale(0.0), Rgba::rgb(13, 8, 135));
        assert_eq!(scale.scale(1000.0), Rgba::rgb(240, 249, 33));
        assert_eq!(scale.scale(5000.0), Rgba::rgb(240, 249, 33));
    }
}
