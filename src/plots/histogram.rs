//! Histogram over equal-width bins.

use super::frame::Frame;
use crate::color::{Palette, Rgba};
use crate::error::{Error, Result};
use crate::output::SvgEncoder;
use crate::scale::{LinearScale, Scale};
use crate::stats::{histogram_bins, sturges_bins, Bin};

/// Builder for creating histograms.
#[derive(Debug, Clone)]
pub struct Histogram {
    data: Vec<f64>,
    nbins: Option<usize>,
    color: Rgba,
    title: String,
    x_label: String,
    width: u32,
    height: u32,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    /// Create a new histogram builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            nbins: None,
            color: Palette::PRIMARY,
            title: String::new(),
            x_label: String::new(),
            width: 800,
            height: 500,
        }
    }

    /// Set the data.
    #[must_use]
    pub fn data(mut self, data: &[f64]) -> Self {
        self.data = data.to_vec();
        self
    }

    /// Fix the number of bins (Sturges' rule otherwise).
    #[must_use]
    pub fn bins(mut self, nbins: usize) -> Self {
        self.nbins = Some(nbins.max(1));
        self
    }

    /// Set the bar color.
    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    /// Set the chart title.
    #[must_use]
    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Set the x-axis label.
    #[must_use]
    pub fn x_label(mut self, label: &str) -> Self {
        self.x_label = label.to_string();
        self
    }

    /// Set the output dimensions.
    #[must_use]
    pub fn dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Number of bins that will be drawn.
    #[must_use]
    pub fn bin_count(&self) -> usize {
        self.nbins.unwrap_or_else(|| sturges_bins(self.data.len()))
    }

    /// Bins with their counts.
    #[must_use]
    pub fn bins_with_counts(&self) -> Vec<Bin> {
        histogram_bins(&self.data, self.bin_count())
    }

    /// Build and validate the histogram.
    ///
    /// # Errors
    ///
    /// Returns an error if data has no finite value.
    pub fn build(self) -> Result<Self> {
        if !self.data.iter().any(|v| v.is_finite()) {
            return Err(Error::EmptyData);
        }
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidDimensions { width: self.width, height: self.height });
        }
        Ok(self)
    }

    /// Render the chart to a vector scene.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is empty.
    pub fn to_svg(&self) -> Result<SvgEncoder> {
        let bins = self.bins_with_counts();
        let (first, last) = match (bins.first(), bins.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(Error::EmptyData),
        };
        let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);

        let frame = Frame::new(self.width, self.height);
        let x_scale = LinearScale::new((first.start, last.end), frame.x_range())?;
        let y_scale = LinearScale::new((0.0, max_count as f64), frame.y_range())?;

        let mut scene = frame.scene(&self.title);
        scene = frame.y_axis(scene, &y_scale, "count");

        let (base, _) = frame.y_range();
        for bin in bins.iter().filter(|b| b.count > 0) {
            let x0 = x_scale.scale(bin.start);
            let x1 = x_scale.scale(bin.end);
            let top = y_scale.scale(bin.count as f64);
            scene = scene.rect_outlined(x0, top, (x1 - x0).max(1.0), base - top, self.color, Rgba::WHITE);
        }

        Ok(frame.x_axis(scene, &x_scale, &self.x_label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::SvgElement;

    #[test]
    fn test_histogram_builder() {
        let hist = Histogram::new().data(&[1.0, 2.0, 3.0, 4.0, 5.0]).bins(5).build().unwrap();
        assert_eq!(hist.bin_count(), 5);
        assert_eq!(hist.bins_with_counts().iter().map(|b| b.count).sum::<usize>(), 5);
    }

    #[test]
    fn test_default_bins_follow_sturges() {
        let data: Vec<f64> = (0..100).map(f64::from).collect();
        assert_eq!(Histogram::new().data(&data).bin_count(), 8);
    }

    #[test]
    fn test_histogram_empty() {
        assert!(Histogram::new().build().is_err());
        assert!(Histogram::new().data(&[f64::NAN]).build().is_err());
    }

    #[test]
    fn test_one_bar_per_nonempty_bin() {
        let scene = Histogram::new()
            .data(&[0.0, 0.0, 10.0])
            .bins(10)
            .build()
            .unwrap()
            .to_svg()
            .unwrap();
        let bars = scene.elements().iter().filter(|e| matches!(e, SvgElement::Rect { .. })).count();
        assert_eq!(bars, 2);
    }

    #[test]
    fn test_constant_data_renders() {
        let hist = Histogram::new().data(&[7.0; 4]).bins(30).build().unwrap();
        assert!(hist.to_svg().is_ok());
    }
}
