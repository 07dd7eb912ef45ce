//! Scatter plot with optional least-squares trend line.

use super::frame::Frame;
use crate::color::{Palette, Rgba};
use crate::error::{Error, Result};
use crate::output::SvgEncoder;
use crate::scale::{extent, LinearScale, Scale};
use crate::stats::LinearFit;

/// Builder for creating scatter plots.
#[derive(Debug, Clone)]
pub struct ScatterPlot {
    x_data: Vec<f64>,
    y_data: Vec<f64>,
    color: Rgba,
    point_size: f32,
    alpha: f32,
    trend: Option<LinearFit>,
    title: String,
    x_label: String,
    y_label: String,
    width: u32,
    height: u32,
}

impl Default for ScatterPlot {
    fn default() -> Self {
        Self::new()
    }
}

impl ScatterPlot {
    /// Create a new scatter plot builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            x_data: Vec::new(),
            y_data: Vec::new(),
            color: Palette::PRIMARY,
            point_size: 6.0,
            alpha: 1.0,
            trend: None,
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            width: 800,
            height: 500,
        }
    }

    /// Set the x-axis data.
    #[must_use]
    pub fn x(mut self, data: &[f64]) -> Self {
        self.x_data = data.to_vec();
        self
    }

    /// Set the y-axis data.
    #[must_use]
    pub fn y(mut self, data: &[f64]) -> Self {
        self.y_data = data.to_vec();
        self
    }

    /// Set the point color.
    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    /// Set the point diameter in pixels.
    #[must_use]
    pub fn size(mut self, size: f32) -> Self {
        self.point_size = size;
        self
    }

    /// Set the alpha transparency (0.0 - 1.0).
    #[must_use]
    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    /// Overlay a fitted line across the x extent.
    #[must_use]
    pub fn trendline(mut self, fit: Option<LinearFit>) -> Self {
        self.trend = fit;
        self
    }

    /// Set the chart title.
    #[must_use]
    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Set the axis labels.
    #[must_use]
    pub fn labels(mut self, x: &str, y: &str) -> Self {
        self.x_label = x.to_string();
        self.y_label = y.to_string();
        self
    }

    /// Set the output dimensions.
    #[must_use]
    pub fn dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Get the number of points.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.x_data.len().min(self.y_data.len())
    }

    /// Build and validate the scatter plot.
    ///
    /// # Errors
    ///
    /// Returns an error if data is empty or x/y lengths don't match.
    pub fn build(self) -> Result<Self> {
        if self.x_data.is_empty() || self.y_data.is_empty() {
            return Err(Error::EmptyData);
        }
        if self.x_data.len() != self.y_data.len() {
            return Err(Error::DataLengthMismatch { x_len: self.x_data.len(), y_len: self.y_data.len() });
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
    /// Returns an error if no finite point exists.
    pub fn to_svg(&self) -> Result<SvgEncoder> {
        let frame = Frame::new(self.width, self.height);
        let x_scale = LinearScale::from_data(&pad(&self.x_data), frame.x_range()).ok_or(Error::EmptyData)?;
        let y_scale = LinearScale::from_data(&pad(&self.y_data), frame.y_range()).ok_or(Error::EmptyData)?;

        let mut scene = frame.scene(&self.title);
        scene = frame.y_axis(scene, &y_scale, &self.y_label);
        scene = frame.x_axis(scene, &x_scale, &self.x_label);

        let color = self.color.with_opacity(self.alpha);
        let radius = self.point_size / 2.0;
        for (&x, &y) in self.x_data.iter().zip(&self.y_data) {
            if x.is_finite() && y.is_finite() {
                scene = scene.circle(x_scale.scale(x), y_scale.scale(y), radius, color);
            }
        }

        if let (Some(fit), Some((lo, hi))) = (self.trend, extent(&self.x_data)) {
            let points = [lo, hi].map(|x| (x_scale.scale(x), y_scale.scale(fit.predict(x))));
            scene = scene.polyline(&points, Rgba::rgb(239, 85, 59), 2.0);
        }

        Ok(scene)
    }
}

/// Data extent widened by 5% on each side so edge points are not clipped.
fn pad(data: &[f64]) -> Vec<f64> {
    match extent(data) {
        Some((lo, hi)) if hi > lo => {
            let margin = (hi - lo) * 0.05;
            vec![lo - margin, hi + margin]
        }
        Some((lo, hi)) => vec![lo, hi],
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::SvgElement;

    fn circles(scene: &SvgEncoder) -> Vec<Rgba> {
        scene
            .elements()
            .iter()
            .filter_map(|e| match e {
                SvgElement::Circle { fill, .. } => Some(*fill),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_scatter_plot_builder() {
        let plot = ScatterPlot::new()
            .x(&[1.0, 2.0, 3.0])
            .y(&[4.0, 5.0, 6.0])
            .color(Rgba::RED)
            .size(5.0)
            .build()
            .unwrap();

        assert_eq!(plot.point_count(), 3);
    }

    #[test]
    fn test_scatter_plot_empty_data() {
        assert!(matches!(ScatterPlot::new().build(), Err(Error::EmptyData)));
    }

    #[test]
    fn test_scatter_plot_length_mismatch() {
        let result = ScatterPlot::new().x(&[1.0, 2.0, 3.0]).y(&[4.0, 5.0]).build();
        assert!(matches!(result, Err(Error::DataLengthMismatch { x_len: 3, y_len: 2 })));
    }

    #[test]
    fn test_one_circle_per_point_with_alpha() {
        let scene = ScatterPlot::new()
            .x(&[1.0, 2.0, 3.0])
            .y(&[4.0, 5.0, 6.0])
            .alpha(0.6)
            .build()
            .unwrap()
            .to_svg()
            .unwrap();
        let fills = circles(&scene);
        assert_eq!(fills.len(), 3);
        assert!(fills.iter().all(|c| c.a == 153));
    }

    #[test]
    fn test_trendline_adds_polyline() {
        let fit = LinearFit { slope: 1.0, intercept: 3.0, r_squared: 1.0 };
        let scene = ScatterPlot::new()
            .x(&[1.0, 2.0, 3.0])
            .y(&[4.0, 5.0, 6.0])
            .trendline(Some(fit))
            .build()
            .unwrap()
            .to_svg()
            .unwrap();
        assert!(scene.elements().iter().any(|e| matches!(e, SvgElement::Polyline { .. })));
    }

    #[test]
    fn test_single_point_renders() {
        let scene = ScatterPlot::new().x(&[2.0]).y(&[2.0]).build().unwrap().to_svg().unwrap();
        assert_eq!(circles(&scene).len(), 1);
    }
}
