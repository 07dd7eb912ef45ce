//! Pie chart with a percentage legend.

use super::frame::Frame;
use crate::color::{Palette, Rgba};
use crate::error::{Error, Result};
use crate::output::{SvgEncoder, TextAnchor};
use std::f32::consts::TAU;

const LEGEND_WIDTH: f32 = 200.0;

/// Builder for creating pie charts.
#[derive(Debug, Clone)]
pub struct PieChart {
    names: Vec<String>,
    values: Vec<Option<f64>>,
    title: String,
    width: u32,
    height: u32,
}

/// One drawn slice.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    /// Category name.
    pub name: String,
    /// Raw value.
    pub value: f64,
    /// Share of the total, 0-100.
    pub percent: f64,
    /// Start angle, radians clockwise from 12 o'clock.
    pub start: f32,
    /// End angle.
    pub end: f32,
}

impl Default for PieChart {
    fn default() -> Self {
        Self::new()
    }
}

impl PieChart {
    /// Create a new pie chart builder.
    #[must_use]
    pub fn new() -> Self {
        Self { names: Vec::new(), values: Vec::new(), title: String::new(), width: 800, height: 500 }
    }

    /// Set slice names and values; missing or non-positive values are skipped.
    #[must_use]
    pub fn slices(mut self, names: Vec<String>, values: Vec<Option<f64>>) -> Self {
        self.names = names;
        self.values = values;
        self
    }

    /// Set the chart title.
    #[must_use]
    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Set the output dimensions.
    #[must_use]
    pub fn dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Build and validate the pie chart.
    ///
    /// # Errors
    ///
    /// Returns an error if names and values differ in length or no slice
    /// has a positive value.
    pub fn build(self) -> Result<Self> {
        if self.names.len() != self.values.len() {
            return Err(Error::DataLengthMismatch { x_len: self.names.len(), y_len: self.values.len() });
        }
        if self.total() <= 0.0 {
            return Err(Error::EmptyData);
        }
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidDimensions { width: self.width, height: self.height });
        }
        Ok(self)
    }

    fn total(&self) -> f64 {
        self.values.iter().flatten().filter(|v| v.is_finite() && **v > 0.0).sum()
    }

    /// Slices in input order with their angles.
    #[must_use]
    pub fn layout(&self) -> Vec<Slice> {
        let total = self.total();
        if total <= 0.0 {
            return Vec::new();
        }
        let mut angle = 0.0_f32;
        self.names
            .iter()
            .zip(&self.values)
            .filter_map(|(name, value)| {
                let value = value.filter(|v| v.is_finite() && *v > 0.0)?;
                let share = value / total;
                let start = angle;
                angle += (share * f64::from(TAU)) as f32;
                Some(Slice { name: name.clone(), value, percent: share * 100.0, start, end: angle })
            })
            .collect()
    }

    /// Render the chart to a vector scene.
    ///
    /// # Errors
    ///
    /// Returns an error if there is nothing to draw.
    pub fn to_svg(&self) -> Result<SvgEncoder> {
        let slices = self.layout();
        if slices.is_empty() {
            return Err(Error::EmptyData);
        }

        let frame = Frame::new(self.width, self.height).with_right_margin(LEGEND_WIDTH);
        let (x0, x1) = frame.x_range();
        let (y_bottom, y_top) = frame.y_range();
        let (cx, cy) = ((x0 + x1) / 2.0, (y_bottom + y_top) / 2.0);
        let radius = ((x1 - x0).min(y_bottom - y_top) / 2.0).max(1.0);

        let mut scene = frame.scene(&self.title);
        let count = slices.len();
        for (i, slice) in slices.iter().enumerate() {
            // Close the circle exactly despite f32 accumulation.
            let end = if i + 1 == count { TAU } else { slice.end };
            scene = scene.wedge(cx, cy, radius, slice.start, end, Palette::category(i));
        }

        let legend_x = self.width as f32 - LEGEND_WIDTH + 16.0;
        for (i, slice) in slices.iter().enumerate() {
            let y = y_top + 22.0 * i as f32;
            scene = scene.rect(legend_x, y, 12.0, 12.0, Palette::category(i)).text_anchored(
                legend_x + 18.0,
                y + 10.0,
                &format!("{} ({:.1}%)", slice.name, slice.percent),
                12.0,
                Rgba::AXIS,
                TextAnchor::Start,
            );
        }

        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::SvgElement;
    use approx::assert_relative_eq;

    fn gender() -> PieChart {
        PieChart::new().slices(vec!["M".into(), "F".into()], vec![Some(1.0), Some(3.0)])
    }

    #[test]
    fn test_layout_shares() {
        let slices = gender().build().unwrap().layout();
        assert_eq!(slices.len(), 2);
        assert_relative_eq!(slices[0].percent, 25.0);
        assert_relative_eq!(slices[1].percent, 75.0);
        assert_relative_eq!(slices[0].end, TAU / 4.0, epsilon = 1e-5);
        assert_relative_eq!(slices[1].start, slices[0].end);
    }

    #[test]
    fn test_skips_missing_and_zero() {
        let pie = PieChart::new()
            .slices(vec!["a".into(), "b".into(), "c".into()], vec![Some(2.0), None, Some(0.0)])
            .build()
            .unwrap();
        assert_eq!(pie.layout().len(), 1);
    }

    #[test]
    fn test_empty_total_rejected() {
        let result = PieChart::new().slices(vec!["a".into()], vec![Some(0.0)]).build();
        assert!(matches!(result, Err(Error::EmptyData)));
        let result = PieChart::new().slices(vec!["a".into()], vec![]).build();
        assert!(matches!(result, Err(Error::DataLengthMismatch { .. })));
    }

    #[test]
    fn test_scene_has_wedges_and_legend() {
        let scene = gender().title("Gender").build().unwrap().to_svg().unwrap();
        let wedges: Vec<(f32, f32)> = scene
            .elements()
            .iter()
            .filter_map(|e| match e {
                SvgElement::Wedge { start, end, .. } => Some((*start, *end)),
                _ => None,
            })
            .collect();
        assert_eq!(wedges.len(), 2);
        assert_eq!(wedges[1].1, TAU);
        assert!(scene.render().contains("F (75.0%)"));
    }
}
