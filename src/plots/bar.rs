//! Vertical bar chart over categories.

use super::frame::Frame;
use crate::color::Palette;
use crate::error::{Error, Result};
use crate::output::SvgEncoder;
use crate::scale::{BandScale, ColorScale, LinearScale, Scale};

/// How bars are colored.
#[derive(Debug, Clone, Default)]
pub enum BarColor {
    /// Every bar the same color.
    #[default]
    Uniform,
    /// One qualitative palette color per category.
    Categorical,
    /// Continuous color from a value per bar (plasma scale).
    Continuous(Vec<Option<f64>>),
}

/// Builder for creating bar charts.
#[derive(Debug, Clone)]
pub struct BarChart {
    categories: Vec<String>,
    values: Vec<Option<f64>>,
    color: BarColor,
    title: String,
    x_label: String,
    y_label: String,
    width: u32,
    height: u32,
}

impl Default for BarChart {
    fn default() -> Self {
        Self::new()
    }
}

impl BarChart {
    /// Create a new bar chart builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            categories: Vec::new(),
            values: Vec::new(),
            color: BarColor::default(),
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            width: 800,
            height: 500,
        }
    }

    /// Set the category labels, in display order.
    #[must_use]
    pub fn categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    /// Set the bar heights; `None` leaves the slot empty.
    #[must_use]
    pub fn values(mut self, values: Vec<Option<f64>>) -> Self {
        self.values = values;
        self
    }

    /// Set the coloring mode.
    #[must_use]
    pub fn color(mut self, color: BarColor) -> Self {
        self.color = color;
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

    /// Number of bars actually drawn.
    #[must_use]
    pub fn bar_count(&self) -> usize {
        self.values.iter().flatten().filter(|v| v.is_finite()).count()
    }

    /// Build and validate the bar chart.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no categories or the value and color
    /// series do not match the categories.
    pub fn build(self) -> Result<Self> {
        if self.categories.is_empty() {
            return Err(Error::EmptyData);
        }
        if self.values.len() != self.categories.len() {
            return Err(Error::DataLengthMismatch { x_len: self.categories.len(), y_len: self.values.len() });
        }
        if let BarColor::Continuous(shades) = &self.color {
            if shades.len() != self.categories.len() {
                return Err(Error::DataLengthMismatch { x_len: self.categories.len(), y_len: shades.len() });
            }
        }
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidDimensions { width: self.width, height: self.height });
        }
        Ok(self)
    }

    fn value_domain(&self) -> (f64, f64) {
        let (lo, hi) = self
            .values
            .iter()
            .flatten()
            .filter(|v| v.is_finite())
            .fold((0.0_f64, 0.0_f64), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        if hi - lo < f64::EPSILON {
            (lo, lo + 1.0)
        } else {
            (lo, hi * 1.05)
        }
    }

    fn shade_scale(&self) -> Option<ColorScale> {
        let BarColor::Continuous(shades) = &self.color else {
            return None;
        };
        let present: Vec<f64> = shades.iter().flatten().copied().collect();
        let (lo, hi) = crate::scale::extent(&present)?;
        let hi = if hi - lo < f64::EPSILON { lo + 1.0 } else { hi };
        ColorScale::plasma((lo, hi))
    }

    /// Render the chart to a vector scene.
    ///
    /// # Errors
    ///
    /// Returns an error if the chart has no categories.
    pub fn to_svg(&self) -> Result<SvgEncoder> {
        let frame = Frame::new(self.width, self.height);
        let bands = BandScale::new(self.categories.len(), frame.x_range(), 0.2)?;
        let y_scale = LinearScale::new(self.value_domain(), frame.y_range())?;
        let shades = self.shade_scale();

        let mut scene = frame.scene(&self.title);
        scene = frame.y_axis(scene, &y_scale, &self.y_label);

        let zero = y_scale.scale(0.0);
        for (i, value) in self.values.iter().enumerate() {
            let Some(value) = value.filter(|v| v.is_finite()) else {
                continue;
            };
            let fill = match (&self.color, &shades) {
                (BarColor::Continuous(values), Some(scale)) => {
                    values[i].map_or(Palette::PRIMARY, |v| scale.scale(v))
                }
                (BarColor::Categorical, _) => Palette::category(i),
                _ => Palette::PRIMARY,
            };
            let top = y_scale.scale(value);
            let (y, h) = if top <= zero { (top, zero - top) } else { (zero, top - zero) };
            scene = scene.rect(bands.start(i), y, bands.bandwidth(), h.max(1.0), fill);
        }

        Ok(frame.x_axis_bands(scene, &bands, &self.categories, &self.x_label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::output::SvgElement;

    fn bar_fills(scene: &SvgEncoder) -> Vec<Rgba> {
        scene
            .elements()
            .iter()
            .filter_map(|e| match e {
                SvgElement::Rect { fill, .. } => Some(*fill),
                _ => None,
            })
            .collect()
    }

    fn chart() -> BarChart {
        BarChart::new()
            .categories(vec!["M".into(), "F".into(), "X".into()])
            .values(vec![Some(5.0), Some(3.0), None])
    }

    #[test]
    fn test_missing_value_draws_no_bar() {
        let chart = chart().build().unwrap();
        assert_eq!(chart.bar_count(), 2);
        assert_eq!(bar_fills(&chart.to_svg().unwrap()).len(), 2);
    }

    #[test]
    fn test_length_mismatch() {
        let result = BarChart::new().categories(vec!["a".into()]).values(vec![]).build();
        assert!(matches!(result, Err(Error::DataLengthMismatch { .. })));
        assert!(matches!(BarChart::new().build(), Err(Error::EmptyData)));
    }

    #[test]
    fn test_categorical_colors_differ() {
        let scene = chart().color(BarColor::Categorical).build().unwrap().to_svg().unwrap();
        let fills = bar_fills(&scene);
        assert_ne!(fills[0], fills[1]);
    }

    #[test]
    fn test_continuous_color_extremes() {
        let scene = chart()
            .color(BarColor::Continuous(vec![Some(5.0), Some(3.0), None]))
            .build()
            .unwrap()
            .to_svg()
            .unwrap();
        let fills = bar_fills(&scene);
        assert_eq!(fills[0], Rgba::rgb(240, 249, 33));
        assert_eq!(fills[1], Rgba::rgb(13, 8, 135));
    }

    #[test]
    fn test_continuous_color_length_checked() {
        let result = chart().color(BarColor::Continuous(vec![Some(1.0)])).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_all_zero_values_render() {
        let chart = BarChart::new().categories(vec!["a".into()]).values(vec![Some(0.0)]).build().unwrap();
        assert_eq!(bar_fills(&chart.to_svg().unwrap()).len(), 1);
    }
}
