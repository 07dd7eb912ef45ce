//! Declarative chart specifications.
//!
//! A [`ChartSpec`] binds table fields to a chart kind. Pages build specs
//! from aggregation results; rendering validates the bindings, extracts the
//! series and hands them to the plot builders in [`crate::plots`].
//!
//! ```
//! use claim_explorer::chart::ChartSpec;
//! use claim_explorer::dataset::{Column, Table};
//!
//! let table = Table::from_columns(vec![
//!     Column::categorical("car_type", ["SUV", "Minivan"]),
//!     Column::numeric("clm_amt", vec![1500.0, 900.0]),
//! ]).unwrap();
//!
//! let spec = ChartSpec::bar(table, "car_type", "clm_amt")
//!     .title("Average claim amount by vehicle type")
//!     .label("clm_amt", "Average Claim Amount ($)");
//! let svg = spec.to_svg().unwrap();
//! assert!(svg.contains("Average Claim Amount ($)"));
//! ```

use crate::dataset::{ColumnKind, Table};
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::output::{PngEncoder, SvgEncoder};
use crate::plots::{BarChart, BarColor, Histogram, PieChart, ScatterPlot};
use crate::render;
use crate::stats::ols;
use serde::Serialize;
use std::collections::BTreeMap;

/// Chart kinds the pages use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Points for (x, y) pairs.
    Scatter,
    /// One bar per row.
    Bar,
    /// Distribution of one numeric field.
    Histogram,
    /// Shares of a total.
    Pie,
}

/// A chart bound to its data.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    kind: ChartKind,
    title: String,
    /// Scatter/histogram x, bar category, pie names.
    x: String,
    /// Scatter/bar y, pie values. Empty for histograms.
    y: String,
    labels: BTreeMap<String, String>,
    color: Option<String>,
    opacity: f32,
    trendline: bool,
    nbins: Option<usize>,
    width: u32,
    height: u32,
    rows: usize,
    #[serde(skip)]
    data: Table,
}

impl ChartSpec {
    fn new(kind: ChartKind, data: Table, x: &str, y: &str) -> Self {
        Self {
            kind,
            title: String::new(),
            x: x.to_string(),
            y: y.to_string(),
            labels: BTreeMap::new(),
            color: None,
            opacity: 1.0,
            trendline: false,
            nbins: None,
            width: 800,
            height: 500,
            rows: data.row_count(),
            data,
        }
    }

    /// Scatter plot of `y` against `x`.
    #[must_use]
    pub fn scatter(data: Table, x: &str, y: &str) -> Self {
        Self::new(ChartKind::Scatter, data, x, y)
    }

    /// Bar chart with one bar per row: category `x`, height `y`.
    #[must_use]
    pub fn bar(data: Table, x: &str, y: &str) -> Self {
        Self::new(ChartKind::Bar, data, x, y)
    }

    /// Histogram of `x`.
    #[must_use]
    pub fn histogram(data: Table, x: &str) -> Self {
        Self::new(ChartKind::Histogram, data, x, "")
    }

    /// Pie chart with slice `names` sized by `values`.
    #[must_use]
    pub fn pie(data: Table, names: &str, values: &str) -> Self {
        Self::new(ChartKind::Pie, data, names, values)
    }

    /// Set the title.
    #[must_use]
    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Display label for a field.
    #[must_use]
    pub fn label(mut self, field: &str, text: &str) -> Self {
        self.labels.insert(field.to_string(), text.to_string());
        self
    }

    /// Color bars continuously by a numeric field.
    #[must_use]
    pub fn color(mut self, field: &str) -> Self {
        self.color = Some(field.to_string());
        self
    }

    /// Mark opacity (scatter).
    #[must_use]
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Overlay an OLS trend line (scatter).
    #[must_use]
    pub fn trendline(mut self, enabled: bool) -> Self {
        self.trendline = enabled;
        self
    }

    /// Number of histogram bins.
    #[must_use]
    pub fn nbins(mut self, nbins: usize) -> Self {
        self.nbins = Some(nbins);
        self
    }

    /// Output size in pixels.
    #[must_use]
    pub fn dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Chart kind.
    #[must_use]
    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    /// Chart title.
    #[must_use]
    pub fn chart_title(&self) -> &str {
        &self.title
    }

    /// The plotted table.
    #[must_use]
    pub fn data(&self) -> &Table {
        &self.data
    }

    /// Label for a field: the configured one, or the raw field name.
    #[must_use]
    pub fn axis_label<'a>(&'a self, field: &'a str) -> &'a str {
        self.labels.get(field).map_or(field, String::as_str)
    }

    /// Check every field binding against the table.
    ///
    /// # Errors
    ///
    /// `ColumnNotFound` for an unknown field, `NonNumericColumn` for a
    /// categorical field where numbers are plotted, `EmptyData` when the
    /// table has no rows.
    pub fn validate(&self) -> Result<()> {
        let require_numeric = |field: &str| -> Result<()> {
            match self.data.column(field)?.kind() {
                ColumnKind::Numeric => Ok(()),
                ColumnKind::Categorical => Err(Error::NonNumericColumn { column: field.to_string() }),
            }
        };

        match self.kind {
            ChartKind::Scatter => {
                require_numeric(&self.x)?;
                require_numeric(&self.y)?;
            }
            ChartKind::Bar | ChartKind::Pie => {
                self.data.column(&self.x)?;
                require_numeric(&self.y)?;
            }
            ChartKind::Histogram => require_numeric(&self.x)?,
        }
        if let Some(color) = &self.color {
            require_numeric(color)?;
        }
        if self.data.row_count() == 0 {
            return Err(Error::EmptyData);
        }
        Ok(())
    }

    /// Render to a vector scene.
    ///
    /// # Errors
    ///
    /// Fails on invalid bindings or when nothing can be drawn.
    pub fn render(&self) -> Result<SvgEncoder> {
        self.validate()?;
        let x_label = self.axis_label(&self.x);
        let y_label = self.axis_label(&self.y);

        match self.kind {
            ChartKind::Scatter => {
                let xs = self.data.numeric(&self.x)?;
                let ys = self.data.numeric(&self.y)?;
                let (px, py): (Vec<f64>, Vec<f64>) =
                    xs.iter().zip(ys).filter_map(|(a, b)| Some(((*a)?, (*b)?))).unzip();
                let fit = if self.trendline { ols(xs, ys) } else { None };
                ScatterPlot::new()
                    .x(&px)
                    .y(&py)
                    .alpha(self.opacity)
                    .trendline(fit)
                    .title(&self.title)
                    .labels(x_label, y_label)
                    .dimensions(self.width, self.height)
                    .build()?
                    .to_svg()
            }
            ChartKind::Histogram => {
                let values = self.data.numbers(&self.x)?;
                let mut hist = Histogram::new()
                    .data(&values)
                    .title(&self.title)
                    .x_label(x_label)
                    .dimensions(self.width, self.height);
                if let Some(nbins) = self.nbins {
                    hist = hist.bins(nbins);
                }
                hist.build()?.to_svg()
            }
            ChartKind::Bar => {
                let categories = self.category_labels()?;
                let color = match &self.color {
                    Some(field) => BarColor::Continuous(self.data.numeric(field)?.to_vec()),
                    None => BarColor::Uniform,
                };
                BarChart::new()
                    .categories(categories)
                    .values(self.data.numeric(&self.y)?.to_vec())
                    .color(color)
                    .title(&self.title)
                    .labels(x_label, y_label)
                    .dimensions(self.width, self.height)
                    .build()?
                    .to_svg()
            }
            ChartKind::Pie => PieChart::new()
                .slices(self.category_labels()?, self.data.numeric(&self.y)?.to_vec())
                .title(&self.title)
                .dimensions(self.width, self.height)
                .build()?
                .to_svg(),
        }
    }

    fn category_labels(&self) -> Result<Vec<String>> {
        Ok(self.data.labels(&self.x)?.into_iter().map(Option::unwrap_or_default).collect())
    }

    /// Render to SVG markup.
    pub fn to_svg(&self) -> Result<String> {
        Ok(self.render()?.render())
    }

    /// Rasterize the chart.
    pub fn to_framebuffer(&self) -> Result<Framebuffer> {
        render::rasterize(&self.render()?)
    }

    /// Rasterize and encode as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        PngEncoder::to_bytes(&self.to_framebuffer()?)
    }

    /// The chart settings (without data) as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::dataset::Column;

    fn table() -> Table {
        Table::from_columns(vec![
            Column::numeric("age", vec![25.0, 40.0, 55.0, 61.0]),
            Column::numeric("clm_amt", vec![0.0, 1200.0, 300.0, 0.0]),
            Column::categorical("gender", ["M", "F", "F", "M"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_missing_field_fails_immediately() {
        let spec = ChartSpec::scatter(table(), "age", "claim");
        assert!(matches!(spec.validate(), Err(Error::ColumnNotFound { .. })));
        assert!(spec.render().is_err());
    }

    #[test]
    fn test_categorical_value_field_rejected() {
        let spec = ChartSpec::bar(table(), "age", "gender");
        assert!(matches!(spec.validate(), Err(Error::NonNumericColumn { .. })));
        let spec = ChartSpec::histogram(table(), "gender");
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_empty_table_rejected() {
        let empty = table().filter_rows(|_| false);
        let spec = ChartSpec::histogram(empty, "age");
        assert!(matches!(spec.validate(), Err(Error::EmptyData)));
    }

    #[test]
    fn test_axis_label_falls_back_to_field() {
        let spec = ChartSpec::scatter(table(), "age", "clm_amt").label("clm_amt", "Claim Amount");
        assert_eq!(spec.axis_label("clm_amt"), "Claim Amount");
        assert_eq!(spec.axis_label("age"), "age");
    }

    #[test]
    fn test_scatter_svg_contains_labels() {
        let svg = ChartSpec::scatter(table(), "age", "clm_amt")
            .title("Claim Amount vs Age")
            .label("age", "Age")
            .opacity(0.6)
            .trendline(true)
            .to_svg()
            .unwrap();
        assert!(svg.contains("Claim Amount vs Age"));
        assert!(svg.contains(">Age<"));
        assert!(svg.contains("<polyline"));
    }

    #[test]
    fn test_pie_renders_wedges() {
        let counts = Table::from_columns(vec![
            Column::categorical("gender", ["M", "F"]),
            Column::numeric("count", vec![2.0, 2.0]),
        ])
        .unwrap();
        let svg = ChartSpec::pie(counts, "gender", "count").to_svg().unwrap();
        assert_eq!(svg.matches("<path").count(), 2);
        assert!(svg.contains("M (50.0%)"));
    }

    #[test]
    fn test_png_export() {
        let spec = ChartSpec::histogram(table(), "age").nbins(4).dimensions(200, 120);
        let fb = spec.to_framebuffer().unwrap();
        assert_eq!((fb.width(), fb.height()), (200, 120));
        assert!(fb.ink_pixels(Rgba::WHITE) > 0);
        let stats = fb.luminance_stats();
        assert!(stats.min < stats.max);
        let png = spec.to_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    fn test_json_omits_data() {
        let json = ChartSpec::bar(table(), "gender", "clm_amt").color("clm_amt").to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["kind"], "bar");
        assert_eq!(value["color"], "clm_amt");
        assert_eq!(value["rows"], 4);
        assert!(value.get("data").is_none());
    }
}
