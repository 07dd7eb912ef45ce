//! Automated dataset profiling for the exploration page.
//!
//! A [`ProfileReport`] summarises a raw table: dataset overview, one profile
//! per variable, data-quality alerts, a correlation matrix, missing-value
//! counts and a sample of the first rows. Missing values are expected input,
//! never errors.
//!
//! # Example
//!
//! ```
//! use claim_explorer::dataset::{LoadOptions, Table};
//! use claim_explorer::profiling::ProfileReport;
//!
//! let csv = "age,gender\n30,M\n41,F\n,F\n55,F\n";
//! let table = Table::from_csv_str(csv, &LoadOptions::default()).unwrap();
//! let report = ProfileReport::build(&table);
//!
//! assert_eq!(report.overview.rows, 4);
//! assert_eq!(report.overview.missing_cells, 1);
//! assert_eq!(report.variables.len(), 2);
//! ```

use crate::chart::ChartSpec;
use crate::dataset::{Column, ColumnKind, DType, Table};
use crate::error::Result;
use crate::format;
use crate::page::{Block, Document, Metric};
use crate::stats::{
    correlation_matrix, quantile_sorted, summarize, value_counts, CorrelationMatrix, NumericSummary, ValueCounts,
};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Share of missing cells above which a column is flagged.
pub const HIGH_MISSING_PCT: f64 = 20.0;
/// Distinct-to-present ratio above which a categorical column is flagged.
pub const HIGH_CARDINALITY_RATIO: f64 = 0.5;
/// Share of zeros above which a numeric column is flagged.
pub const MANY_ZEROS_PCT: f64 = 50.0;
/// Absolute skewness above which a numeric column is flagged.
pub const SKEWNESS_LIMIT: f64 = 2.0;

const TOP_VALUES: usize = 10;
const SAMPLE_ROWS: usize = 10;
const CHART_WIDTH: u32 = 640;
const CHART_HEIGHT: u32 = 360;

// ============================================================================
// Report types
// ============================================================================

/// Dataset-level figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    /// Number of rows (observations).
    pub rows: usize,
    /// Number of columns (variables).
    pub columns: usize,
    /// Missing cells across the table.
    pub missing_cells: usize,
    /// `missing_cells / (rows * columns) * 100`.
    pub missing_pct: f64,
    /// Rows identical to an earlier row.
    pub duplicate_rows: usize,
    /// `duplicate_rows / rows * 100`.
    pub duplicate_pct: f64,
    /// Numeric variables.
    pub numeric_columns: usize,
    /// Categorical variables.
    pub categorical_columns: usize,
}

/// Statistics of a numeric variable over its present values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericProfile {
    /// Count, mean, std, quartiles, zeros, distinct values.
    pub summary: NumericSummary,
    /// 5th percentile.
    pub p5: f64,
    /// 95th percentile.
    pub p95: f64,
    /// Bias-corrected sample skewness (needs three values).
    pub skewness: Option<f64>,
    /// Bias-corrected excess kurtosis (needs four values).
    pub kurtosis: Option<f64>,
    /// Values below zero.
    pub negative_count: usize,
}

/// Statistics of a categorical variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalProfile {
    /// Distinct present values.
    pub distinct_count: usize,
    /// Most frequent values, at most ten, most frequent first.
    pub top_values: Vec<(String, usize)>,
    /// Most frequent value's share of present values.
    pub mode_ratio: f64,
}

/// Kind-specific part of a variable profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum VariableDetail {
    /// Numeric statistics.
    Numeric(NumericProfile),
    /// Frequencies.
    Categorical(CategoricalProfile),
    /// Every cell is missing.
    Empty,
}

/// Profile of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableProfile {
    /// Column name.
    pub name: String,
    /// Storage type.
    pub dtype: DType,
    /// Missing cells.
    pub missing_count: usize,
    /// Missing share of all rows.
    pub missing_pct: f64,
    /// Kind-specific statistics.
    pub detail: VariableDetail,
}

impl VariableProfile {
    /// Distinct present values.
    #[must_use]
    pub fn distinct_count(&self) -> usize {
        match &self.detail {
            VariableDetail::Numeric(n) => n.summary.distinct_count,
            VariableDetail::Categorical(c) => c.distinct_count,
            VariableDetail::Empty => 0,
        }
    }
}

/// Data-quality warning categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// The table contains repeated rows.
    Duplicates,
    /// Many missing cells in a column.
    HighMissing,
    /// A column holds at most one distinct value.
    Constant,
    /// A categorical column is mostly unique values.
    HighCardinality,
    /// A numeric column is mostly zeros.
    ManyZeros,
    /// A numeric column is strongly skewed.
    Skewed,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Duplicates => "Duplicates",
            Self::HighMissing => "Missing",
            Self::Constant => "Constant",
            Self::HighCardinality => "High cardinality",
            Self::ManyZeros => "Zeros",
            Self::Skewed => "Skewed",
        })
    }
}

/// One warning, optionally tied to a column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    /// Warning category.
    pub kind: AlertKind,
    /// Affected column; `None` for table-wide alerts.
    pub column: Option<String>,
    /// Human-readable description.
    pub message: String,
}

/// Complete profile of a table.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileReport {
    /// Dataset-level figures.
    pub overview: Overview,
    /// One profile per column, table order.
    pub variables: Vec<VariableProfile>,
    /// Warnings, table-wide first.
    pub alerts: Vec<Alert>,
    /// Pearson correlations of numeric columns; `None` without any.
    pub correlations: Option<CorrelationMatrix>,
    /// First rows of the table.
    #[serde(skip)]
    pub sample: Table,
    #[serde(skip)]
    source: Table,
}

// ============================================================================
// Building
// ============================================================================

impl ProfileReport {
    /// Profile every column of `table`.
    #[must_use]
    pub fn build(table: &Table) -> Self {
        let variables: Vec<VariableProfile> = table.columns().map(profile_column).collect();
        let overview = overview(table, &variables);
        let alerts = alerts(&overview, &variables);
        let correlations = correlation_matrix(table).ok();

        debug!(
            rows = overview.rows,
            columns = overview.columns,
            alerts = alerts.len(),
            "profiled table"
        );

        Self {
            overview,
            variables,
            alerts,
            correlations,
            sample: table.head(SAMPLE_ROWS),
            source: table.clone(),
        }
    }

    /// Profile of the named column.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&VariableProfile> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Alerts of one kind.
    pub fn alerts_of(&self, kind: AlertKind) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().filter(move |a| a.kind == kind)
    }
}

fn profile_column(column: &Column) -> VariableProfile {
    let rows = column.len();
    let missing_count = column.missing_count();
    let missing_pct = if rows == 0 { 0.0 } else { missing_count as f64 / rows as f64 * 100.0 };

    let detail = match column.kind() {
        ColumnKind::Numeric => column
            .as_numeric()
            .and_then(profile_numeric)
            .map_or(VariableDetail::Empty, VariableDetail::Numeric),
        ColumnKind::Categorical => profile_categorical(column),
    };

    VariableProfile { name: column.name().to_string(), dtype: column.dtype(), missing_count, missing_pct, detail }
}

fn profile_numeric(cells: &[Option<f64>]) -> Option<NumericProfile> {
    let summary = summarize(cells)?;
    let mut values: Vec<f64> = cells.iter().flatten().copied().collect();
    values.sort_by(f64::total_cmp);

    let (skewness, kurtosis) = moments(&values, summary.mean);
    Some(NumericProfile {
        p5: quantile_sorted(&values, 0.05),
        p95: quantile_sorted(&values, 0.95),
        skewness,
        kurtosis,
        negative_count: values.iter().filter(|&&v| v < 0.0).count(),
        summary,
    })
}

/// Bias-corrected skewness (G1) and excess kurtosis (G2).
fn moments(values: &[f64], mean: f64) -> (Option<f64>, Option<f64>) {
    let n = values.len() as f64;
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for v in values {
        let d = v - mean;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    m2 /= n;
    m3 /= n;
    m4 /= n;
    if m2 == 0.0 {
        return (None, None);
    }

    let skewness = (values.len() >= 3).then(|| {
        let g1 = m3 / m2.powf(1.5);
        (n * (n - 1.0)).sqrt() / (n - 2.0) * g1
    });
    let kurtosis = (values.len() >= 4).then(|| {
        let g2 = m4 / (m2 * m2) - 3.0;
        ((n + 1.0) * g2 + 6.0) * (n - 1.0) / ((n - 2.0) * (n - 3.0))
    });
    (skewness, kurtosis)
}

fn profile_categorical(column: &Column) -> VariableDetail {
    let mut counts = ValueCounts::of(column).entries;
    if counts.is_empty() {
        return VariableDetail::Empty;
    }

    let present: usize = counts.iter().map(|(_, n)| n).sum();
    let mode_ratio = counts[0].1 as f64 / present as f64;
    let distinct_count = counts.len();
    counts.truncate(TOP_VALUES);

    VariableDetail::Categorical(CategoricalProfile { distinct_count, top_values: counts, mode_ratio })
}

fn overview(table: &Table, variables: &[VariableProfile]) -> Overview {
    let rows = table.row_count();
    let columns = table.column_count();
    let cells = rows * columns;
    let missing_cells: usize = variables.iter().map(|v| v.missing_count).sum();
    let duplicate_rows = duplicate_rows(table);

    Overview {
        rows,
        columns,
        missing_cells,
        missing_pct: if cells == 0 { 0.0 } else { missing_cells as f64 / cells as f64 * 100.0 },
        duplicate_rows,
        duplicate_pct: if rows == 0 { 0.0 } else { duplicate_rows as f64 / rows as f64 * 100.0 },
        numeric_columns: table.columns().filter(|c| c.kind() == ColumnKind::Numeric).count(),
        categorical_columns: table.columns().filter(|c| c.kind() == ColumnKind::Categorical).count(),
    }
}

/// Rows whose every cell equals an earlier row's.
fn duplicate_rows(table: &Table) -> usize {
    if table.column_count() == 0 {
        return 0;
    }
    let columns: Vec<&Column> = table.columns().collect();
    let mut seen: HashSet<Vec<Option<String>>> = HashSet::with_capacity(table.row_count());
    (0..table.row_count())
        .filter(|&row| !seen.insert(columns.iter().map(|c| c.label(row)).collect()))
        .count()
}

fn alerts(overview: &Overview, variables: &[VariableProfile]) -> Vec<Alert> {
    let mut alerts = Vec::new();
    if overview.duplicate_rows > 0 {
        alerts.push(Alert {
            kind: AlertKind::Duplicates,
            column: None,
            message: format!(
                "Dataset has {} ({}) duplicate rows",
                overview.duplicate_rows,
                format::pct(overview.duplicate_pct)
            ),
        });
    }

    for v in variables {
        let mut push = |kind, message: String| {
            alerts.push(Alert { kind, column: Some(v.name.clone()), message });
        };

        if v.missing_pct > HIGH_MISSING_PCT {
            push(
                AlertKind::HighMissing,
                format!("{} has {} ({}) missing values", v.name, v.missing_count, format::pct(v.missing_pct)),
            );
        }
        if v.distinct_count() <= 1 {
            push(AlertKind::Constant, format!("{} has constant value", v.name));
        }

        match &v.detail {
            VariableDetail::Categorical(c) => {
                let present = overview.rows - v.missing_count;
                if c.distinct_count > 1 && c.distinct_count as f64 / present as f64 > HIGH_CARDINALITY_RATIO {
                    push(
                        AlertKind::HighCardinality,
                        format!("{} has a high cardinality: {} distinct values", v.name, c.distinct_count),
                    );
                }
            }
            VariableDetail::Numeric(n) => {
                if n.summary.zero_pct > MANY_ZEROS_PCT {
                    push(
                        AlertKind::ManyZeros,
                        format!(
                            "{} has {} ({}) zeros",
                            v.name,
                            n.summary.zero_count,
                            format::pct(n.summary.zero_pct)
                        ),
                    );
                }
                if let Some(g1) = n.skewness.filter(|g| g.abs() > SKEWNESS_LIMIT) {
                    push(AlertKind::Skewed, format!("{} is highly skewed (\u{3b3}1 = {g1:.2})", v.name));
                }
            }
            VariableDetail::Empty => {}
        }
    }
    alerts
}

// ============================================================================
// Page composition
// ============================================================================

impl ProfileReport {
    /// Compose the report as a page.
    ///
    /// # Errors
    ///
    /// Fails only if an intermediate table cannot be assembled.
    pub fn to_document(&self) -> Result<Document> {
        let mut doc = Document::new("Data Exploration");
        doc.push(Block::Title("Data Exploration".into()));

        self.overview_section(&mut doc);
        self.alerts_section(&mut doc);
        self.variables_section(&mut doc)?;
        self.correlations_section(&mut doc)?;
        self.missing_section(&mut doc)?;

        doc.push(Block::Header("Sample".into()));
        doc.push(Block::Subheader("First rows".into()));
        doc.push(Block::Table(self.sample.clone()));
        Ok(doc)
    }

    fn overview_section(&self, doc: &mut Document) {
        let o = &self.overview;
        doc.push(Block::Header("Overview".into()));
        doc.push(Block::Subheader("Dataset statistics".into()));
        doc.push(Block::Metrics(vec![
            Metric::new("Number of variables", o.columns.to_string()),
            Metric::new("Number of observations", format::count(o.rows)),
            Metric::new("Missing cells", format::count(o.missing_cells)),
            Metric::new("Missing cells (%)", format::pct(o.missing_pct)),
            Metric::new("Duplicate rows", format::count(o.duplicate_rows)),
            Metric::new("Duplicate rows (%)", format::pct(o.duplicate_pct)),
        ]));
        doc.push(Block::Subheader("Variable types".into()));
        doc.push(Block::Metrics(vec![
            Metric::new("Numeric", o.numeric_columns.to_string()),
            Metric::new("Categorical", o.categorical_columns.to_string()),
        ]));
    }

    fn alerts_section(&self, doc: &mut Document) {
        doc.push(Block::Header("Alerts".into()));
        if self.alerts.is_empty() {
            doc.push(Block::text("No alerts"));
            return;
        }
        doc.push(Block::markdown(self.alerts.iter().map(|a| format!("- **{}**: {}", a.kind, a.message))));
    }

    fn variables_section(&self, doc: &mut Document) -> Result<()> {
        doc.push(Block::Header("Variables".into()));
        for v in &self.variables {
            doc.push(Block::Subheader(v.name.clone()));
            doc.push(Block::text(match v.detail {
                VariableDetail::Numeric(_) => format!("Real number ({})", v.dtype),
                VariableDetail::Categorical(_) => format!("Categorical ({})", v.dtype),
                VariableDetail::Empty => format!("Unsupported ({})", v.dtype),
            }));
            doc.push(Block::Metrics(vec![
                Metric::new("Distinct", format::count(v.distinct_count())),
                Metric::new("Missing", format::count(v.missing_count)),
                Metric::new("Missing (%)", format::pct(v.missing_pct)),
            ]));

            match &v.detail {
                VariableDetail::Numeric(n) => {
                    doc.push(Block::Table(numeric_table(n)?));
                    let values = self.source.select(&[v.name.as_str()])?;
                    doc.push(Block::expander(
                        "Histogram",
                        vec![Block::chart(
                            ChartSpec::histogram(values, &v.name)
                                .title(&v.name)
                                .dimensions(CHART_WIDTH, CHART_HEIGHT),
                        )],
                    ));
                }
                VariableDetail::Categorical(c) => {
                    doc.push(Block::text(format!("Mode share: {}", format::pct(c.mode_ratio * 100.0))));
                    let counts = value_counts(&self.source, &v.name)?;
                    let top = Table::from_columns(vec![
                        Column::categorical("value", c.top_values.iter().map(|(s, _)| s.clone())),
                        Column::numeric("count", c.top_values.iter().map(|(_, n)| *n as f64).collect()),
                        Column::numeric(
                            "frequency (%)",
                            c.top_values.iter().map(|(_, n)| round2(counts.share_pct(*n))).collect(),
                        ),
                    ])?;
                    doc.push(Block::Table(top.clone()));
                    doc.push(Block::expander(
                        "Common values",
                        vec![Block::chart(
                            ChartSpec::bar(top, "value", "count")
                                .title(&v.name)
                                .dimensions(CHART_WIDTH, CHART_HEIGHT),
                        )],
                    ));
                }
                VariableDetail::Empty => {}
            }
        }
        Ok(())
    }

    fn correlations_section(&self, doc: &mut Document) -> Result<()> {
        doc.push(Block::Header("Correlations".into()));
        let Some(matrix) = &self.correlations else {
            doc.push(Block::text("No numeric variables to correlate."));
            return Ok(());
        };

        let mut columns = vec![Column::categorical("variable", matrix.names.iter().cloned())];
        for (j, name) in matrix.names.iter().enumerate() {
            let values = matrix.values.iter().map(|row| row[j].map(round3)).collect();
            columns.push(Column::numeric_opt(name.clone(), values));
        }
        doc.push(Block::Table(Table::from_columns(columns)?));

        let strong = matrix.strong_pairs(0.5);
        if !strong.is_empty() {
            doc.push(Block::markdown(
                strong.iter().map(|(a, b, r)| format!("- **{a}** and **{b}**: {r:.3}")),
            ));
        }
        Ok(())
    }

    fn missing_section(&self, doc: &mut Document) -> Result<()> {
        doc.push(Block::Header("Missing values".into()));
        let counts = Table::from_columns(vec![
            Column::categorical("variable", self.variables.iter().map(|v| v.name.clone())),
            Column::numeric(
                "present",
                self.variables.iter().map(|v| (self.overview.rows - v.missing_count) as f64).collect(),
            ),
            Column::numeric("missing", self.variables.iter().map(|v| v.missing_count as f64).collect()),
        ])?;
        doc.push(Block::Table(counts.clone()));
        if self.overview.rows > 0 && !self.variables.is_empty() {
            doc.push(Block::chart(ChartSpec::bar(counts, "variable", "present").title("Count")));
        }
        Ok(())
    }
}

fn numeric_table(n: &NumericProfile) -> Result<Table> {
    let s = &n.summary;
    let rows: [(&str, Option<f64>); 14] = [
        ("mean", Some(s.mean)),
        ("std", Some(s.std)),
        ("min", Some(s.min)),
        ("5%", Some(n.p5)),
        ("25%", Some(s.q1)),
        ("median", Some(s.median)),
        ("75%", Some(s.q3)),
        ("95%", Some(n.p95)),
        ("max", Some(s.max)),
        ("IQR", Some(s.iqr())),
        ("skewness", n.skewness),
        ("kurtosis", n.kurtosis),
        ("zeros", Some(s.zero_count as f64)),
        ("negative", Some(n.negative_count as f64)),
    ];
    Table::from_columns(vec![
        Column::categorical("statistic", rows.iter().map(|(k, _)| *k)),
        Column::numeric_opt("value", rows.iter().map(|(_, v)| v.filter(|x| x.is_finite())).collect()),
    ])
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}
