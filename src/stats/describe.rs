//! Per-column summaries: numeric scalars and categorical frequencies.

use crate::dataset::{Column, ColumnKind, Table};
use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Descriptive statistics of a numeric column.
///
/// Computed over present values; `zero_pct` divides by the total row count,
/// missing cells included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    /// Number of present values.
    pub count: usize,
    /// Total rows, present or missing.
    pub total_rows: usize,
    /// Sum of present values.
    pub sum: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (ddof = 1). NaN with fewer than two values.
    pub std: f64,
    /// Minimum.
    pub min: f64,
    /// 25th percentile.
    pub q1: f64,
    /// Median.
    pub median: f64,
    /// 75th percentile.
    pub q3: f64,
    /// Maximum.
    pub max: f64,
    /// Number of values equal to zero.
    pub zero_count: usize,
    /// `zero_count / total_rows * 100`.
    pub zero_pct: f64,
    /// Number of distinct values.
    pub distinct_count: usize,
}

impl NumericSummary {
    /// `max - min`.
    #[must_use]
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// `q3 - q1`.
    #[must_use]
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// The `describe()` rows: count, mean, std, min, 25%, 50%, 75%, max.
    #[must_use]
    pub fn describe_rows(&self) -> [(&'static str, f64); 8] {
        [
            ("count", self.count as f64),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q1),
            ("50%", self.median),
            ("75%", self.q3),
            ("max", self.max),
        ]
    }

    /// The `describe()` rows as a two-column table (`statistic`, `column`).
    pub fn to_table(&self, column: &str) -> Result<Table> {
        let rows = self.describe_rows();
        Table::from_columns(vec![
            Column::categorical("statistic", rows.iter().map(|(k, _)| *k)),
            Column::numeric_opt(column, rows.iter().map(|(_, v)| Some(*v)).collect()),
        ])
    }
}

/// Summarise `cells`, skipping missing values.
///
/// Returns `None` when no value is present.
#[must_use]
pub fn summarize(cells: &[Option<f64>]) -> Option<NumericSummary> {
    let mut values: Vec<f64> = cells.iter().flatten().copied().collect();
    if values.is_empty() {
        return None;
    }

    let count = values.len();
    let sum: f64 = values.iter().sum();
    let mean = sum / count as f64;
    let std = sample_std(&values, mean);
    let zero_count = values.iter().filter(|&&v| v == 0.0).count();
    // 0.0 and -0.0 are one value.
    let distinct_count = values
        .iter()
        .map(|&v| if v == 0.0 { 0u64 } else { v.to_bits() })
        .collect::<HashSet<_>>()
        .len();

    values.sort_by(f64::total_cmp);

    Some(NumericSummary {
        count,
        total_rows: cells.len(),
        sum,
        mean,
        std,
        min: values[0],
        q1: quantile_sorted(&values, 0.25),
        median: quantile_sorted(&values, 0.5),
        q3: quantile_sorted(&values, 0.75),
        max: values[count - 1],
        zero_count,
        zero_pct: zero_count as f64 / cells.len() as f64 * 100.0,
        distinct_count,
    })
}

/// Summarise a numeric column of `table`.
///
/// # Errors
///
/// Fails when the column is missing, categorical, or has no present value.
pub fn describe(table: &Table, column: &str) -> Result<NumericSummary> {
    summarize(table.numeric(column)?).ok_or(Error::EmptyData)
}

/// Mean of present values, `None` when nothing is present.
#[must_use]
pub fn mean(cells: &[Option<f64>]) -> Option<f64> {
    let (sum, n) = cells.iter().flatten().fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Median of present values.
#[must_use]
pub fn median(cells: &[Option<f64>]) -> Option<f64> {
    let mut values: Vec<f64> = cells.iter().flatten().copied().collect();
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    Some(quantile_sorted(&values, 0.5))
}

/// Sample standard deviation (ddof = 1).
fn sample_std(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// Quantile of sorted values by linear interpolation between closest ranks.
///
/// `q` is clamped to `[0, 1]`. Panics on empty input.
#[must_use]
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Count present numeric cells of `column` satisfying `predicate`.
pub fn count_where(table: &Table, column: &str, predicate: impl Fn(f64) -> bool) -> Result<usize> {
    Ok(table.numeric(column)?.iter().flatten().filter(|&&v| predicate(v)).count())
}

/// Frequencies of the distinct values of a column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueCounts {
    /// Column the counts were taken from.
    pub column: String,
    /// `(value, count)` sorted by count descending; ties by first appearance.
    pub entries: Vec<(String, usize)>,
    /// Total rows of the source column, missing included.
    pub total_rows: usize,
}

impl ValueCounts {
    /// Count the distinct display values of `column`.
    #[must_use]
    pub fn of(column: &Column) -> Self {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut entries: Vec<(String, usize)> = Vec::new();

        for label in column.labels().into_iter().flatten() {
            if let Some(&i) = index.get(&label) {
                entries[i].1 += 1;
            } else {
                index.insert(label.clone(), entries.len());
                entries.push((label, 1));
            }
        }

        // Stable: equal counts keep first-appearance order.
        entries.sort_by(|a, b| b.1.cmp(&a.1));

        Self { column: column.name().to_string(), entries, total_rows: column.len() }
    }

    /// Most frequent value.
    #[must_use]
    pub fn top(&self) -> Option<&(String, usize)> {
        self.entries.first()
    }

    /// Number of distinct values.
    #[must_use]
    pub fn unique(&self) -> usize {
        self.entries.len()
    }

    /// Sum of all counts (present cells).
    #[must_use]
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    /// `count / total_rows * 100` for an entry count.
    #[must_use]
    pub fn share_pct(&self, count: usize) -> f64 {
        if self.total_rows == 0 {
            return 0.0;
        }
        count as f64 / self.total_rows as f64 * 100.0
    }

    /// Sum of the `n` largest counts.
    #[must_use]
    pub fn top_n_total(&self, n: usize) -> usize {
        self.entries.iter().take(n).map(|(_, c)| c).sum()
    }

    /// `1 - max_count / total_rows`.
    #[must_use]
    pub fn diversity_index(&self) -> f64 {
        match (self.top(), self.total_rows) {
            (Some((_, max)), rows) if rows > 0 => 1.0 - *max as f64 / rows as f64,
            _ => 0.0,
        }
    }

    /// As a table with columns `name` (value) and `count_name`.
    pub fn to_table(&self, name: &str, count_name: &str) -> Result<Table> {
        Table::from_columns(vec![
            Column::categorical(name, self.entries.iter().map(|(v, _)| v.clone())),
            Column::numeric(count_name, self.entries.iter().map(|(_, c)| *c as f64).collect()),
        ])
    }
}

/// Count the distinct display values of any column.
pub fn value_counts(table: &Table, column: &str) -> Result<ValueCounts> {
    Ok(ValueCounts::of(table.column(column)?))
}

/// Summary of one column, shaped by its kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ColumnSummary {
    /// Numeric scalars.
    Numeric(NumericSummary),
    /// Value frequencies.
    Categorical(ValueCounts),
}

/// Numeric summary for numeric columns, frequencies for categorical ones.
pub fn column_summary(table: &Table, column: &str) -> Result<ColumnSummary> {
    match table.column(column)?.kind() {
        ColumnKind::Numeric => describe(table, column).map(ColumnSummary::Numeric),
        ColumnKind::Categorical => value_counts(table, column).map(ColumnSummary::Categorical),
    }
}

/// Number of distinct present values of any column.
pub fn distinct_count(table: &Table, column: &str) -> Result<usize> {
    let labels = table.labels(column)?;
    Ok(labels.iter().flatten().collect::<HashSet<_>>().len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn claims() -> Table {
        Table::from_columns(vec![Column::numeric("clm_amt", vec![0.0, 100.0, 200.0, 0.0])]).unwrap()
    }

    #[test]
    fn test_claim_amount_example() {
        let s = describe(&claims(), "clm_amt").unwrap();
        assert_eq!(s.zero_count, 2);
        assert_relative_eq!(s.zero_pct, 50.0);
        assert_relative_eq!(s.mean, 75.0);
        assert_relative_eq!(s.max, 200.0);
        assert_relative_eq!(s.min, 0.0);
        assert_relative_eq!(s.median, 50.0);
        assert_relative_eq!(s.sum, 300.0);
    }

    #[test]
    fn test_std_and_quartiles() {
        // values 0, 0, 100, 200: mean 75, ss = 5625*2 + 625 + 15625 = 27500
        let s = describe(&claims(), "clm_amt").unwrap();
        assert_relative_eq!(s.std, (27_500.0_f64 / 3.0).sqrt(), epsilon = 1e-9);
        assert_relative_eq!(s.q1, 0.0);
        assert_relative_eq!(s.q3, 125.0);
        assert_relative_eq!(s.iqr(), 125.0);
        assert_relative_eq!(s.range(), 200.0);
        assert_eq!(s.distinct_count, 3);
    }

    #[test]
    fn test_single_value_std_is_nan() {
        let s = summarize(&[Some(4.0)]).unwrap();
        assert!(s.std.is_nan());
        assert_relative_eq!(s.median, 4.0);
    }

    #[test]
    fn test_missing_values_skipped_but_counted_in_zero_pct() {
        let s = summarize(&[Some(0.0), None, Some(10.0), None]).unwrap();
        assert_eq!(s.count, 2);
        assert_eq!(s.total_rows, 4);
        assert_relative_eq!(s.zero_pct, 25.0);
        assert_relative_eq!(s.mean, 5.0);
    }

    #[test]
    fn test_all_missing_is_empty() {
        assert!(summarize(&[None, None]).is_none());
        let table = Table::from_columns(vec![Column::numeric_opt("x", vec![None])]).unwrap();
        assert!(matches!(describe(&table, "x"), Err(Error::EmptyData)));
    }

    #[test]
    fn test_signed_zeros_are_one_distinct_value() {
        let s = summarize(&[Some(0.0), Some(-0.0), Some(1.5)]).unwrap();
        assert_eq!(s.distinct_count, 2);
        assert_eq!(s.zero_count, 2);

        let table = Table::from_columns(vec![Column::numeric("x", vec![0.0, -0.0, 1.5])]).unwrap();
        assert_eq!(distinct_count(&table, "x").unwrap(), 2);
        assert_eq!(value_counts(&table, "x").unwrap().entries[0], ("0".to_string(), 2));
    }

    #[test]
    fn test_quantile_interpolation() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(quantile_sorted(&sorted, 0.25), 2.0);
        assert_relative_eq!(quantile_sorted(&sorted, 0.5), 3.0);
        assert_relative_eq!(quantile_sorted(&[1.0, 2.0], 0.5), 1.5);
    }

    #[test]
    fn test_value_counts_order() {
        let table = Table::from_columns(vec![Column::categorical(
            "car_type",
            ["SUV", "Minivan", "SUV", "Pickup", "Minivan", "SUV"],
        )])
        .unwrap();
        let vc = value_counts(&table, "car_type").unwrap();
        assert_eq!(
            vc.entries,
            vec![("SUV".to_string(), 3), ("Minivan".to_string(), 2), ("Pickup".to_string(), 1)]
        );
        assert_eq!(vc.unique(), 3);
        assert_eq!(vc.top_n_total(2), 5);
        assert_relative_eq!(vc.diversity_index(), 0.5);
        assert_relative_eq!(vc.share_pct(3), 50.0);
    }

    #[test]
    fn test_value_counts_ties_keep_first_appearance() {
        let table = Table::from_columns(vec![Column::categorical("g", ["F", "M", "M", "F"])]).unwrap();
        let vc = value_counts(&table, "g").unwrap();
        assert_eq!(vc.entries[0].0, "F");
        assert_eq!(vc.entries[1].0, "M");
    }

    #[test]
    fn test_column_summary_dispatch() {
        let table = Table::from_columns(vec![
            Column::numeric("n", vec![1.0, 2.0]),
            Column::categorical("c", ["a", "b"]),
        ])
        .unwrap();
        assert!(matches!(column_summary(&table, "n").unwrap(), ColumnSummary::Numeric(_)));
        assert!(matches!(column_summary(&table, "c").unwrap(), ColumnSummary::Categorical(_)));
    }

    #[test]
    fn test_count_where() {
        let table = claims();
        assert_eq!(count_where(&table, "clm_amt", |v| v == 0.0).unwrap(), 2);
        assert_eq!(count_where(&table, "clm_amt", |v| v > 0.0).unwrap(), 2);
    }

    #[test]
    fn test_describe_table() {
        let s = describe(&claims(), "clm_amt").unwrap();
        let table = s.to_table("clm_amt").unwrap();
        assert_eq!(table.row_count(), 8);
        assert_eq!(table.labels("statistic").unwrap()[4].as_deref(), Some("25%"));
    }

    #[test]
    fn test_mean_and_median_helpers() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[Some(1.0), None, Some(3.0)]), Some(2.0));
        assert_eq!(median(&[Some(5.0), Some(1.0), Some(3.0)]), Some(3.0));
    }
}
