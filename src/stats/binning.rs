//! Binning: labelled interval buckets and equal-width histogram bins.

use crate::dataset::{Column, Table};
use crate::error::{Error, Result};
use serde::Serialize;

/// Assign each value of `column` to a right-inclusive interval
/// `(edges[i], edges[i + 1]]` labelled `labels[i]`.
///
/// Values outside every interval, and missing values, become missing.
///
/// # Errors
///
/// Fails when the column is not numeric, fewer than two edges are given,
/// edges are not increasing, or `labels.len() != edges.len() - 1`.
///
/// # Example
///
/// ```
/// use claim_explorer::dataset::{Column, Table};
/// use claim_explorer::stats::cut;
///
/// let table = Table::from_columns(vec![Column::numeric("age", vec![25.0, 30.0, 31.0, 75.0])]).unwrap();
/// let groups = cut(&table, "age", &[0.0, 30.0, 40.0, 100.0], &["18-30", "31-40", "40+"], "age_group").unwrap();
/// assert_eq!(groups.label(1).as_deref(), Some("18-30"));
/// assert_eq!(groups.label(2).as_deref(), Some("31-40"));
/// ```
pub fn cut(
    table: &Table,
    column: &str,
    edges: &[f64],
    labels: &[&str],
    output: &str,
) -> Result<Column> {
    if edges.len() < 2 {
        return Err(Error::EmptyData);
    }
    if labels.len() != edges.len() - 1 {
        return Err(Error::DataLengthMismatch { x_len: edges.len() - 1, y_len: labels.len() });
    }
    if edges.windows(2).any(|w| w[0] >= w[1]) {
        return Err(Error::ScaleDomain("bin edges must increase monotonically".to_string()));
    }

    let values = table
        .numeric(column)?
        .iter()
        .map(|cell| {
            let v = (*cell)?;
            edges
                .windows(2)
                .position(|w| v > w[0] && v <= w[1])
                .map(|i| labels[i].to_string())
        })
        .collect();

    Ok(Column::categorical_opt(output, values))
}

/// One equal-width histogram bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bin {
    /// Inclusive lower edge.
    pub start: f64,
    /// Upper edge (exclusive, except for the last bin).
    pub end: f64,
    /// Number of values in the bin.
    pub count: usize,
}

/// Split `values` into `nbins` equal-width bins spanning `[min, max]`.
///
/// The last bin is closed, so the counts sum to `values.len()`. A constant
/// input yields a single bin of width one centred on the value.
#[must_use]
pub fn histogram_bins(values: &[f64], nbins: usize) -> Vec<Bin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Vec::new();
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if (max - min).abs() < f64::EPSILON {
        return vec![Bin { start: min - 0.5, end: min + 0.5, count: finite.len() }];
    }

    let nbins = nbins.max(1);
    let width = (max - min) / nbins as f64;
    let mut counts = vec![0usize; nbins];
    for v in &finite {
        let bin = (((v - min) / width).floor() as usize).min(nbins - 1);
        counts[bin] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            start: min + width * i as f64,
            end: if i + 1 == nbins { max } else { min + width * (i + 1) as f64 },
            count,
        })
        .collect()
}

/// Sturges' rule: `ceil(log2(n) + 1)`.
#[must_use]
pub fn sturges_bins(n: usize) -> usize {
    if n == 0 {
        return 1;
    }
    ((n as f64).log2().ceil() + 1.0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yoj() -> Table {
        Table::from_columns(vec![Column::numeric_opt(
            "yoj",
            vec![Some(0.0), Some(5.0), Some(6.0), Some(15.0), Some(20.0), Some(21.0), None],
        )])
        .unwrap()
    }

    #[test]
    fn test_cut_right_inclusive() {
        let col = cut(
            &yoj(),
            "yoj",
            &[0.0, 5.0, 10.0, 15.0, 20.0],
            &["0-5 years", "6-10 years", "11-15 years", "15+ years"],
            "job_tenure_group",
        )
        .unwrap();

        assert_eq!(
            col.labels(),
            vec![
                None,
                Some("0-5 years".into()),
                Some("6-10 years".into()),
                Some("11-15 years".into()),
                Some("15+ years".into()),
                None,
                None,
            ]
        );
        assert_eq!(col.name(), "job_tenure_group");
    }

    #[test]
    fn test_cut_label_count_mismatch() {
        let result = cut(&yoj(), "yoj", &[0.0, 5.0, 10.0], &["a"], "g");
        assert!(matches!(result, Err(Error::DataLengthMismatch { .. })));
    }

    #[test]
    fn test_cut_non_monotonic_edges() {
        let result = cut(&yoj(), "yoj", &[0.0, 10.0, 5.0], &["a", "b"], "g");
        assert!(result.is_err());
    }

    #[test]
    fn test_histogram_counts_sum_to_len() {
        let data: Vec<f64> = (0..100).map(f64::from).collect();
        let bins = histogram_bins(&data, 30);
        assert_eq!(bins.len(), 30);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 100);
        assert_eq!(bins.last().map(|b| b.end), Some(99.0));
    }

    #[test]
    fn test_histogram_constant_input() {
        let bins = histogram_bins(&[3.0, 3.0, 3.0], 10);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
    }

    #[test]
    fn test_histogram_empty() {
        assert!(histogram_bins(&[], 10).is_empty());
    }

    #[test]
    fn test_histogram_zero_bins_clamped() {
        let bins = histogram_bins(&[1.0, 2.0], 0);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 2);
    }

    #[test]
    fn test_sturges() {
        assert_eq!(sturges_bins(0), 1);
        assert_eq!(sturges_bins(100), 8);
    }

    proptest::proptest! {
        #[test]
        fn prop_histogram_counts_sum_to_len(
            data in proptest::collection::vec(-1e6f64..1e6, 1..200),
            nbins in 1usize..60,
        ) {
            let bins = histogram_bins(&data, nbins);
            proptest::prop_assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), data.len());
        }
    }
}
