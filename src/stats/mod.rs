//! Descriptive statistics and aggregations over a [`Table`](crate::dataset::Table).
//!
//! Every function here is a pure function of its inputs. Missing cells are
//! skipped by the numeric summaries and grouped aggregates, and counted in
//! the denominators that are defined over all rows (zero percentage, value
//! shares).
//!
//! ```
//! use claim_explorer::dataset::{Column, Table};
//! use claim_explorer::stats::describe;
//!
//! let table = Table::from_columns(vec![Column::numeric("clm_amt", vec![0.0, 100.0, 200.0, 0.0])]).unwrap();
//! let summary = describe(&table, "clm_amt").unwrap();
//!
//! assert_eq!(summary.zero_count, 2);
//! assert_eq!(summary.zero_pct, 50.0);
//! assert_eq!(summary.mean, 75.0);
//! assert_eq!(summary.max, 200.0);
//! ```

mod binning;
mod correlate;
mod describe;
mod group;

pub use binning::{cut, histogram_bins, sturges_bins, Bin};
pub use correlate::{corr, correlation_matrix, ols, pearson, CorrelationMatrix, LinearFit};
pub use describe::{
    column_summary, count_where, describe, distinct_count, mean, median, quantile_sorted,
    summarize, value_counts, ColumnSummary, NumericSummary, ValueCounts,
};
pub use group::{group_by, Agg, Aggregate, GroupOrder};
