//! Grouped aggregation: one output row per distinct key value.

use crate::dataset::{Column, ColumnKind, Table};
use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Aggregate applied to a target column within each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    /// Mean of present values (`None` when a group has none).
    Mean,
    /// Number of present values.
    Count,
    /// Sum of present values.
    Sum,
}

impl Aggregate {
    fn suffix(self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Count => "count",
            Self::Sum => "sum",
        }
    }
}

/// One aggregate request: `aggregate(target)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agg {
    /// Target column.
    pub target: String,
    /// Aggregate to apply.
    pub aggregate: Aggregate,
}

impl Agg {
    /// `mean(target)`.
    #[must_use]
    pub fn mean(target: &str) -> Self {
        Self { target: target.to_string(), aggregate: Aggregate::Mean }
    }

    /// `count(target)`.
    #[must_use]
    pub fn count(target: &str) -> Self {
        Self { target: target.to_string(), aggregate: Aggregate::Count }
    }

    /// `sum(target)`.
    #[must_use]
    pub fn sum(target: &str) -> Self {
        Self { target: target.to_string(), aggregate: Aggregate::Sum }
    }

    /// Output column name, `<target>_<aggregate>`.
    #[must_use]
    pub fn output_name(&self) -> String {
        format!("{}_{}", self.target, self.aggregate.suffix())
    }
}

/// Row order of a grouped result.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupOrder {
    /// Order in which keys first occur in the data.
    FirstAppearance,
    /// Keys sorted ascending: by value for a numeric key, lexicographically
    /// for a categorical one.
    KeyAscending,
    /// Fixed category order, e.g. the labels of a binned column; categories
    /// absent from the data are skipped.
    Categories(Vec<String>),
    /// Descending by the aggregate at this index; ties keep key order.
    ByAggregateDescending(usize),
}

/// Group `table` by the display value of `key` and aggregate each target.
///
/// The result has the key column (same name) followed by one numeric column
/// per aggregate named by [`Agg::output_name`]. Rows with a missing key are
/// dropped.
///
/// # Errors
///
/// Fails if a column is missing or a target is categorical.
///
/// # Example
///
/// ```
/// use claim_explorer::dataset::{Column, Table};
/// use claim_explorer::stats::{group_by, Agg, GroupOrder};
///
/// let table = Table::from_columns(vec![
///     Column::categorical("gender", ["M", "F", "M"]),
///     Column::numeric("clm_amt", vec![100.0, 50.0, 300.0]),
/// ]).unwrap();
///
/// let grouped = group_by(&table, "gender", &[Agg::mean("clm_amt")], GroupOrder::KeyAscending).unwrap();
/// assert_eq!(grouped.numbers("clm_amt_mean").unwrap(), vec![50.0, 200.0]);
/// ```
pub fn group_by(table: &Table, key: &str, aggs: &[Agg], order: GroupOrder) -> Result<Table> {
    let keys = table.labels(key)?;
    // Numeric keys sort by value, not by their display label.
    let key_values = match table.column(key)?.kind() {
        ColumnKind::Numeric => Some(table.numeric(key)?),
        ColumnKind::Categorical => None,
    };
    let targets: Vec<&[Option<f64>]> =
        aggs.iter().map(|a| table.numeric(&a.target)).collect::<Result<_>>()?;

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<usize>)> = Vec::new();
    for (row, k) in keys.iter().enumerate() {
        let Some(k) = k.as_deref() else { continue };
        if let Some(&g) = index.get(k) {
            groups[g].1.push(row);
        } else {
            index.insert(k, groups.len());
            groups.push((k, vec![row]));
        }
    }

    let mut rows: Vec<GroupRow> = groups
        .iter()
        .map(|(k, members)| {
            let values = aggs
                .iter()
                .zip(&targets)
                .map(|(agg, cells)| aggregate(agg.aggregate, members, cells))
                .collect();
            GroupRow { key: (*k).to_string(), first_row: members[0], values }
        })
        .collect();
    let key_order = |a: &GroupRow, b: &GroupRow| -> Ordering {
        match key_values {
            Some(cells) => match (cells[a.first_row], cells[b.first_row]) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => a.key.cmp(&b.key),
            },
            None => a.key.cmp(&b.key),
        }
    };

    match order {
        GroupOrder::FirstAppearance => {}
        GroupOrder::KeyAscending => rows.sort_by(key_order),
        GroupOrder::Categories(labels) => {
            let mut ordered = Vec::with_capacity(rows.len());
            for label in &labels {
                if let Some(pos) = rows.iter().position(|row| row.key == *label) {
                    ordered.push(rows.remove(pos));
                }
            }
            ordered.extend(rows);
            rows = ordered;
        }
        GroupOrder::ByAggregateDescending(i) => {
            if i >= aggs.len() {
                return Err(Error::InvalidSelection(format!(
                    "cannot sort by aggregate {i}: only {} requested",
                    aggs.len()
                )));
            }
            rows.sort_by(key_order);
            rows.sort_by(|a, b| {
                let a = a.values[i].unwrap_or(f64::NEG_INFINITY);
                let b = b.values[i].unwrap_or(f64::NEG_INFINITY);
                b.total_cmp(&a)
            });
        }
    }

    let mut columns = vec![Column::categorical(key, rows.iter().map(|row| row.key.clone()))];
    for (i, agg) in aggs.iter().enumerate() {
        let values = rows.iter().map(|row| row.values[i]).collect();
        let column = Column::numeric_opt(agg.output_name(), values);
        columns.push(column);
    }
    Table::from_columns(columns)
}

struct GroupRow {
    key: String,
    first_row: usize,
    values: Vec<Option<f64>>,
}

fn aggregate(kind: Aggregate, members: &[usize], cells: &[Option<f64>]) -> Option<f64> {
    let present = members.iter().filter_map(|&r| cells.get(r).copied().flatten());
    match kind {
        Aggregate::Count => Some(present.count() as f64),
        Aggregate::Sum => Some(present.sum()),
        Aggregate::Mean => {
            let (sum, n) = present.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
            (n > 0).then(|| sum / n as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cars() -> Table {
        Table::from_columns(vec![
            Column::categorical("car_type", ["SUV", "Minivan", "SUV", "Sports Car", "Minivan"]),
            Column::numeric("clm_amt", vec![1000.0, 0.0, 3000.0, 5000.0, 400.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_mean_and_count() {
        let out = group_by(
            &cars(),
            "car_type",
            &[Agg::mean("clm_amt"), Agg::count("clm_amt")],
            GroupOrder::FirstAppearance,
        )
        .unwrap();

        assert_eq!(out.column_names(), vec!["car_type", "clm_amt_mean", "clm_amt_count"]);
        assert_eq!(
            out.labels("car_type").unwrap(),
            vec![Some("SUV".into()), Some("Minivan".into()), Some("Sports Car".into())]
        );
        assert_eq!(out.numbers("clm_amt_mean").unwrap(), vec![2000.0, 200.0, 5000.0]);
        assert_eq!(out.numbers("clm_amt_count").unwrap(), vec![2.0, 2.0, 1.0]);
    }

    #[test]
    fn test_sorted_by_aggregate_descending() {
        let out = group_by(
            &cars(),
            "car_type",
            &[Agg::mean("clm_amt")],
            GroupOrder::ByAggregateDescending(0),
        )
        .unwrap();
        assert_eq!(out.labels("car_type").unwrap()[0].as_deref(), Some("Sports Car"));
        assert_eq!(out.labels("car_type").unwrap()[2].as_deref(), Some("Minivan"));
    }

    #[test]
    fn test_key_ascending() {
        let out =
            group_by(&cars(), "car_type", &[Agg::sum("clm_amt")], GroupOrder::KeyAscending).unwrap();
        assert_eq!(out.labels("car_type").unwrap()[0].as_deref(), Some("Minivan"));
        assert_relative_eq!(out.numbers("clm_amt_sum").unwrap()[0], 400.0);
    }

    #[test]
    fn test_categories_order_skips_absent() {
        let out = group_by(
            &cars(),
            "car_type",
            &[Agg::count("clm_amt")],
            GroupOrder::Categories(vec!["Pickup".into(), "Sports Car".into(), "SUV".into()]),
        )
        .unwrap();
        assert_eq!(
            out.labels("car_type").unwrap(),
            vec![Some("Sports Car".into()), Some("SUV".into()), Some("Minivan".into())]
        );
    }

    #[test]
    fn test_missing_keys_dropped_and_empty_groups_have_no_mean() {
        let table = Table::from_columns(vec![
            Column::categorical_opt("g", vec![Some("a".into()), None, Some("b".into())]),
            Column::numeric_opt("v", vec![Some(1.0), Some(2.0), None]),
        ])
        .unwrap();
        let out = group_by(&table, "g", &[Agg::mean("v")], GroupOrder::FirstAppearance).unwrap();
        assert_eq!(out.row_count(), 2);
        assert_eq!(out.numeric("v_mean").unwrap(), &[Some(1.0), None]);
    }

    #[test]
    fn test_categorical_target_fails() {
        let result = group_by(&cars(), "car_type", &[Agg::mean("car_type")], GroupOrder::KeyAscending);
        assert!(matches!(result, Err(Error::NonNumericColumn { .. })));
    }

    #[test]
    fn test_bad_sort_index() {
        let result = group_by(
            &cars(),
            "car_type",
            &[Agg::mean("clm_amt")],
            GroupOrder::ByAggregateDescending(3),
        );
        assert!(matches!(result, Err(Error::InvalidSelection(msg)) if msg.contains("aggregate 3")));
    }

    #[test]
    fn test_numeric_keys_sort_by_value() {
        let table = Table::from_columns(vec![
            Column::numeric("kidsdriv", vec![10.0, 2.0, 9.0, 2.0]),
            Column::numeric("clm_amt", vec![100.0, 0.0, 100.0, 0.0]),
        ])
        .unwrap();
        let out = group_by(&table, "kidsdriv", &[Agg::count("clm_amt")], GroupOrder::KeyAscending).unwrap();
        assert_eq!(
            out.labels("kidsdriv").unwrap(),
            vec![Some("2".into()), Some("9".into()), Some("10".into())]
        );

        // Equal aggregates fall back to numeric key order.
        let out = group_by(&table, "kidsdriv", &[Agg::mean("clm_amt")], GroupOrder::ByAggregateDescending(0)).unwrap();
        assert_eq!(
            out.labels("kidsdriv").unwrap(),
            vec![Some("9".into()), Some("10".into()), Some("2".into())]
        );
    }

    proptest::proptest! {
        #[test]
        fn prop_group_counts_sum_to_present_keys(
            keys in proptest::collection::vec(proptest::option::of(0u8..5), 0..60),
        ) {
            let table = Table::from_columns(vec![
                Column::categorical_opt("k", keys.iter().map(|k| k.map(|k| k.to_string())).collect()),
                Column::numeric("v", vec![1.0; keys.len()]),
            ])
            .unwrap();
            let out = group_by(&table, "k", &[Agg::count("v")], GroupOrder::KeyAscending).unwrap();

            let present = keys.iter().flatten().count();
            let distinct = keys.iter().flatten().collect::<std::collections::HashSet<_>>().len();
            proptest::prop_assert_eq!(out.row_count(), distinct);
            proptest::prop_assert_eq!(out.numbers("v_count").unwrap().iter().sum::<f64>() as usize, present);
        }
    }
}
