//! Column-major tabular data model.
//!
//! A [`Table`] holds named, typed columns of equal length. Loaded datasets
//! and aggregation results share the same representation, so every
//! statistic and chart accepts either.
//!
//! | Kind | Storage | Displayed dtype |
//! |------|---------|-----------------|
//! | [`ColumnData::Numeric`] | `Vec<Option<f64>>` | `int64` / `float64` |
//! | [`ColumnData::Categorical`] | `Vec<Option<String>>` | `object` |
//!
//! # Example
//!
//! ```
//! use claim_explorer::dataset::{Column, Table};
//!
//! let mut table = Table::new();
//! table.push_column(Column::numeric("clm_amt", vec![0.0, 100.0, 200.0, 0.0])).unwrap();
//! table.push_column(Column::categorical("gender", ["M", "F", "F", "M"])).unwrap();
//!
//! assert_eq!(table.row_count(), 4);
//! assert_eq!(table.numeric("clm_amt").unwrap().len(), 4);
//! ```

mod loader;

pub use loader::{load_csv, LoadOptions, MISSING_MARKERS};

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Kind of a column: the numeric/categorical split used throughout the pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ColumnKind {
    /// Numbers (integers or floats).
    Numeric,
    /// Free-form or low-cardinality strings.
    Categorical,
}

/// Storage-level data type, shown on the overview page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DType {
    /// Whole numbers.
    Int64,
    /// Floating point numbers.
    Float64,
    /// Strings.
    Object,
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int64 => write!(f, "int64"),
            Self::Float64 => write!(f, "float64"),
            Self::Object => write!(f, "object"),
        }
    }
}

/// Cell storage of a column. `None` marks a missing cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ColumnData {
    /// Numeric column; `integer` records whether every value is whole.
    Numeric {
        /// Cell values.
        values: Vec<Option<f64>>,
        /// True when the column displays as `int64`.
        integer: bool,
    },
    /// String column.
    Categorical {
        /// Cell values.
        values: Vec<Option<String>>,
    },
}

/// A named column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    /// Create a numeric column with no missing values.
    ///
    /// The column is typed `int64` when every value is whole.
    #[must_use]
    pub fn numeric(name: impl Into<String>, values: Vec<f64>) -> Self {
        let integer = values.iter().all(|v| v.fract() == 0.0);
        Self {
            name: name.into(),
            data: ColumnData::Numeric { values: values.into_iter().map(Some).collect(), integer },
        }
    }

    /// Create a numeric column that may contain missing cells.
    #[must_use]
    pub fn numeric_opt(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        let integer = values.iter().flatten().all(|v| v.fract() == 0.0);
        Self { name: name.into(), data: ColumnData::Numeric { values, integer } }
    }

    /// Create a categorical column with no missing values.
    #[must_use]
    pub fn categorical<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            data: ColumnData::Categorical {
                values: values.into_iter().map(|v| Some(v.into())).collect(),
            },
        }
    }

    /// Create a categorical column that may contain missing cells.
    #[must_use]
    pub fn categorical_opt(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self { name: name.into(), data: ColumnData::Categorical { values } }
    }

    pub(crate) fn from_parts(name: String, data: ColumnData) -> Self {
        Self { name, data }
    }

    /// Column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cell storage.
    #[must_use]
    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    /// Numeric or categorical.
    #[must_use]
    pub fn kind(&self) -> ColumnKind {
        match self.data {
            ColumnData::Numeric { .. } => ColumnKind::Numeric,
            ColumnData::Categorical { .. } => ColumnKind::Categorical,
        }
    }

    /// Storage dtype as pandas would report it.
    #[must_use]
    pub fn dtype(&self) -> DType {
        match self.data {
            ColumnData::Numeric { integer: true, .. } => DType::Int64,
            ColumnData::Numeric { integer: false, .. } => DType::Float64,
            ColumnData::Categorical { .. } => DType::Object,
        }
    }

    /// Number of cells, missing included.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numeric { values, .. } => values.len(),
            ColumnData::Categorical { values } => values.len(),
        }
    }

    /// True if the column has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of missing cells.
    #[must_use]
    pub fn missing_count(&self) -> usize {
        match &self.data {
            ColumnData::Numeric { values, .. } => values.iter().filter(|v| v.is_none()).count(),
            ColumnData::Categorical { values } => values.iter().filter(|v| v.is_none()).count(),
        }
    }

    /// Whether the cell at `row` is present.
    #[must_use]
    pub fn is_present(&self, row: usize) -> bool {
        match &self.data {
            ColumnData::Numeric { values, .. } => values.get(row).is_some_and(Option::is_some),
            ColumnData::Categorical { values } => values.get(row).is_some_and(Option::is_some),
        }
    }

    /// Numeric cells, or `None` for a categorical column.
    #[must_use]
    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match &self.data {
            ColumnData::Numeric { values, .. } => Some(values),
            ColumnData::Categorical { .. } => None,
        }
    }

    /// Display label of the cell at `row` (`None` when missing).
    ///
    /// Numeric cells format the way pandas prints them: whole values of an
    /// integer column without a decimal point.
    #[must_use]
    pub fn label(&self, row: usize) -> Option<String> {
        match &self.data {
            ColumnData::Numeric { values, integer } => {
                values.get(row).copied().flatten().map(|v| format_number(v, *integer))
            }
            ColumnData::Categorical { values } => values.get(row).cloned().flatten(),
        }
    }

    /// All cells as display labels.
    #[must_use]
    pub fn labels(&self) -> Vec<Option<String>> {
        (0..self.len()).map(|row| self.label(row)).collect()
    }

    /// Return a copy of this column with a new name.
    #[must_use]
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Keep only the rows listed in `rows`, in that order.
    #[must_use]
    pub fn take(&self, rows: &[usize]) -> Self {
        let data = match &self.data {
            ColumnData::Numeric { values, integer } => ColumnData::Numeric {
                values: rows.iter().map(|&r| values.get(r).copied().flatten()).collect(),
                integer: *integer,
            },
            ColumnData::Categorical { values } => ColumnData::Categorical {
                values: rows.iter().map(|&r| values.get(r).cloned().flatten()).collect(),
            },
        };
        Self { name: self.name.clone(), data }
    }
}

fn format_number(value: f64, integer: bool) -> String {
    // -0.0 displays as 0
    let value = if value == 0.0 { 0.0 } else { value };
    if integer && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Ordered collection of equally long, uniquely named columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from columns, validating lengths and names.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let mut table = Self::new();
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    /// Parse CSV text (see [`load_csv`] for the inference rules).
    pub fn from_csv_str(content: &str, options: &LoadOptions) -> Result<Self> {
        loader::parse_reader(content.as_bytes(), options)
    }

    /// Append a column.
    ///
    /// # Errors
    ///
    /// Fails when the name is taken or the length differs from the table's.
    pub fn push_column(&mut self, column: Column) -> Result<()> {
        if self.columns.iter().any(|c| c.name == column.name) {
            return Err(Error::DuplicateColumn { name: column.name });
        }
        if let Some(first) = self.columns.first() {
            if first.len() != column.len() {
                return Err(Error::DataLengthMismatch { x_len: first.len(), y_len: column.len() });
            }
        }
        self.columns.push(column);
        Ok(())
    }

    /// Return a new table with `column` appended, replacing a same-named one.
    pub fn with_column(&self, column: Column) -> Result<Self> {
        let mut out = Self {
            columns: self.columns.iter().filter(|c| c.name != column.name).cloned().collect(),
        };
        out.push_column(column)?;
        Ok(out)
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`, like a dataframe shape.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    /// Iterate over columns in order.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    /// Column names in order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Whether a column exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| Error::ColumnNotFound { name: name.to_string() })
    }

    /// Numeric cells of a column.
    ///
    /// # Errors
    ///
    /// Fails when the column is missing or categorical.
    pub fn numeric(&self, name: &str) -> Result<&[Option<f64>]> {
        self.column(name)?
            .as_numeric()
            .ok_or_else(|| Error::NonNumericColumn { column: name.to_string() })
    }

    /// Present numeric values of a column in row order.
    pub fn numbers(&self, name: &str) -> Result<Vec<f64>> {
        Ok(self.numeric(name)?.iter().flatten().copied().collect())
    }

    /// Display labels of any column.
    pub fn labels(&self, name: &str) -> Result<Vec<Option<String>>> {
        Ok(self.column(name)?.labels())
    }

    /// `(name, dtype)` for every column.
    #[must_use]
    pub fn schema(&self) -> Vec<(String, DType)> {
        self.columns.iter().map(|c| (c.name.clone(), c.dtype())).collect()
    }

    /// First `n` rows.
    #[must_use]
    pub fn head(&self, n: usize) -> Self {
        let rows: Vec<usize> = (0..self.row_count().min(n)).collect();
        self.take(&rows)
    }

    /// Rows at the given indices, in that order.
    #[must_use]
    pub fn take(&self, rows: &[usize]) -> Self {
        Self { columns: self.columns.iter().map(|c| c.take(rows)).collect() }
    }

    /// Keep the rows for which `predicate(row_index)` holds.
    #[must_use]
    pub fn filter_rows(&self, predicate: impl Fn(usize) -> bool) -> Self {
        let rows: Vec<usize> = (0..self.row_count()).filter(|&r| predicate(r)).collect();
        self.take(&rows)
    }

    /// Drop rows where `name` is missing.
    pub fn drop_missing(&self, name: &str) -> Result<Self> {
        let column = self.column(name)?;
        Ok(self.filter_rows(|r| column.is_present(r)))
    }

    /// Project onto the named columns, in the given order.
    pub fn select(&self, names: &[&str]) -> Result<Self> {
        let columns = names.iter().map(|n| self.column(n).cloned()).collect::<Result<Vec<_>>>()?;
        Self::from_columns(columns)
    }

    /// Rename every column positionally.
    ///
    /// # Errors
    ///
    /// Fails when the number of names differs from the number of columns.
    pub fn rename_columns(&self, names: &[&str]) -> Result<Self> {
        if names.len() != self.columns.len() {
            return Err(Error::DataLengthMismatch { x_len: self.columns.len(), y_len: names.len() });
        }
        let columns = self.columns.iter().zip(names).map(|(c, n)| c.clone().renamed(*n)).collect();
        Self::from_columns(columns)
    }

    /// Row index of the first row whose `key` column displays as `value`.
    pub fn find_row(&self, key: &str, value: &str) -> Result<usize> {
        let column = self.column(key)?;
        (0..column.len())
            .find(|&r| column.label(r).as_deref() == Some(value))
            .ok_or_else(|| Error::GroupNotFound { column: key.to_string(), value: value.to_string() })
    }

    /// Numeric value of `target` in the row where `key == value`.
    ///
    /// Mirrors `df[df[key] == value][target].values[0]`.
    pub fn lookup(&self, key: &str, value: &str, target: &str) -> Result<Option<f64>> {
        let row = self.find_row(key, value)?;
        Ok(self.numeric(target)?.get(row).copied().flatten())
    }
}
