//! Univariate selector: analysis mode, column partition, query parsing.

use crate::dataset::{ColumnKind, Table};
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Which partition of columns the univariate analysis draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisMode {
    /// Numeric columns: histogram + describe.
    #[default]
    Numerical,
    /// Categorical columns: value counts.
    Categorical,
}

impl AnalysisMode {
    /// Both modes, radio-button order.
    pub const ALL: [AnalysisMode; 2] = [AnalysisMode::Numerical, AnalysisMode::Categorical];
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Numerical => "Numerical",
            Self::Categorical => "Categorical",
        })
    }
}

impl FromStr for AnalysisMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "numerical" | "numeric" => Ok(Self::Numerical),
            "categorical" => Ok(Self::Categorical),
            _ => Err(Error::InvalidSelection(format!("unknown analysis mode '{s}'"))),
        }
    }
}

/// Numeric and categorical column names, in table order.
///
/// Every column lands in exactly one of the two lists.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnPartition {
    /// Numeric columns.
    pub numerical: Vec<String>,
    /// Categorical columns.
    pub categorical: Vec<String>,
}

impl ColumnPartition {
    /// Columns available for `mode`.
    #[must_use]
    pub fn for_mode(&self, mode: AnalysisMode) -> &[String] {
        match mode {
            AnalysisMode::Numerical => &self.numerical,
            AnalysisMode::Categorical => &self.categorical,
        }
    }
}

/// Split the table's columns by kind.
#[must_use]
pub fn partition_columns(table: &Table) -> ColumnPartition {
    let mut partition = ColumnPartition::default();
    for column in table.columns() {
        match column.kind() {
            ColumnKind::Numeric => partition.numerical.push(column.name().to_string()),
            ColumnKind::Categorical => partition.categorical.push(column.name().to_string()),
        }
    }
    partition
}

/// Selector state of one univariate page view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    /// Analysis mode.
    pub mode: AnalysisMode,
    /// Chosen column; the first of the partition when absent.
    pub column: Option<String>,
}

impl Selection {
    /// Selection with an explicit column.
    #[must_use]
    pub fn new(mode: AnalysisMode, column: Option<&str>) -> Self {
        Self { mode, column: column.map(str::to_string) }
    }

    /// Parse `mode=...&column=...` from a URL query string.
    ///
    /// Unknown keys are ignored; an empty `column` means "default".
    pub fn from_query(query: &str) -> Result<Self> {
        let mut selection = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            match key.as_ref() {
                "mode" => selection.mode = value.parse()?,
                "column" if !value.is_empty() => selection.column = Some(value.into_owned()),
                _ => {}
            }
        }
        Ok(selection)
    }

    /// The column to analyse.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSelection`] when the chosen column is not in the
    /// mode's partition, or the partition is empty.
    pub fn resolve(&self, partition: &ColumnPartition) -> Result<String> {
        let options = partition.for_mode(self.mode);
        match &self.column {
            Some(column) if options.contains(column) => Ok(column.clone()),
            Some(column) => Err(Error::InvalidSelection(format!(
                "'{column}' is not a {} column",
                self.mode.to_string().to_lowercase()
            ))),
            None => options
                .first()
                .cloned()
                .ok_or_else(|| Error::InvalidSelection(format!("no {} columns", self.mode.to_string().to_lowercase()))),
        }
    }
}

/// Rendered selector widget: current choice plus the options to offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorBlock {
    /// Current mode.
    pub mode: AnalysisMode,
    /// Current column.
    pub column: String,
    /// Columns of the current mode.
    pub options: Vec<String>,
}
