//! CSV loading with per-column type inference.

use super::{Column, ColumnData, Table};
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Cell spellings treated as missing values.
pub const MISSING_MARKERS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

/// Options controlling how a CSV file becomes a [`Table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Treat the first column as a row index and drop it.
    pub index_column: bool,
    /// Field delimiter.
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { index_column: false, delimiter: b',' }
    }
}

impl LoadOptions {
    /// Options for the cleaned dataset, which was written with its index.
    #[must_use]
    pub fn indexed() -> Self {
        Self { index_column: true, ..Self::default() }
    }
}

/// Load a CSV file into a [`Table`].
///
/// A column is numeric when every non-missing cell parses as a number,
/// otherwise categorical. Whole-number columns without a decimal point in any
/// cell are typed `int64`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, a row has the wrong number
/// of fields, or the header repeats a name.
pub fn load_csv<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Table> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let table = parse_reader(BufReader::new(file), options)?;
    debug!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.column_count(),
        "loaded dataset"
    );
    Ok(table)
}

pub(super) fn parse_reader<R: Read>(reader: R, options: &LoadOptions) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .from_reader(reader);

    let skip = usize::from(options.index_column);
    let headers: Vec<String> =
        csv_reader.headers()?.iter().skip(skip).map(|h| h.trim().to_string()).collect();

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in csv_reader.records() {
        let record = record?;
        for (i, field) in record.iter().skip(skip).enumerate() {
            if let Some(col) = cells.get_mut(i) {
                col.push(field.to_string());
            }
        }
    }

    let mut table = Table::new();
    for (name, raw) in headers.into_iter().zip(cells) {
        if name.is_empty() {
            return Err(Error::ColumnNotFound { name: "<empty header>".to_string() });
        }
        table.push_column(infer_column(name, raw))?;
    }
    Ok(table)
}

fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell.trim())
}

fn infer_column(name: String, raw: Vec<String>) -> Column {
    let mut numbers = Vec::with_capacity(raw.len());
    let mut integer = true;

    for cell in &raw {
        if is_missing(cell) {
            numbers.push(None);
            continue;
        }
        let trimmed = cell.trim();
        match trimmed.parse::<f64>() {
            Ok(v) => {
                if v.fract() != 0.0 || trimmed.contains(['.', 'e', 'E']) || !v.is_finite() {
                    integer = false;
                }
                numbers.push(Some(v));
            }
            Err(_) => {
                let values =
                    raw.into_iter().map(|c| if is_missing(&c) { None } else { Some(c) }).collect();
                return Column::from_parts(name, ColumnData::Categorical { values });
            }
        }
    }

    // A column with only missing cells reads as float in pandas.
    if numbers.iter().all(Option::is_none) {
        integer = false;
    }

    Column::from_parts(name, ColumnData::Numeric { values: numbers, integer })
}
