//! Error types for claim-explorer operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, analysing or rendering the dataset.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// CSV reading error (ragged rows, invalid UTF-8, ...).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// JSON serialization error (chart specs, column summaries).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid dimensions for framebuffer or chart.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Data length mismatch between two columns that must be aligned.
    #[error("Data length mismatch: x has {x_len} elements, y has {y_len} elements")]
    DataLengthMismatch {
        /// Length of x data.
        x_len: usize,
        /// Length of y data.
        y_len: usize,
    },

    /// Empty data provided where non-empty is required.
    #[error("Empty data provided")]
    EmptyData,

    /// Scale domain error (e.g. equal domain bounds).
    #[error("Scale domain error: {0}")]
    ScaleDomain(String),

    /// Column not present in the table.
    #[error("Column '{name}' not found")]
    ColumnNotFound {
        /// Requested column name.
        name: String,
    },

    /// Column is categorical where numeric data is required.
    #[error("Column '{column}' is not numeric")]
    NonNumericColumn {
        /// Offending column name.
        column: String,
    },

    /// Two columns share the same name.
    #[error("Duplicate column '{name}'")]
    DuplicateColumn {
        /// Duplicated column name.
        name: String,
    },

    /// A group required by a page is absent from an aggregation result.
    #[error("Group '{value}' not found in column '{column}'")]
    GroupNotFound {
        /// Grouping column.
        column: String,
        /// Missing group value.
        value: String,
    },

    /// Unknown page name or route.
    #[error("Unknown page: {0}")]
    UnknownPage(String),

    /// Selector input that does not match the dataset.
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// Configuration file missing.
    #[error("Config file not found: {0}")]
    ConfigNotFound(String),

    /// Configuration file could not be parsed.
    #[error("Config parse error at line {line}: {message}")]
    ConfigParse {
        /// Line number (1-based, 0 if unknown).
        line: usize,
        /// Parser message.
        message: String,
    },

    /// HTTP server failure.
    #[error("Server error: {0}")]
    Server(String),
}
