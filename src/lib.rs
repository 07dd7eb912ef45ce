//! # Claim Explorer
//!
//! Exploration dashboard for a car-insurance claims dataset.
//!
//! The crate loads the cleaned claims table (and the raw file for profiling),
//! computes descriptive statistics and grouped aggregations, and composes four
//! pages of titles, metrics, tables, charts and insight notes. Pages are
//! renderer-independent [`page::Document`] values, delivered as HTML over HTTP
//! or printed as text, with charts exported as SVG, PNG or JSON specs.
//!
//! ## Pages
//!
//! - **Home**: dataset overview and the column dictionary
//! - **Univariate**: KPIs, a numerical/categorical selector and featured variables
//! - **Multivariate**: ten questions relating age, income, gender, vehicle and tenure to claims
//! - **Exploration**: a profiling report over the raw file
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use claim_explorer::prelude::*;
//!
//! let table = load_csv("cleaned_df.csv", &LoadOptions::indexed())?;
//! let doc = Page::Univariate.compose(&table, &Selection::default())?;
//! println!("{}", TextRenderer::new().render(&doc));
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in statistics and rendering code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Data Modules
// ============================================================================

/// Column-oriented tables and CSV loading.
pub mod dataset;

/// Descriptive statistics, grouping, binning and correlation.
pub mod stats;

/// Dataset profiling report.
pub mod profiling;

/// Number and currency formatting.
pub mod format;

// ============================================================================
// Visualization Modules
// ============================================================================

/// Color types.
pub mod color;

/// Core framebuffer for pixel rendering.
pub mod framebuffer;

/// Scale functions for data-to-visual mappings.
pub mod scale;

/// Plot builders (bar, histogram, pie, scatter).
pub mod plots;

/// Declarative chart specifications bound to a table.
pub mod chart;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Rasterization of SVG scenes.
pub mod render;

/// Output encoders (PNG, SVG) and document renderers (HTML, text).
pub mod output;

// ============================================================================
// Application Modules
// ============================================================================

/// Dashboard pages and their document model.
pub mod page;

/// Configuration file support.
pub mod config;

/// HTTP delivery of rendered pages.
pub mod server;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for claim-explorer operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and functions for convenient imports.
///
/// ```rust,ignore
/// use claim_explorer::prelude::*;
/// ```
pub mod prelude {
    pub use crate::chart::{ChartKind, ChartSpec};
    pub use crate::color::Rgba;
    pub use crate::config::Config;
    pub use crate::dataset::{load_csv, Column, ColumnKind, DType, LoadOptions, Table};
    pub use crate::error::{Error, Result};
    pub use crate::output::{export_charts, ChartFormat, HtmlRenderer, TextRenderer};
    pub use crate::page::{AnalysisMode, Block, Document, Page, PageContext, Selection};
    pub use crate::profiling::ProfileReport;
    pub use crate::stats::{
        column_summary, corr, cut, describe, group_by, value_counts, Agg, GroupOrder,
    };
}

// ============================================================================
// Re-exports
// ============================================================================

/// Re-export trueno for direct access to SIMD operations.
pub use trueno;
