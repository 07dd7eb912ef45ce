//! Page composition.
//!
//! Each page is a pure function from a loaded [`Table`] to a [`Document`]:
//! a linear sequence of display blocks. Renderers in [`crate::output`] turn
//! documents into HTML or plain text; nothing here knows about either.

mod exploration;
mod home;
mod multivariate;
mod selector;
mod univariate;

pub use exploration::build as exploration;
pub use home::{build as home, COLUMN_DESCRIPTIONS};
pub use multivariate::build as multivariate;
pub use selector::{partition_columns, AnalysisMode, ColumnPartition, Selection, SelectorBlock};
pub use univariate::build as univariate;

use crate::chart::ChartSpec;
use crate::dataset::{load_csv, LoadOptions, Table};
use crate::error::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};

/// A labelled KPI value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metric {
    /// Caption above the value.
    pub label: String,
    /// Formatted value.
    pub value: String,
}

impl Metric {
    /// Create a metric.
    #[must_use]
    pub fn new(label: &str, value: impl Into<String>) -> Self {
        Self { label: label.to_string(), value: value.into() }
    }
}

/// One display element of a page.
#[derive(Debug, Clone)]
pub enum Block {
    /// Page title.
    Title(String),
    /// Section header.
    Header(String),
    /// Sub-section header.
    Subheader(String),
    /// Paragraph.
    Text(String),
    /// Lines of light markup: `**bold**` spans and `- ` bullets.
    Markdown(Vec<String>),
    /// Row of KPI metrics.
    Metrics(Vec<Metric>),
    /// Data table.
    Table(Table),
    /// Chart.
    Chart(Box<ChartSpec>),
    /// Collapsible group.
    Expander {
        /// Toggle label.
        label: String,
        /// Hidden content.
        blocks: Vec<Block>,
    },
    /// Horizontal rule.
    Divider,
    /// Side-by-side columns.
    Columns(Vec<Vec<Block>>),
    /// Analysis mode and column picker.
    Selector(SelectorBlock),
}

impl Block {
    /// Paragraph block.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Chart block.
    #[must_use]
    pub fn chart(spec: ChartSpec) -> Self {
        Self::Chart(Box::new(spec))
    }

    /// Expander block.
    #[must_use]
    pub fn expander(label: &str, blocks: Vec<Block>) -> Self {
        Self::Expander { label: label.to_string(), blocks }
    }

    /// Markdown block from string slices.
    #[must_use]
    pub fn markdown<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Self::Markdown(lines.into_iter().map(Into::into).collect())
    }
}

/// A rendered page: title plus blocks in display order.
#[derive(Debug, Clone)]
pub struct Document {
    /// Browser/window title.
    pub title: String,
    /// Blocks in display order.
    pub blocks: Vec<Block>,
}

impl Document {
    /// Empty document.
    #[must_use]
    pub fn new(title: &str) -> Self {
        Self { title: title.to_string(), blocks: Vec::new() }
    }

    /// Append a block.
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Every chart in display order, including those nested in expanders
    /// and columns.
    #[must_use]
    pub fn charts(&self) -> Vec<&ChartSpec> {
        fn walk<'a>(blocks: &'a [Block], out: &mut Vec<&'a ChartSpec>) {
            for block in blocks {
                match block {
                    Block::Chart(spec) => out.push(spec),
                    Block::Expander { blocks, .. } => walk(blocks, out),
                    Block::Columns(columns) => columns.iter().for_each(|c| walk(c, out)),
                    _ => {}
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.blocks, &mut out);
        out
    }
    /// Check every chart against its bound data.
    ///
    /// # Errors
    ///
    /// The first chart's validation error, in display order.
    pub fn validate(&self) -> Result<()> {
        self.charts().into_iter().try_for_each(ChartSpec::validate)
    }
}

/// The dashboard pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    /// Dataset overview and column dictionary.
    Home,
    /// KPIs and single-column analysis.
    Univariate,
    /// Ten relationship questions.
    Multivariate,
    /// Profiling report over the raw file.
    Exploration,
}

impl Page {
    /// All pages in navigation order.
    pub const ALL: [Page; 4] = [Page::Home, Page::Univariate, Page::Multivariate, Page::Exploration];

    /// URL path.
    #[must_use]
    pub const fn route(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Univariate => "/univariate",
            Self::Multivariate => "/multivariate",
            Self::Exploration => "/exploration",
        }
    }

    /// Navigation label.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Univariate => "Univariate Analysis",
            Self::Multivariate => "Multivariate Analysis",
            Self::Exploration => "Data Exploration",
        }
    }

    /// Short name used on the command line and in file names.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Univariate => "univariate",
            Self::Multivariate => "multivariate",
            Self::Exploration => "exploration",
        }
    }

    /// Page for a URL path (trailing slash tolerated).
    pub fn from_route(path: &str) -> Result<Self> {
        let trimmed = path.trim_end_matches('/');
        let trimmed = if trimmed.is_empty() { "/" } else { trimmed };
        Self::ALL
            .into_iter()
            .find(|p| p.route() == trimmed)
            .ok_or_else(|| Error::UnknownPage(path.to_string()))
    }

    /// Whether the page reads the raw file instead of the cleaned one.
    #[must_use]
    pub const fn uses_raw_dataset(self) -> bool {
        matches!(self, Self::Exploration)
    }

    /// Load the page's dataset and compose the document.
    ///
    /// # Errors
    ///
    /// Propagates load failures and page-level errors such as
    /// [`Error::GroupNotFound`].
    pub fn render(self, ctx: &PageContext) -> Result<Document> {
        let table = if self.uses_raw_dataset() {
            load_csv(&ctx.raw_path, &LoadOptions::default())?
        } else {
            load_csv(&ctx.cleaned_path, &LoadOptions::indexed())?
        };
        info!(page = self.slug(), rows = table.row_count(), "rendering page");
        self.compose(&table, &ctx.selection)
    }

    /// Compose the document from an already loaded table.
    pub fn compose(self, table: &Table, selection: &Selection) -> Result<Document> {
        let doc = match self {
            Self::Home => home(table),
            Self::Univariate => univariate(table, selection),
            Self::Multivariate => multivariate(table),
            Self::Exploration => exploration(table),
        }?;
        doc.validate()?;
        debug!(page = self.slug(), blocks = doc.blocks.len(), charts = doc.charts().len(), "composed");
        Ok(doc)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Page {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownPage(s.to_string()))
    }
}

/// Inputs of one page view.
#[derive(Debug, Clone)]
pub struct PageContext {
    /// Cleaned dataset (index column first).
    pub cleaned_path: PathBuf,
    /// Raw dataset for the profiling page.
    pub raw_path: PathBuf,
    /// Univariate selector state.
    pub selection: Selection,
}
