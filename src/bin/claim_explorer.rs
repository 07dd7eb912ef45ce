//! claim-explorer - car-insurance claims dashboard.
//!
//! Serves the four pages over HTTP, or renders a single page to HTML/text
//! and its charts to SVG/PNG/JSON files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use claim_explorer::config::Config;
use claim_explorer::dataset::{load_csv, LoadOptions};
use claim_explorer::framebuffer::Framebuffer;
use claim_explorer::output::{export_charts, ChartFormat, HtmlRenderer, TextRenderer};
use claim_explorer::page::{AnalysisMode, Block, Document, Page, Selection};
use claim_explorer::server::Server;
use claim_explorer::stats::{column_summary, ColumnSummary};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Car-insurance claims exploration dashboard.
#[derive(Parser, Debug)]
#[command(name = "claim-explorer", author = "PAIML Team", version, about = "Car-insurance claims exploration dashboard")]
struct Cli {
    /// Config file (default: <config_dir>/claim-explorer/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Cleaned dataset (index column first)
    #[arg(long, global = true)]
    cleaned: Option<PathBuf>,

    /// Raw dataset for the exploration page
    #[arg(long, global = true)]
    raw: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the dashboard over HTTP
    Serve {
        /// Listen address, e.g. 127.0.0.1:8501
        #[arg(short, long)]
        addr: Option<String>,
    },

    /// Render one page to stdout or a file
    Render {
        /// Page: home, univariate, multivariate, exploration
        page: Page,

        /// Univariate analysis mode
        #[arg(short, long, value_enum, default_value_t = Mode::Numerical)]
        mode: Mode,

        /// Univariate column (first of the mode's columns when omitted)
        #[arg(long)]
        column: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = DocFormat::Text)]
        format: DocFormat,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Write every chart of a page as an image
    Export {
        /// Page: home, univariate, multivariate, exploration
        page: Page,

        /// Univariate analysis mode
        #[arg(short, long, value_enum, default_value_t = Mode::Numerical)]
        mode: Mode,

        /// Univariate column
        #[arg(long)]
        column: Option<String>,

        /// Chart file format
        #[arg(short, long, value_enum, default_value_t = ChartFile::Svg)]
        format: ChartFile,

        /// Output directory
        #[arg(short, long, default_value = "charts")]
        out_dir: PathBuf,
    },

    /// Summarize one column of the cleaned dataset
    Describe {
        /// Column name
        column: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    Numerical,
    Categorical,
}

impl From<Mode> for AnalysisMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Numerical => AnalysisMode::Numerical,
            Mode::Categorical => AnalysisMode::Categorical,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DocFormat {
    Html,
    Text,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ChartFile {
    Svg,
    Png,
    Json,
}

impl From<ChartFile> for ChartFormat {
    fn from(file: ChartFile) -> Self {
        match file {
            ChartFile::Svg => ChartFormat::Svg,
            ChartFile::Png => ChartFormat::Png,
            ChartFile::Json => ChartFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Command::Serve { addr } => {
            let mut config = config;
            if let Some(addr) = addr {
                config.server.addr = addr;
            }
            let server = Server::bind(config)?;
            server.run();
        }
        Command::Render { page, mode, column, format, out } => {
            let selection = Selection::new(mode.into(), column.as_deref());
            let doc = page
                .render(&config.page_context(selection))
                .with_context(|| format!("failed to render page '{page}'"))?;
            let body = match format {
                DocFormat::Html => HtmlRenderer::new()
                    .current(page)
                    .download_links(config.render.download_links)
                    .render(&doc)
                    .with_context(|| format!("failed to render page '{page}' as HTML"))?,
                DocFormat::Text => TextRenderer::new()
                    .width(config.render.text_width)
                    .sketch_charts(config.render.sketch_charts)
                    .render(&doc),
            };
            match out {
                Some(path) => {
                    std::fs::write(&path, body).with_context(|| format!("failed to write {}", path.display()))?;
                    info!(path = %path.display(), "page written");
                }
                None => print!("{body}"),
            }
        }
        Command::Export { page, mode, column, format, out_dir } => {
            let selection = Selection::new(mode.into(), column.as_deref());
            let doc = page
                .render(&config.page_context(selection))
                .with_context(|| format!("failed to render page '{page}'"))?;
            let written = export_charts(&doc, &out_dir, format.into())
                .with_context(|| format!("failed to export charts to {}", out_dir.display()))?;
            info!(count = written.len(), dir = %out_dir.display(), simd = ?Framebuffer::backend(), "charts exported");
            for path in written {
                println!("{}", path.display());
            }
        }
        Command::Describe { column, json } => {
            let table = load_csv(&config.data.cleaned, &LoadOptions::indexed())
                .with_context(|| format!("failed to load {}", config.data.cleaned.display()))?;
            let summary = column_summary(&table, &column)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                let table = match &summary {
                    ColumnSummary::Numeric(s) => s.to_table(&column)?,
                    ColumnSummary::Categorical(counts) => counts.to_table(&column, "count")?,
                };
                let mut doc = Document::new(&column);
                doc.push(Block::Header(column.clone()));
                doc.push(Block::Table(table));
                print!("{}", TextRenderer::new().max_table_rows(usize::MAX).render(&doc));
            }
        }
    }

    Ok(())
}

/// Defaults, then the config file, then command-line overrides.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path).with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default_path().map(Config::load_or_default).unwrap_or_default(),
    };
    if let Some(cleaned) = &cli.cleaned {
        config.data.cleaned.clone_from(cleaned);
    }
    if let Some(raw) = &cli.raw {
        config.data.raw.clone_from(raw);
    }
    Ok(config)
}
