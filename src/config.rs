//! Configuration: dataset paths, server address, rendering options.
//!
//! YAML file with per-field defaults. Precedence: CLI > file > defaults;
//! command-line overrides are applied by the binary on top of the loaded
//! value.

use crate::error::{Error, Result};
use crate::page::{PageContext, Selection};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Dataset locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Cleaned dataset, index column first.
    #[serde(default = "default_cleaned")]
    pub cleaned: PathBuf,

    /// Raw dataset for the exploration page.
    #[serde(default = "default_raw")]
    pub raw: PathBuf,
}

fn default_cleaned() -> PathBuf {
    PathBuf::from("cleaned_df.csv")
}
fn default_raw() -> PathBuf {
    PathBuf::from("car_insurance_claim.csv")
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { cleaned: default_cleaned(), raw: default_raw() }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address.
    #[serde(default = "default_addr")]
    pub addr: String,
}

fn default_addr() -> String {
    "127.0.0.1:8501".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { addr: default_addr() }
    }
}

/// Page rendering options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Add PNG download links under HTML charts.
    #[serde(default)]
    pub download_links: bool,

    /// Line width of plain-text output.
    #[serde(default = "default_text_width")]
    pub text_width: usize,

    /// Draw ASCII chart sketches in plain-text output.
    #[serde(default)]
    pub sketch_charts: bool,
}

fn default_text_width() -> usize {
    80
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { download_links: false, text_width: default_text_width(), sketch_charts: false }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Configuration version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Dataset locations.
    #[serde(default)]
    pub data: DataConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Rendering options.
    #[serde(default)]
    pub render: RenderConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            data: DataConfig::default(),
            server: ServerConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config_dir>/claim-explorer/config.yaml`, when a config directory exists.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("claim-explorer").join("config.yaml"))
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// [`Error::ConfigNotFound`] if the file cannot be read,
    /// [`Error::ConfigParse`] if it is not valid YAML for this structure.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| Error::ConfigNotFound(path.display().to_string()))?;

        Self::parse(&content)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// [`Error::ConfigParse`] with the offending line.
    pub fn parse(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            let line = e.location().map_or(0, |l| l.line());
            Error::ConfigParse { line, message: e.to_string() }
        })
    }

    /// Loads configuration, falling back to defaults on any error.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Page inputs for one view.
    #[must_use]
    pub fn page_context(&self, selection: Selection) -> PageContext {
        PageContext { cleaned_path: self.data.cleaned.clone(), raw_path: self.data.raw.clone(), selection }
    }
}
