//! Writing a document's charts to files.

use super::html::file_stem;
use super::PngEncoder;
use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::page::Document;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// File format of exported charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartFormat {
    /// Scalable vector markup.
    #[default]
    Svg,
    /// Rasterized PNG.
    Png,
    /// The chart specification (fields, labels, options) without its data.
    Json,
}

impl ChartFormat {
    /// File extension without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ChartFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ChartFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            "json" => Ok(Self::Json),
            other => Err(Error::InvalidSelection(format!("unsupported chart format '{other}'"))),
        }
    }
}

/// Write every chart of `doc` into `dir` as `NN_<title>.<ext>`.
///
/// The directory is created when missing. Returns the written paths in
/// document order.
///
/// # Errors
///
/// Fails on the first chart that cannot be rendered or written.
pub fn export_charts(doc: &Document, dir: impl AsRef<Path>, format: ChartFormat) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for (i, spec) in doc.charts().into_iter().enumerate() {
        let path = dir.join(format!("{:02}_{}.{}", i + 1, file_stem(spec.chart_title()), format.extension()));
        match format {
            ChartFormat::Svg => std::fs::write(&path, spec.to_svg()?)?,
            ChartFormat::Png => {
                let fb = spec.to_framebuffer()?;
                if fb.ink_pixels(Rgba::WHITE) == 0 {
                    warn!(chart = spec.chart_title(), "exported chart is blank");
                }
                PngEncoder::write_to_file(&fb, &path)?;
            }
            ChartFormat::Json => std::fs::write(&path, spec.to_json()?)?,
        }
        debug!(path = %path.display(), "exported chart");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartSpec;
    use crate::dataset::{Column, Table};
    use crate::page::Block;

    fn doc() -> Document {
        let table = Table::from_columns(vec![
            Column::categorical("car_type", ["SUV", "Minivan"]),
            Column::numeric("count", vec![3.0, 2.0]),
        ])
        .unwrap();
        let mut doc = Document::new("t");
        doc.push(Block::chart(ChartSpec::bar(table.clone(), "car_type", "count").title("Car Type Counts")));
        doc.push(Block::expander(
            "more",
            vec![Block::chart(ChartSpec::pie(table, "car_type", "count").title("Share"))],
        ));
        doc
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("PNG".parse::<ChartFormat>().unwrap(), ChartFormat::Png);
        assert_eq!("svg".parse::<ChartFormat>().unwrap(), ChartFormat::Svg);
        assert_eq!("json".parse::<ChartFormat>().unwrap(), ChartFormat::Json);
        assert!("gif".parse::<ChartFormat>().is_err());
    }

    #[test]
    fn test_export_svg() {
        let dir = tempfile::tempdir().unwrap();
        let paths = export_charts(&doc(), dir.path().join("charts"), ChartFormat::Svg).unwrap();

        let names: Vec<String> = paths.iter().map(|p| p.file_name().unwrap().to_string_lossy().into_owned()).collect();
        assert_eq!(names, vec!["01_car_type_counts.svg", "02_share.svg"]);
        let svg = std::fs::read_to_string(&paths[0]).unwrap();
        assert!(svg.starts_with("<svg"));
    }

    #[test]
    fn test_export_png_signature() {
        let dir = tempfile::tempdir().unwrap();
        let paths = export_charts(&doc(), dir.path(), ChartFormat::Png).unwrap();
        let bytes = std::fs::read(&paths[1]).unwrap();
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_export_json_spec() {
        let dir = tempfile::tempdir().unwrap();
        let paths = export_charts(&doc(), dir.path(), ChartFormat::Json).unwrap();
        let json = std::fs::read_to_string(&paths[0]).unwrap();
        assert!(paths[0].ends_with("01_car_type_counts.json"));
        assert!(json.contains("Car Type Counts"));
    }
}
