//! Plain-text document renderer.
//!
//! Prints a [`Document`] for a terminal or a log: headings underlined,
//! metrics as aligned label and value pairs, tables as padded columns. Charts are
//! summarised by their title, or sketched with an ASCII density ramp when
//! sketches are enabled.

use crate::dataset::Table;
use crate::format;
use crate::framebuffer::Framebuffer;
use crate::page::{Block, Document};
use std::fmt::Write as FmtWrite;

/// Document to text renderer.
#[derive(Debug, Clone)]
pub struct TextRenderer {
    width: usize,
    sketch_charts: bool,
    max_table_rows: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRenderer {
    /// Light-to-dark ramp for chart sketches.
    const RAMP: &'static [char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

    /// Renderer with an 80 column width and chart titles only.
    #[must_use]
    pub fn new() -> Self {
        Self { width: 80, sketch_charts: false, max_table_rows: 30 }
    }

    /// Line width used for rules and chart sketches.
    #[must_use]
    pub fn width(mut self, width: usize) -> Self {
        self.width = width.max(10);
        self
    }

    /// Draw charts as ASCII sketches.
    #[must_use]
    pub fn sketch_charts(mut self, enabled: bool) -> Self {
        self.sketch_charts = enabled;
        self
    }

    /// Truncate long tables after `rows` rows.
    #[must_use]
    pub fn max_table_rows(mut self, rows: usize) -> Self {
        self.max_table_rows = rows;
        self
    }

    /// Render the document.
    #[must_use]
    pub fn render(&self, doc: &Document) -> String {
        let mut out = String::new();
        self.blocks(&mut out, &doc.blocks, 0);
        out
    }

    fn blocks(&self, out: &mut String, blocks: &[Block], indent: usize) {
        for block in blocks {
            self.block(out, block, indent);
        }
    }

    fn block(&self, out: &mut String, block: &Block, indent: usize) {
        let pad = " ".repeat(indent);
        match block {
            Block::Title(t) => {
                let _ = writeln!(out, "{pad}{t}\n{pad}{}\n", "=".repeat(t.chars().count()));
            }
            Block::Header(t) => {
                let _ = writeln!(out, "{pad}{t}\n{pad}{}\n", "-".repeat(t.chars().count()));
            }
            Block::Subheader(t) => {
                let _ = writeln!(out, "{pad}## {t}\n");
            }
            Block::Text(t) => {
                let _ = writeln!(out, "{pad}{}\n", t.trim());
            }
            Block::Markdown(lines) => {
                for line in lines {
                    let _ = writeln!(out, "{pad}{}", line.replace("**", ""));
                }
                out.push('\n');
            }
            Block::Metrics(metrics) => {
                let label_width = metrics.iter().map(|m| m.label.chars().count()).max().unwrap_or(0);
                for m in metrics {
                    let _ = writeln!(out, "{pad}{:<label_width$}  {}", m.label, m.value);
                }
                out.push('\n');
            }
            Block::Table(table) => {
                for line in self.table_lines(table) {
                    let _ = writeln!(out, "{pad}{line}");
                }
                out.push('\n');
            }
            Block::Chart(spec) => {
                let _ = writeln!(out, "{pad}[chart] {}", spec.chart_title());
                if self.sketch_charts {
                    if let Ok(fb) = spec.to_framebuffer() {
                        for line in self.sketch(&fb).lines() {
                            let _ = writeln!(out, "{pad}{line}");
                        }
                    }
                }
                out.push('\n');
            }
            Block::Expander { label, blocks } => {
                let _ = writeln!(out, "{pad}> {label}\n");
                self.blocks(out, blocks, indent + 2);
            }
            Block::Divider => {
                let _ = writeln!(out, "{pad}{}\n", "-".repeat(self.width.saturating_sub(indent)));
            }
            Block::Columns(columns) => {
                for column in columns {
                    self.blocks(out, column, indent);
                }
            }
            Block::Selector(s) => {
                let _ = writeln!(out, "{pad}Select analysis type: {}", s.mode);
                let _ = writeln!(out, "{pad}Column: {} (of {})\n", s.column, s.options.join(", "));
            }
        }
    }

    /// Aligned table lines: header, rule, rows, and a truncation note.
    fn table_lines(&self, table: &Table) -> Vec<String> {
        let names = table.column_names();
        if names.is_empty() {
            return vec!["(empty table)".to_string()];
        }

        let shown = table.row_count().min(self.max_table_rows);
        let cells: Vec<Vec<String>> = table
            .columns()
            .map(|c| (0..shown).map(|r| format::cell(c, r)).collect())
            .collect();
        let widths: Vec<usize> = names
            .iter()
            .zip(&cells)
            .map(|(n, col)| col.iter().map(|s| s.chars().count()).chain([n.chars().count()]).max().unwrap_or(0))
            .collect();

        let row_line = |values: Vec<&str>| -> String {
            values
                .iter()
                .zip(&widths)
                .map(|(v, w)| format!("{v:>w$}"))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut lines = vec![row_line(names.clone())];
        lines.push(widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  "));
        for r in 0..shown {
            lines.push(row_line(cells.iter().map(|c| c[r].as_str()).collect()));
        }
        if table.row_count() > shown {
            lines.push(format!("... {} more rows", table.row_count() - shown));
        }
        lines
    }

    /// ASCII sketch of a raster, `width` characters wide.
    #[must_use]
    pub fn sketch(&self, fb: &Framebuffer) -> String {
        let target_w = (self.width as u32).min(fb.width()).max(1);
        let aspect = fb.width() as f32 / fb.height() as f32;
        // Monospace cells are about twice as tall as wide.
        let target_h = ((target_w as f32 / aspect / 2.0).round() as u32).max(1);

        let scale_x = fb.width() as f32 / target_w as f32;
        let scale_y = fb.height() as f32 / target_h as f32;

        // Stretch the canvas's own luminance range over the ramp; flat canvases stay blank.
        let stats = fb.luminance_stats();
        let span = stats.max - stats.min;
        let normalize = |l: f32| if span > f32::EPSILON { (l - stats.min) / span } else { 1.0 };

        let mut out = String::with_capacity((target_w as usize + 1) * target_h as usize);
        for y in 0..target_h {
            let mut line = String::with_capacity(target_w as usize);
            for x in 0..target_w {
                let px = ((x as f32 * scale_x) as u32).min(fb.width() - 1);
                let py = ((y as f32 * scale_y) as u32).min(fb.height() - 1);
                let luma = fb.get_pixel(px, py).map_or(1.0, |p| normalize(p.luminance()));
                let idx = ((1.0 - luma) * (Self::RAMP.len() - 1) as f32).round() as usize;
                line.push(Self::RAMP[idx.min(Self::RAMP.len() - 1)]);
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}
