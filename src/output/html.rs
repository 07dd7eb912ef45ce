//! HTML document renderer.
//!
//! Produces a self-contained page: inline CSS, a navigation sidebar, charts
//! as inline SVG and expanders as `<details>`. The univariate selector is a
//! plain GET form, so every interaction is a full page request.

use super::svg::escape_xml;
use crate::chart::ChartSpec;
use crate::dataset::{ColumnKind, Table};
use crate::error::Result;
use crate::format;
use crate::page::{AnalysisMode, Block, Document, Page, SelectorBlock};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt::Write as FmtWrite;

const STYLE: &str = r"
* { box-sizing: border-box; }
body { margin: 0; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; color: #31333f; background: #fff; }
nav { position: fixed; top: 0; bottom: 0; left: 0; width: 220px; padding: 24px 16px; background: #f0f2f6; }
nav a { display: block; padding: 6px 10px; margin-bottom: 4px; border-radius: 6px; color: #31333f; text-decoration: none; }
nav a.active { background: #e0e3eb; font-weight: 600; }
main { max-width: 1100px; margin-left: 240px; padding: 24px 48px 64px; }
main.wide { margin-left: auto; margin-right: auto; }
h1 { font-size: 2.2em; }
h2 { margin-top: 1.6em; }
hr { border: none; border-top: 1px solid #e6e9ef; margin: 2em 0; }
.metrics { display: flex; gap: 24px; flex-wrap: wrap; margin: 12px 0; }
.metric { min-width: 160px; }
.metric .label { font-size: 0.85em; color: #6b6f7b; }
.metric .value { font-size: 1.9em; }
.columns { display: grid; grid-template-columns: repeat(auto-fit, minmax(320px, 1fr)); gap: 24px; }
figure.chart { margin: 12px 0; }
figure.chart svg { width: 100%; height: auto; }
figure.chart a.download { font-size: 0.8em; color: #6b6f7b; }
table.dataframe { border-collapse: collapse; font-size: 0.9em; margin: 8px 0; }
table.dataframe th, table.dataframe td { border: 1px solid #e6e9ef; padding: 4px 10px; }
table.dataframe th { background: #f8f9fb; text-align: left; }
table.dataframe td.num { text-align: right; font-variant-numeric: tabular-nums; }
.table-wrap { overflow-x: auto; }
details { border: 1px solid #e6e9ef; border-radius: 6px; padding: 8px 16px; margin: 12px 0; }
summary { cursor: pointer; }
form.selector { margin: 12px 0; }
form.selector label { margin-right: 16px; }
.error { color: #b00020; background: #fdecea; padding: 8px 12px; border-radius: 6px; }
";

/// Document to HTML renderer.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    current: Option<Page>,
    navigation: bool,
    download_links: bool,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlRenderer {
    /// Renderer with a navigation sidebar and no download links.
    #[must_use]
    pub fn new() -> Self {
        Self { current: None, navigation: true, download_links: false }
    }

    /// Highlight `page` in the sidebar and point the selector form at it.
    #[must_use]
    pub fn current(mut self, page: Page) -> Self {
        self.current = Some(page);
        self
    }

    /// Show or hide the navigation sidebar.
    #[must_use]
    pub fn navigation(mut self, enabled: bool) -> Self {
        self.navigation = enabled;
        self
    }

    /// Add a "Download PNG" data-URI link under each chart.
    #[must_use]
    pub fn download_links(mut self, enabled: bool) -> Self {
        self.download_links = enabled;
        self
    }

    /// Render a complete HTML page.
    ///
    /// # Errors
    ///
    /// Returns the error of the first chart that fails to render; no partial
    /// page is produced.
    pub fn render(&self, doc: &Document) -> Result<String> {
        let mut body = String::new();
        self.blocks(&mut body, &doc.blocks)?;
        Ok(self.page(&doc.title, &body))
    }

    fn page(&self, title: &str, body: &str) -> String {
        let mut html = String::with_capacity(body.len() + STYLE.len() + 1024);
        let _ = write!(
            html,
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
             <title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n",
            escape_xml(title)
        );
        if self.navigation {
            html.push_str("<nav>\n");
            for page in Page::ALL {
                let class = if self.current == Some(page) { " class=\"active\"" } else { "" };
                let _ = writeln!(html, "<a href=\"{}\"{class}>{}</a>", page.route(), escape_xml(page.title()));
            }
            html.push_str("</nav>\n<main>\n");
        } else {
            html.push_str("<main class=\"wide\">\n");
        }
        html.push_str(body);
        html.push_str("</main>\n</body>\n</html>\n");
        html
    }

    fn blocks(&self, out: &mut String, blocks: &[Block]) -> Result<()> {
        for block in blocks {
            self.block(out, block)?;
        }
        Ok(())
    }

    fn block(&self, out: &mut String, block: &Block) -> Result<()> {
        match block {
            Block::Title(t) => {
                let _ = writeln!(out, "<h1>{}</h1>", escape_xml(t));
            }
            Block::Header(t) => {
                let _ = writeln!(out, "<h2>{}</h2>", escape_xml(t));
            }
            Block::Subheader(t) => {
                let _ = writeln!(out, "<h3>{}</h3>", escape_xml(t));
            }
            Block::Text(t) => {
                let _ = writeln!(out, "<p>{}</p>", escape_xml(t.trim()));
            }
            Block::Markdown(lines) => markdown(out, lines),
            Block::Metrics(metrics) => {
                out.push_str("<div class=\"metrics\">\n");
                for m in metrics {
                    let _ = writeln!(
                        out,
                        "<div class=\"metric\"><div class=\"label\">{}</div><div class=\"value\">{}</div></div>",
                        escape_xml(&m.label),
                        escape_xml(&m.value)
                    );
                }
                out.push_str("</div>\n");
            }
            Block::Table(table) => table_html(out, table),
            Block::Chart(spec) => self.chart(out, spec)?,
            Block::Expander { label, blocks } => {
                let _ = writeln!(out, "<details>\n<summary>{}</summary>", escape_xml(label));
                self.blocks(out, blocks)?;
                out.push_str("</details>\n");
            }
            Block::Divider => out.push_str("<hr>\n"),
            Block::Columns(columns) => {
                out.push_str("<div class=\"columns\">\n");
                for column in columns {
                    out.push_str("<div class=\"column\">\n");
                    self.blocks(out, column)?;
                    out.push_str("</div>\n");
                }
                out.push_str("</div>\n");
            }
            Block::Selector(selector) => self.selector(out, selector),
        }
        Ok(())
    }

    fn chart(&self, out: &mut String, spec: &ChartSpec) -> Result<()> {
        let svg = spec.render()?.render();

        out.push_str("<figure class=\"chart\">\n");
        out.push_str(&svg);
        if self.download_links {
            let _ = writeln!(
                out,
                "<a class=\"download\" download=\"{}.png\" href=\"data:image/png;base64,{}\">Download PNG</a>",
                escape_xml(&file_stem(spec.chart_title())),
                STANDARD.encode(spec.to_png()?)
            );
        }
        out.push_str("</figure>\n");
        Ok(())
    }

    fn selector(&self, out: &mut String, selector: &SelectorBlock) {
        let action = self.current.unwrap_or(Page::Univariate).route();
        let _ = writeln!(out, "<form class=\"selector\" method=\"get\" action=\"{action}\">");
        out.push_str("<p>Select analysis type:</p>\n<p>\n");
        for mode in AnalysisMode::ALL {
            let checked = if mode == selector.mode { " checked" } else { "" };
            // Switching mode resets the column to the new partition's first.
            let _ = writeln!(
                out,
                "<label><input type=\"radio\" name=\"mode\" value=\"{mode}\"{checked} \
                 onchange=\"this.form.column.disabled=true;this.form.submit()\"> {mode}</label>"
            );
        }
        out.push_str("</p>\n");

        let kind = selector.mode.to_string().to_lowercase();
        let _ = writeln!(out, "<label for=\"column\">Select a {kind} column:</label>");
        out.push_str("<select id=\"column\" name=\"column\" onchange=\"this.form.submit()\">\n");
        for option in &selector.options {
            let selected = if *option == selector.column { " selected" } else { "" };
            let name = escape_xml(option);
            let _ = writeln!(out, "<option value=\"{name}\"{selected}>{name}</option>");
        }
        out.push_str("</select>\n<noscript><button type=\"submit\">Apply</button></noscript>\n</form>\n");
    }

    /// Full page reporting a failed render.
    #[must_use]
    pub fn error_page(&self, title: &str, message: &str) -> String {
        let body = format!(
            "<h1>{}</h1>\n<div class=\"error\"><pre>{}</pre></div>\n",
            escape_xml(title),
            escape_xml(message)
        );
        self.page(title, &body)
    }
}

/// Light markdown: `**bold**`, `- ` bullets, blank-line paragraph breaks.
fn markdown(out: &mut String, lines: &[String]) {
    let mut in_list = false;
    for line in lines {
        let line = line.trim();
        if let Some(item) = line.strip_prefix("- ") {
            if !in_list {
                out.push_str("<ul>\n");
                in_list = true;
            }
            let _ = writeln!(out, "<li>{}</li>", inline_bold(item));
            continue;
        }
        if in_list {
            out.push_str("</ul>\n");
            in_list = false;
        }
        if !line.is_empty() {
            let _ = writeln!(out, "<p>{}</p>", inline_bold(line));
        }
    }
    if in_list {
        out.push_str("</ul>\n");
    }
}

/// Escape `text` and turn `**span**` pairs into `<strong>`.
fn inline_bold(text: &str) -> String {
    let escaped = escape_xml(text);
    let mut out = String::with_capacity(escaped.len() + 16);
    let mut parts = escaped.split("**").peekable();
    let mut bold = false;
    while let Some(part) = parts.next() {
        out.push_str(part);
        if parts.peek().is_some() {
            out.push_str(if bold { "</strong>" } else { "<strong>" });
            bold = !bold;
        }
    }
    if bold {
        out.push_str("</strong>");
    }
    out
}

fn table_html(out: &mut String, table: &Table) {
    out.push_str("<div class=\"table-wrap\"><table class=\"dataframe\">\n<thead><tr>");
    for name in table.column_names() {
        let _ = write!(out, "<th>{}</th>", escape_xml(name));
    }
    out.push_str("</tr></thead>\n<tbody>\n");
    for row in 0..table.row_count() {
        out.push_str("<tr>");
        for column in table.columns() {
            let class = if column.kind() == ColumnKind::Numeric { " class=\"num\"" } else { "" };
            let _ = write!(out, "<td{class}>{}</td>", escape_xml(&format::cell(column, row)));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table></div>\n");
}

/// Chart title reduced to a file-name-safe stem.
pub fn file_stem(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    let stem = stem.split('_').filter(|s| !s.is_empty()).collect::<Vec<_>>().join("_");
    if stem.is_empty() {
        "chart".to_string()
    } else {
        stem
    }
}
