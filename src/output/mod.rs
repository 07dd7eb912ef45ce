//! Output encoders (PNG, SVG) and document renderers (HTML, text).

mod export;
mod html;
mod png_encoder;
mod svg;
mod text;

pub use export::{export_charts, ChartFormat};
pub use html::{file_stem, HtmlRenderer};
pub use png_encoder::PngEncoder;
pub use svg::{escape_xml, polar, SvgElement, SvgEncoder, TextAnchor};
pub use text::TextRenderer;
