//! High-level plot types.
//!
//! Ready-to-use chart builders that render to a vector scene
//! ([`SvgEncoder`](crate::output::SvgEncoder)).

mod bar;
mod frame;
mod histogram;
mod pie;
mod scatter;

pub use bar::{BarChart, BarColor};
pub use histogram::Histogram;
pub use pie::{PieChart, Slice};
pub use scatter::ScatterPlot;
