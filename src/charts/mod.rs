//! Charts module - chart construction and HTML rendering

mod plotter;
mod renderer;

pub use plotter::{ChartPlotter, Figure};
pub use renderer::{ChartPanel, HtmlRenderer};
