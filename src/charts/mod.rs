//! Charts module - chart specifications, interactive plotting and PNG export

mod builder;
mod plotter;
mod renderer;

pub use builder::{ChartBuilder, ChartSpec, PanelMetric};
pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;
