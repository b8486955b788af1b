//! Charts module - plot descriptions and static rendering

mod colormap;
mod plotter;
mod renderer;

pub use plotter::{BoxPlot, ChartPlotter, HeatmapPlot, PlotSpec, RegressionPlot};
pub use renderer::StaticChartRenderer;
