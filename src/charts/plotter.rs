//! Chart Plotter Module
//! Builds plot descriptions from the table. Rasterizing them is the renderer's job,
//! so everything here can be inspected without a display.

use crate::data::{PivotTable, Table};
use crate::stats::{BoxSummary, LinearFit, StatsCalculator, StatsError, CONFIDENCE_LEVEL};

/// Points sampled along the x range for the confidence band.
const BAND_SAMPLES: usize = 100;

/// A plot ready to be rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum PlotSpec {
    Regression(RegressionPlot),
    Box(BoxPlot),
    Heatmap(HeatmapPlot),
}

impl PlotSpec {
    pub fn title(&self) -> &str {
        match self {
            PlotSpec::Regression(p) => &p.title,
            PlotSpec::Box(p) => &p.title,
            PlotSpec::Heatmap(p) => &p.title,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            PlotSpec::Regression(_) => "regression plot",
            PlotSpec::Box(_) => "box plot",
            PlotSpec::Heatmap(_) => "heatmap",
        }
    }
}

/// Scatter of two columns with the least-squares line and its confidence band.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionPlot {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<(f64, f64)>,
    /// `None` when x is constant.
    pub fit: Option<LinearFit>,
    /// `(x, low, high)` samples of the band.
    pub band: Vec<(f64, f64, f64)>,
    /// Lower bound forced onto the y axis.
    pub y_floor: Option<f64>,
}

impl RegressionPlot {
    pub fn labelled(mut self, x_label: &str, y_label: &str) -> Self {
        self.x_label = x_label.to_string();
        self.y_label = y_label.to_string();
        self
    }

    pub fn with_y_floor(mut self, floor: f64) -> Self {
        self.y_floor = Some(floor);
        self
    }

    pub fn x_range(&self) -> Option<(f64, f64)> {
        min_max(self.points.iter().map(|p| p.0))
    }
}

/// Distribution of a value per category.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxPlot {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub boxes: Vec<BoxSummary>,
}

impl BoxPlot {
    pub fn labelled(mut self, x_label: &str, y_label: &str) -> Self {
        self.x_label = x_label.to_string();
        self.y_label = y_label.to_string();
        self
    }

    /// Span of whiskers and outliers across all boxes.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        min_max(self.boxes.iter().flat_map(|b| {
            [b.whisker_low, b.whisker_high]
                .into_iter()
                .chain(b.outliers.iter().copied())
        }))
    }
}

/// Color-coded grid of a pivot table; row 0 is drawn at the bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapPlot {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    pub values: Vec<Vec<f64>>,
    pub rotate_x_labels: bool,
}

impl HeatmapPlot {
    pub fn value_range(&self) -> Option<(f64, f64)> {
        min_max(self.values.iter().flatten().copied())
    }
}

/// Creates plot descriptions from table columns.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Scatter of `y` against `x` with an OLS line; axis labels default to the column names.
    pub fn regression(table: &Table, x: &str, y: &str) -> Result<RegressionPlot, StatsError> {
        let points = StatsCalculator::complete_pairs(&table.numeric(x)?, &table.numeric(y)?);

        let fit = match StatsCalculator::fit_line(&points) {
            Ok(fit) => Some(fit),
            Err(err) => {
                log::warn!("No regression line for {x} vs {y}: {err}");
                None
            }
        };

        let band = match (fit, min_max(points.iter().map(|p| p.0))) {
            (Some(fit), Some((lo, hi))) => {
                let step = (hi - lo) / (BAND_SAMPLES - 1) as f64;
                let xs: Vec<f64> = (0..BAND_SAMPLES).map(|i| lo + step * i as f64).collect();
                fit.confidence_band(&xs, CONFIDENCE_LEVEL)
            }
            _ => Vec::new(),
        };

        Ok(RegressionPlot {
            title: format!("{x} vs {y}"),
            x_label: x.to_string(),
            y_label: y.to_string(),
            points,
            fit,
            band,
            y_floor: None,
        })
    }

    /// One box of `value` per category of `category`.
    pub fn boxplot(table: &Table, category: &str, value: &str) -> Result<BoxPlot, StatsError> {
        Ok(BoxPlot {
            title: format!("{value} by {category}"),
            x_label: category.to_string(),
            y_label: value.to_string(),
            boxes: StatsCalculator::box_summaries_by(table, category, value)?,
        })
    }

    /// Heatmap of a pivot: columns along x, rows along y.
    pub fn heatmap(pivot: &PivotTable) -> HeatmapPlot {
        HeatmapPlot {
            title: format!(
                "{} by {} and {}",
                pivot.value_name, pivot.index_name, pivot.columns_name
            ),
            x_label: pivot.columns_name.clone(),
            y_label: pivot.index_name.clone(),
            row_labels: pivot.row_labels.clone(),
            col_labels: pivot.col_labels.clone(),
            values: pivot.values.clone(),
            rotate_x_labels: true,
        }
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
