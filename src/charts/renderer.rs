//! Static Chart Renderer
//! Rasterizes plot descriptions into RGB images with plotters.
//!
//! Layout:
//! 1. Regression: scatter points, confidence band, fitted line
//! 2. Box plot: one box per category with whiskers and outlier markers
//! 3. Heatmap: RdBu colored grid with rotated column labels and a color bar on the right

use crate::charts::colormap::{palette_color, rd_bu_scaled, PRIMARY_COLOR};
use crate::charts::{BoxPlot, HeatmapPlot, PlotSpec, RegressionPlot};
use image::RgbImage;
use plotters::coord::Shift;
use plotters::prelude::*;
use thiserror::Error;

type DrawResult<T> = Result<T, Box<dyn std::error::Error>>;
type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

const FONT: &str = "sans-serif";
const CAPTION_SIZE: u32 = 20;
const LABEL_SIZE: u32 = 14;
/// Width of the color bar panel next to a heatmap
const COLOR_BAR_WIDTH: u32 = 110;
const COLOR_BAR_STEPS: usize = 100;
/// Box width in category units
const BOX_WIDTH: f64 = 0.6;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid image size {0}x{1}")]
    InvalidSize(u32, u32),
    #[error("nothing to draw for {0}")]
    Empty(String),
    #[error("chart drawing failed: {0}")]
    Drawing(String),
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render a plot into an RGB image of the requested size.
    pub fn render(spec: &PlotSpec, width: u32, height: u32) -> Result<RgbImage, RenderError> {
        // Only heatmaps reserve a fixed-width panel for the color bar.
        let min_width = match spec {
            PlotSpec::Heatmap(_) => COLOR_BAR_WIDTH + 1,
            _ => 1,
        };
        if width < min_width || height == 0 {
            return Err(RenderError::InvalidSize(width, height));
        }

        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            Self::draw(&root, spec, width).map_err(|e| RenderError::Drawing(e.to_string()))?;
        }

        RgbImage::from_raw(width, height, buffer).ok_or(RenderError::InvalidSize(width, height))
    }

    fn draw(root: &Area<'_>, spec: &PlotSpec, width: u32) -> DrawResult<()> {
        root.fill(&WHITE)?;
        match spec {
            PlotSpec::Regression(plot) => Self::draw_regression(root, plot)?,
            PlotSpec::Box(plot) => Self::draw_boxplot(root, plot)?,
            PlotSpec::Heatmap(plot) => Self::draw_heatmap(root, plot, width)?,
        }
        root.present()?;
        Ok(())
    }

    fn draw_regression(root: &Area<'_>, plot: &RegressionPlot) -> DrawResult<()> {
        let Some((x_min, x_max)) = plot.x_range() else {
            return Err(RenderError::Empty(plot.title.clone()).into());
        };

        let ys = plot
            .points
            .iter()
            .map(|p| p.1)
            .chain(plot.band.iter().flat_map(|&(_, lo, hi)| [lo, hi]));
        let (y_lo, y_hi) = Self::span(ys).unwrap_or((0.0, 1.0));

        let (x_min, x_max) = Self::pad(x_min, x_max);
        let (mut y_min, y_max) = Self::pad(y_lo, y_hi);
        if let Some(floor) = plot.y_floor {
            y_min = floor;
        }

        let mut chart = ChartBuilder::on(root)
            .caption(&plot.title, (FONT, CAPTION_SIZE))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        chart
            .configure_mesh()
            .x_desc(plot.x_label.as_str())
            .y_desc(plot.y_label.as_str())
            .label_style((FONT, LABEL_SIZE))
            .draw()?;

        if !plot.band.is_empty() {
            let mut outline: Vec<(f64, f64)> =
                plot.band.iter().map(|&(x, lo, _)| (x, lo.max(y_min))).collect();
            outline.extend(plot.band.iter().rev().map(|&(x, _, hi)| (x, hi.max(y_min))));
            chart.draw_series(std::iter::once(Polygon::new(
                outline,
                PRIMARY_COLOR.mix(0.2).filled(),
            )))?;
        }

        chart.draw_series(
            plot.points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 3, PRIMARY_COLOR.mix(0.7).filled())),
        )?;

        if let (Some(fit), Some((lo, hi))) = (plot.fit, plot.x_range()) {
            chart.draw_series(LineSeries::new(
                [lo, hi].into_iter().map(|x| (x, fit.predict(x))),
                PRIMARY_COLOR.stroke_width(2),
            ))?;
        }

        Ok(())
    }

    fn draw_boxplot(root: &Area<'_>, plot: &BoxPlot) -> DrawResult<()> {
        let Some((lo, hi)) = plot.value_range() else {
            return Err(RenderError::Empty(plot.title.clone()).into());
        };

        let count = plot.boxes.len();
        let labels: Vec<String> = plot.boxes.iter().map(|b| b.label.clone()).collect();
        let (y_min, y_max) = Self::pad(lo, hi);

        let mut chart = ChartBuilder::on(root)
            .caption(&plot.title, (FONT, CAPTION_SIZE))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(-0.5..(count as f64 - 0.5), y_min..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(count)
            .x_label_formatter(&|x| Self::category_label(&labels, *x))
            .x_desc(plot.x_label.as_str())
            .y_desc(plot.y_label.as_str())
            .label_style((FONT, LABEL_SIZE))
            .draw()?;

        for (i, b) in plot.boxes.iter().enumerate() {
            let color = palette_color(i);
            let center = i as f64;
            let left = center - BOX_WIDTH / 2.0;
            let right = center + BOX_WIDTH / 2.0;

            // Whiskers with caps
            for (from, to) in [(b.whisker_low, b.q1), (b.q3, b.whisker_high)] {
                chart.draw_series(std::iter::once(PathElement::new(
                    vec![(center, from), (center, to)],
                    BLACK.stroke_width(1),
                )))?;
            }
            for cap in [b.whisker_low, b.whisker_high] {
                chart.draw_series(std::iter::once(PathElement::new(
                    vec![(center - BOX_WIDTH / 4.0, cap), (center + BOX_WIDTH / 4.0, cap)],
                    BLACK.stroke_width(1),
                )))?;
            }

            chart.draw_series([
                Rectangle::new([(left, b.q1), (right, b.q3)], color.mix(0.6).filled()),
                Rectangle::new([(left, b.q1), (right, b.q3)], BLACK.stroke_width(1)),
            ])?;

            chart.draw_series(std::iter::once(PathElement::new(
                vec![(left, b.median), (right, b.median)],
                BLACK.stroke_width(2),
            )))?;

            chart.draw_series(
                b.outliers
                    .iter()
                    .map(|&v| Circle::new((center, v), 3, BLACK.stroke_width(1))),
            )?;
        }

        Ok(())
    }

    fn draw_heatmap(root: &Area<'_>, plot: &HeatmapPlot, width: u32) -> DrawResult<()> {
        let Some((lo, hi)) = plot.value_range() else {
            return Err(RenderError::Empty(plot.title.clone()).into());
        };
        let (lo, hi) = if hi > lo { (lo, hi) } else { (lo - 1.0, hi + 1.0) };

        let (grid_area, bar_area) = root.split_horizontally(width - COLOR_BAR_WIDTH);
        let rows = plot.row_labels.len();
        let cols = plot.col_labels.len();

        let font = FontDesc::new(FontFamily::SansSerif, LABEL_SIZE as f64, FontStyle::Normal);
        let x_label_style = if plot.rotate_x_labels {
            font.transform(FontTransform::Rotate90)
        } else {
            font
        };

        let mut chart = ChartBuilder::on(&grid_area)
            .caption(&plot.title, (FONT, CAPTION_SIZE))
            .margin(15)
            .x_label_area_size(90)
            .y_label_area_size(70)
            .build_cartesian_2d(-0.5..(cols as f64 - 0.5), -0.5..(rows as f64 - 0.5))?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(cols)
            .y_labels(rows)
            .x_label_formatter(&|x| Self::category_label(&plot.col_labels, *x))
            .y_label_formatter(&|y| Self::category_label(&plot.row_labels, *y))
            .x_label_style(x_label_style)
            .y_label_style((FONT, LABEL_SIZE))
            .x_desc(plot.x_label.as_str())
            .y_desc(plot.y_label.as_str())
            .draw()?;

        chart.draw_series(plot.values.iter().enumerate().flat_map(|(r, row)| {
            row.iter().enumerate().map(move |(c, &v)| {
                let (x, y) = (c as f64, r as f64);
                Rectangle::new(
                    [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                    rd_bu_scaled(v, lo, hi).filled(),
                )
            })
        }))?;

        let mut bar = ChartBuilder::on(&bar_area)
            .margin_top(45)
            .margin_bottom(105)
            .margin_right(15)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0..1.0, lo..hi)?;

        bar.configure_mesh()
            .disable_mesh()
            .disable_x_axis()
            .y_labels(6)
            .y_label_style((FONT, LABEL_SIZE - 2))
            .draw()?;

        let step = (hi - lo) / COLOR_BAR_STEPS as f64;
        bar.draw_series((0..COLOR_BAR_STEPS).map(|i| {
            let from = lo + step * i as f64;
            Rectangle::new(
                [(0.0, from), (1.0, from + step)],
                rd_bu_scaled(from + step / 2.0, lo, hi).filled(),
            )
        }))?;

        Ok(())
    }

    /// Label for a tick sitting on an integer category position.
    fn category_label(labels: &[String], position: f64) -> String {
        let index = position.round();
        if (position - index).abs() > 1e-6 || index < 0.0 {
            return String::new();
        }
        labels.get(index as usize).cloned().unwrap_or_default()
    }

    fn span(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
        values
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Widen a range by 5% on each side (or by 1 when it is a single point).
    fn pad(min: f64, max: f64) -> (f64, f64) {
        let margin = if max > min { (max - min) * 0.05 } else { 1.0 };
        (min - margin, max + margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartPlotter;
    use crate::data::{fixtures, DataProcessor};

    const WIDTH: u32 = 720;
    const HEIGHT: u32 = 480;

    fn assert_drawn(image: &RgbImage) {
        assert_eq!(image.dimensions(), (WIDTH, HEIGHT));
        assert!(image.pixels().any(|p| p.0 != [255, 255, 255]));
    }

    fn heatmap() -> PlotSpec {
        let table = fixtures::pivot_table();
        let grouped =
            DataProcessor::group_mean(&table, "drive-wheels", "body-style", "price").unwrap();
        PlotSpec::Heatmap(ChartPlotter::heatmap(&DataProcessor::pivot(&grouped, 0.0)))
    }

    #[test]
    fn test_renders_regression_with_floor() {
        let table = fixtures::sample_table();
        let plot = ChartPlotter::regression(&table, "engine-size", "price")
            .unwrap()
            .labelled("Engine Size", "Price")
            .with_y_floor(0.0);

        let image =
            StaticChartRenderer::render(&PlotSpec::Regression(plot), WIDTH, HEIGHT).unwrap();
        assert_drawn(&image);
    }

    #[test]
    fn test_renders_boxplot() {
        let table = fixtures::sample_table();
        let plot = ChartPlotter::boxplot(&table, "drive-wheels", "price")
            .unwrap()
            .labelled("Drive Wheels", "Price (USD)");

        let image = StaticChartRenderer::render(&PlotSpec::Box(plot), WIDTH, HEIGHT).unwrap();
        assert_drawn(&image);
    }

    #[test]
    fn test_renders_heatmap_with_color_bar() {
        let image = StaticChartRenderer::render(&heatmap(), WIDTH, HEIGHT).unwrap();
        assert_drawn(&image);

        // Color bar strip: right of the bar's tick labels, left of its margin.
        let bar_x = WIDTH - 30;
        assert!((0..HEIGHT).any(|y| image.get_pixel(bar_x, y).0 != [255, 255, 255]));
    }

    #[test]
    fn test_empty_boxplot_has_nothing_to_draw() {
        let plot = PlotSpec::Box(BoxPlot {
            title: "empty".to_string(),
            x_label: String::new(),
            y_label: String::new(),
            boxes: Vec::new(),
        });
        match StaticChartRenderer::render(&plot, WIDTH, HEIGHT) {
            Err(RenderError::Drawing(message)) => {
                assert!(message.contains("nothing to draw"), "{message}")
            }
            other => panic!(
                "expected drawing error, got {:?}",
                other.map(|image| image.dimensions())
            ),
        }
    }

    #[test]
    fn test_narrow_canvas_only_rejects_heatmaps() {
        assert!(matches!(
            StaticChartRenderer::render(&heatmap(), COLOR_BAR_WIDTH, HEIGHT),
            Err(RenderError::InvalidSize(_, _))
        ));

        let table = fixtures::sample_table();
        let plot = ChartPlotter::regression(&table, "horsepower", "price").unwrap();
        let image =
            StaticChartRenderer::render(&PlotSpec::Regression(plot), 240, 200).unwrap();
        assert_eq!(image.dimensions(), (240, 200));
    }

    #[test]
    fn test_category_label_only_on_integer_ticks() {
        let labels = vec!["fwd".to_string(), "rwd".to_string()];
        assert_eq!(StaticChartRenderer::category_label(&labels, 0.0), "fwd");
        assert_eq!(StaticChartRenderer::category_label(&labels, 1.0), "rwd");
        assert_eq!(StaticChartRenderer::category_label(&labels, 0.5), "");
        assert_eq!(StaticChartRenderer::category_label(&labels, 2.0), "");
        assert_eq!(StaticChartRenderer::category_label(&labels, -1.0), "");
    }

    #[test]
    fn test_pad_widens_range() {
        assert_eq!(StaticChartRenderer::pad(0.0, 100.0), (-5.0, 105.0));
        assert_eq!(StaticChartRenderer::pad(3.0, 3.0), (2.0, 4.0));
    }

    #[test]
    fn test_rejects_zero_height() {
        assert!(matches!(
            StaticChartRenderer::render(&heatmap(), WIDTH, 0),
            Err(RenderError::InvalidSize(WIDTH, 0))
        ));
    }
}
