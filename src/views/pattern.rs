//! Pattern Visualization section: column types, correlation matrices,
//! regression plots for continuous variables and box plots for categorical ones.

use super::{matrix_table, ViewError};
use crate::charts::{ChartPlotter, PlotSpec};
use crate::data::Table;
use crate::page::{RenderSink, TableData};
use crate::stats::StatsCalculator;

/// (x column, caption, x label, y label, clamp y at zero)
const CONTINUOUS_PLOTS: [(&str, &str, &str, &str, bool); 3] = [
    (
        "engine-size",
        "Positive Linear Relationship: Engine-size vs Price",
        "Engine Size",
        "Price",
        true,
    ),
    (
        "highway-mpg",
        "Negative Linear Relationship: Highway-mpg vs Price",
        "Highway MPG",
        "Price",
        false,
    ),
    (
        "peak-rpm",
        "Weak Linear Relationship: Peak-rpm vs Price",
        "Peak RPM",
        "Price",
        false,
    ),
];

/// (category column, caption, x label, y label)
const CATEGORICAL_PLOTS: [(&str, &str, &str, &str); 3] = [
    (
        "body-style",
        "Boxplot: Body-style vs Price",
        "Body style",
        "Price",
    ),
    (
        "engine-location",
        "Boxplot: Engine-location vs Price",
        "Engine location",
        "Price (USD)",
    ),
    (
        "drive-wheels",
        "Boxplot: Drive-wheels vs Price",
        "Drive Wheels",
        "Price (USD)",
    ),
];

pub fn render(table: &Table, sink: &mut dyn RenderSink) -> Result<(), ViewError> {
    sink.heading("2. Analyzing Individual Feature Patterns Using Visualization");

    sink.paragraph("Data types of each column:");
    let mut dtypes = TableData::new(["column", "dtype"]);
    for (name, kind) in table.column_kinds() {
        dtypes.push_row([name, kind.to_string()]);
    }
    sink.table(dtypes);

    sink.paragraph(&format!(
        "Question 1: The data type of the column 'peak-rpm' is: {}",
        table.kind("peak-rpm")?
    ));

    sink.paragraph("Correlation between 'diesel' and 'price':");
    let diesel = StatsCalculator::correlation_matrix(table, &["diesel", "price"])?;
    sink.table(matrix_table(&diesel));

    sink.paragraph(
        "Question 2: Correlation between 'bore', 'stroke', 'compression-ratio', and 'horsepower':",
    );
    let engine = StatsCalculator::correlation_matrix(
        table,
        &["bore", "stroke", "compression-ratio", "horsepower"],
    )?;
    sink.table(matrix_table(&engine));

    sink.subheading("Continuous Numerical Variables");
    for (x, caption, x_label, y_label, floor_at_zero) in CONTINUOUS_PLOTS {
        sink.paragraph(caption);
        let mut plot = ChartPlotter::regression(table, x, "price")?.labelled(x_label, y_label);
        if floor_at_zero {
            plot = plot.with_y_floor(0.0);
        }
        sink.image(PlotSpec::Regression(plot));
    }

    sink.paragraph("Question 3a: Correlation between 'stroke' and 'price':");
    let stroke = StatsCalculator::correlation_matrix(table, &["stroke", "price"])?;
    sink.table(matrix_table(&stroke));

    sink.paragraph("Question 3b: Regplot for 'stroke' vs 'price':");
    sink.image(PlotSpec::Regression(ChartPlotter::regression(
        table, "stroke", "price",
    )?));

    sink.subheading("Categorical Variables");
    for (category, caption, x_label, y_label) in CATEGORICAL_PLOTS {
        sink.paragraph(caption);
        let plot = ChartPlotter::boxplot(table, category, "price")?.labelled(x_label, y_label);
        sink.image(PlotSpec::Box(plot));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;
    use crate::page::Page;

    fn rendered() -> Page {
        let table = fixtures::sample_table();
        let mut page = Page::new();
        render(&table, &mut page).unwrap();
        page
    }

    #[test]
    fn test_reports_peak_rpm_type() {
        let page = rendered();
        assert!(page
            .paragraphs()
            .any(|p| p == "Question 1: The data type of the column 'peak-rpm' is: float64"));
    }

    #[test]
    fn test_dtype_table_lists_every_column() {
        let page = rendered();
        let dtypes = page.tables().next().unwrap();
        assert_eq!(dtypes.rows.len(), 18);
        assert_eq!(dtypes.rows[0], vec!["make", "object"]);
    }

    #[test]
    fn test_correlation_tables_have_unit_diagonal() {
        let page = rendered();
        let matrices: Vec<&TableData> = page.tables().skip(1).collect();
        assert_eq!(matrices.len(), 3);
        assert_eq!(matrices[0].rows.len(), 2);
        assert_eq!(matrices[1].rows.len(), 4);
        assert_eq!(matrices[2].cell(0, "stroke"), Some("1.000000"));
        assert_eq!(matrices[1].cell(2, "compression-ratio"), Some("1.000000"));
    }

    #[test]
    fn test_plots_in_order() {
        let page = rendered();
        let plots: Vec<&PlotSpec> = page.images().collect();
        assert_eq!(plots.len(), 7);

        let PlotSpec::Regression(engine) = plots[0] else {
            panic!("expected regression plot");
        };
        assert_eq!(engine.x_label, "Engine Size");
        assert_eq!(engine.y_floor, Some(0.0));

        let PlotSpec::Regression(stroke) = plots[3] else {
            panic!("expected regression plot");
        };
        assert_eq!(stroke.x_label, "stroke");
        assert_eq!(stroke.y_floor, None);
        // mazda has no stroke, peugot has no price
        assert_eq!(stroke.points.len(), 8);

        let PlotSpec::Box(drive) = plots[6] else {
            panic!("expected box plot");
        };
        assert_eq!(drive.x_label, "Drive Wheels");
        assert_eq!(drive.y_label, "Price (USD)");
    }
}
