//! Grouping section: mean price by drive-wheels and body-style, its pivot and heatmap.

use super::ViewError;
use crate::charts::{ChartPlotter, PlotSpec};
use crate::data::{DataProcessor, PivotTable, Table};
use crate::page::{format_number, RenderSink, TableData};

const ROW_KEY: &str = "drive-wheels";
const COLUMN_KEY: &str = "body-style";
const TARGET: &str = "price";

pub fn render(table: &Table, sink: &mut dyn RenderSink) -> Result<(), ViewError> {
    sink.heading("4. Basics of Grouping");

    let grouped = DataProcessor::group_mean(table, ROW_KEY, COLUMN_KEY, TARGET)?;
    sink.paragraph(&format!("Group by '{ROW_KEY}' and '{COLUMN_KEY}':"));
    sink.table(TableData::from_dataframe(&grouped.to_dataframe()?));

    let pivot = DataProcessor::pivot(&grouped, 0.0);
    sink.paragraph(&format!("Pivot table for '{ROW_KEY}' and '{COLUMN_KEY}':"));
    sink.table(pivot_table(&pivot));

    sink.paragraph(&format!(
        "Heatmap for '{ROW_KEY}' and '{COLUMN_KEY}' vs Price:"
    ));
    sink.image(PlotSpec::Heatmap(ChartPlotter::heatmap(&pivot)));

    Ok(())
}

/// Index column holds the row keys; remaining headers are `value / column key`.
fn pivot_table(pivot: &PivotTable) -> TableData {
    let mut header = vec![pivot.index_name.clone()];
    header.extend(
        pivot
            .col_labels
            .iter()
            .map(|c| format!("{} / {}", pivot.value_name, c)),
    );
    let mut out = TableData::new(header);

    for (label, row) in pivot.row_labels.iter().zip(&pivot.values) {
        let mut cells = vec![label.clone()];
        cells.extend(row.iter().map(|&v| format_number(v)));
        out.push_row(cells);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;
    use crate::page::Page;

    #[test]
    fn test_grouping_page() {
        let table = fixtures::pivot_table();
        let mut page = Page::new();
        render(&table, &mut page).unwrap();

        let tables: Vec<&TableData> = page.tables().collect();
        assert_eq!(tables.len(), 2);

        let grouped = tables[0];
        assert_eq!(grouped.rows.len(), 3);
        assert_eq!(grouped.cell(0, "drive-wheels"), Some("fwd"));
        assert_eq!(grouped.cell(0, "body-style"), Some("hatchback"));
        assert_eq!(grouped.cell(1, "price"), Some("10000.000000"));

        let pivot = tables[1];
        assert_eq!(
            pivot.header,
            vec!["drive-wheels", "price / hatchback", "price / sedan"]
        );
        assert_eq!(pivot.rows[1], vec!["rwd", "0.000000", "20000.000000"]);

        assert_eq!(page.images().count(), 1);
        assert!(matches!(page.images().next(), Some(PlotSpec::Heatmap(_))));
    }
}
