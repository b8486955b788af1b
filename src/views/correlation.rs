//! Correlation and Causation section: Pearson coefficient and p-value of each
//! continuous variable against price.

use super::ViewError;
use crate::data::{Table, TableError};
use crate::page::RenderSink;
use crate::stats::{Correlation, StatsCalculator, StatsError};

/// (column, display label), in display order.
pub const PRICE_CORRELATION_COLUMNS: [(&str, &str); 9] = [
    ("wheel-base", "Wheel-Base"),
    ("horsepower", "Horsepower"),
    ("length", "Length"),
    ("width", "Width"),
    ("curb-weight", "Curb-Weight"),
    ("engine-size", "Engine-Size"),
    ("bore", "Bore"),
    ("city-mpg", "City-mpg"),
    ("highway-mpg", "Highway-mpg"),
];

const TARGET: &str = "price";

/// Correlation of every listed column with price; a missing column fails the whole set.
pub fn price_correlations(
    table: &Table,
) -> Result<Vec<(&'static str, Result<Correlation, StatsError>)>, TableError> {
    let price = table.numeric(TARGET)?;

    PRICE_CORRELATION_COLUMNS
        .iter()
        .map(|&(column, label)| {
            let values = table.numeric(column)?;
            Ok::<_, TableError>((label, StatsCalculator::pearson(&values, &price)))
        })
        .collect()
}

pub fn render(table: &Table, sink: &mut dyn RenderSink) -> Result<(), ViewError> {
    sink.heading("5. Correlation and Causation");
    sink.paragraph("Pearson Correlation examples:");

    for (label, result) in price_correlations(table)? {
        sink.paragraph(&format!("{label} vs Price:"));
        match result {
            Ok(c) => sink.paragraph(&format!(
                "Pearson Correlation Coefficient: {}, P-value: {}",
                c.coefficient, c.p_value
            )),
            Err(err) => {
                log::warn!("Skipping {label} vs Price: {err}");
                sink.paragraph(&format!("Correlation could not be computed: {err}"));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;
    use crate::page::Page;

    #[test]
    fn test_fixed_order_and_bounds() {
        let table = fixtures::sample_table();
        let results = price_correlations(&table).unwrap();

        let labels: Vec<&str> = results.iter().map(|(l, _)| *l).collect();
        assert_eq!(
            labels,
            vec![
                "Wheel-Base",
                "Horsepower",
                "Length",
                "Width",
                "Curb-Weight",
                "Engine-Size",
                "Bore",
                "City-mpg",
                "Highway-mpg"
            ]
        );

        for (label, result) in &results {
            let c = result.as_ref().unwrap();
            assert!((-1.0..=1.0).contains(&c.coefficient), "{label}");
            assert!((0.0..=1.0).contains(&c.p_value), "{label}");
            assert_eq!(c.n, 9, "{label}");
        }
    }

    #[test]
    fn test_page_pairs_label_with_numbers() {
        let table = fixtures::sample_table();
        let mut page = Page::new();
        render(&table, &mut page).unwrap();

        let paragraphs: Vec<&str> = page.paragraphs().collect();
        assert_eq!(paragraphs.len(), 1 + 2 * PRICE_CORRELATION_COLUMNS.len());
        assert_eq!(paragraphs[1], "Wheel-Base vs Price:");
        assert!(paragraphs[2].starts_with("Pearson Correlation Coefficient: "));
        assert!(paragraphs[2].contains(", P-value: "));
        assert_eq!(paragraphs[17], "Highway-mpg vs Price:");
    }

    #[test]
    fn test_constant_column_reported_inline() {
        let csv = "\
wheel-base,horsepower,length,width,curb-weight,engine-size,bore,city-mpg,highway-mpg,price
90,100,0.8,0.9,2000,100,3.0,20,30,10000
90,120,0.9,0.9,2200,120,3.1,22,28,12000
90,140,1.0,0.9,2400,140,3.2,24,26,15000
";
        let table = Table::from_csv_bytes(csv.as_bytes().to_vec()).unwrap();
        let results = price_correlations(&table).unwrap();
        assert!(matches!(results[0].1, Err(StatsError::ConstantInput)));

        let mut page = Page::new();
        render(&table, &mut page).unwrap();
        assert!(page
            .paragraphs()
            .any(|p| p.starts_with("Correlation could not be computed")));
    }
}
