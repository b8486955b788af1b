//! Descriptive Statistics section.

use super::ViewError;
use crate::data::{DataProcessor, Table, ValueCounts};
use crate::page::{format_number, RenderSink, TableData};
use crate::stats::{CategoricalSummary, NumericSummary, StatsCalculator};

/// Columns whose value counts are listed.
const COUNTED_COLUMNS: [&str; 2] = ["drive-wheels", "engine-location"];

pub fn render(table: &Table, sink: &mut dyn RenderSink) -> Result<(), ViewError> {
    sink.heading("3. Descriptive Statistical Analysis");

    sink.paragraph("Descriptive statistics for continuous variables:");
    sink.table(numeric_describe(table)?);

    sink.paragraph("Descriptive statistics for categorical variables:");
    sink.table(categorical_describe(table)?);

    for column in COUNTED_COLUMNS {
        sink.paragraph(&format!("Value counts for '{column}':"));
        let counts = DataProcessor::value_counts(table, column)?;
        sink.table(value_counts_table(&counts));
    }

    Ok(())
}

/// Statistic rows by numeric column.
fn numeric_describe(table: &Table) -> Result<TableData, ViewError> {
    let columns = table.numeric_columns();
    let summaries = columns
        .iter()
        .map(|c| StatsCalculator::describe_numeric(table, c))
        .collect::<Result<Vec<_>, _>>()?;

    let mut header = vec![String::new()];
    header.extend(columns);
    let mut out = TableData::new(header);

    for (i, label) in NumericSummary::LABELS.iter().enumerate() {
        let mut row = vec![label.to_string()];
        row.extend(summaries.iter().map(|s| format_number(s.values()[i])));
        out.push_row(row);
    }
    Ok(out)
}

/// count / unique / top / freq by categorical column.
fn categorical_describe(table: &Table) -> Result<TableData, ViewError> {
    let columns = table.categorical_columns();
    let summaries = columns
        .iter()
        .map(|c| StatsCalculator::describe_categorical(table, c))
        .collect::<Result<Vec<_>, _>>()?;

    let mut header = vec![String::new()];
    header.extend(columns);
    let mut out = TableData::new(header);

    for label in CategoricalSummary::LABELS {
        let mut row = vec![label.to_string()];
        row.extend(summaries.iter().map(|s| match label {
            "count" => s.count.to_string(),
            "unique" => s.unique.to_string(),
            "top" => s.top.clone().unwrap_or_else(|| "NaN".to_string()),
            _ => s.freq.to_string(),
        }));
        out.push_row(row);
    }
    Ok(out)
}

/// Two columns: the value (headed by the source column) and `value_counts`.
fn value_counts_table(counts: &ValueCounts) -> TableData {
    let mut out = TableData::new([counts.column.as_str(), "value_counts"]);
    for (value, n) in &counts.counts {
        out.push_row([value.clone(), n.to_string()]);
    }
    out
}
