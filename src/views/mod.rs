//! Views module - the five dashboard sections
//!
//! ```text
//!   Section (navigation)
//!        │  render(&Table, &mut dyn RenderSink)
//!        ▼
//!   preview | pattern | descriptive | grouping | correlation
//!        │
//!        ▼
//!   RenderSink  (Page → GUI / headless text)
//! ```

mod correlation;
mod descriptive;
mod grouping;
mod pattern;
mod preview;

use crate::data::{Table, TableError};
use crate::page::{format_number, RenderSink, TableData};
use crate::stats::{CorrelationMatrix, StatsError};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewError {
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Stats(#[from] StatsError),
}

/// Dashboard sections, in navigation order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Section {
    #[default]
    ImportData,
    PatternVisualization,
    DescriptiveStatistics,
    Grouping,
    CorrelationAndCausation,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::ImportData,
        Section::PatternVisualization,
        Section::DescriptiveStatistics,
        Section::Grouping,
        Section::CorrelationAndCausation,
    ];

    /// Navigation label shown to the user.
    pub fn label(self) -> &'static str {
        match self {
            Section::ImportData => "Import Data",
            Section::PatternVisualization => "Pattern Visualization",
            Section::DescriptiveStatistics => "Descriptive Statistics",
            Section::Grouping => "Grouping",
            Section::CorrelationAndCausation => "Correlation and Causation",
        }
    }

    /// Render this section of the dashboard for `table`.
    pub fn render(self, table: &Table, sink: &mut dyn RenderSink) -> Result<(), ViewError> {
        log::info!("Rendering section '{}'", self.label());
        match self {
            Section::ImportData => preview::render(table, sink),
            Section::PatternVisualization => pattern::render(table, sink),
            Section::DescriptiveStatistics => descriptive::render(table, sink),
            Section::Grouping => grouping::render(table, sink),
            Section::CorrelationAndCausation => correlation::render(table, sink),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Correlation matrix as a table with the column names on both axes.
fn matrix_table(matrix: &CorrelationMatrix) -> TableData {
    let mut header = vec![String::new()];
    header.extend(matrix.columns.iter().cloned());
    let mut table = TableData::new(header);

    for (name, row) in matrix.columns.iter().zip(&matrix.values) {
        let mut cells = vec![name.clone()];
        cells.extend(row.iter().map(|&v| format_number(v)));
        table.push_row(cells);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;
    use crate::page::Page;

    #[test]
    fn test_labels_in_navigation_order() {
        let labels: Vec<&str> = Section::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(
            labels,
            vec![
                "Import Data",
                "Pattern Visualization",
                "Descriptive Statistics",
                "Grouping",
                "Correlation and Causation",
            ]
        );
        assert_eq!(Section::default(), Section::ImportData);
    }

    #[test]
    fn test_every_section_renders_numbered_heading() {
        let table = fixtures::sample_table();
        for (i, section) in Section::ALL.iter().enumerate() {
            let mut page = Page::new();
            section.render(&table, &mut page).unwrap();
            let first = page.headings().next().unwrap();
            assert!(
                first.starts_with(&format!("{}. ", i + 1)),
                "{section}: {first}"
            );
        }
    }

    #[test]
    fn test_missing_column_is_reported() {
        let table = fixtures::pivot_table();
        let mut page = Page::new();
        let err = Section::CorrelationAndCausation
            .render(&table, &mut page)
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
