//! Rendering sink and the in-memory page it produces.
//!
//! Views only talk to [`RenderSink`]; the GUI, the headless printer and the tests
//! all consume the resulting [`Page`].

use crate::charts::PlotSpec;
use polars::prelude::*;
use std::fmt;

/// One output element, appended in emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOp {
    /// Level 1 is a section heading, level 2 a sub-heading.
    Heading { level: u8, text: String },
    Paragraph(String),
    Table(TableData),
    Image(PlotSpec),
}

/// Anything that can display a page of output.
pub trait RenderSink {
    fn emit(&mut self, op: RenderOp);

    fn heading(&mut self, text: &str) {
        self.emit(RenderOp::Heading {
            level: 1,
            text: text.to_string(),
        });
    }

    fn subheading(&mut self, text: &str) {
        self.emit(RenderOp::Heading {
            level: 2,
            text: text.to_string(),
        });
    }

    fn paragraph(&mut self, text: &str) {
        self.emit(RenderOp::Paragraph(text.to_string()));
    }

    fn table(&mut self, table: TableData) {
        self.emit(RenderOp::Table(table));
    }

    fn image(&mut self, plot: PlotSpec) {
        self.emit(RenderOp::Image(plot));
    }
}

/// Rectangular text table; the first column usually holds the index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableData {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    pub fn new<S: Into<String>>(header: impl IntoIterator<Item = S>) -> Self {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row<S: Into<String>>(&mut self, row: impl IntoIterator<Item = S>) {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    /// Every cell of a DataFrame, with a leading row-number index column.
    pub fn from_dataframe(df: &DataFrame) -> Self {
        let mut header = vec![String::new()];
        header.extend(df.get_column_names().iter().map(|s| s.to_string()));
        let mut table = Self::new(header);

        for i in 0..df.height() {
            let mut row = vec![i.to_string()];
            row.extend(df.get_columns().iter().map(|col| {
                col.get(i)
                    .map(|value| cell_text(&value))
                    .unwrap_or_default()
            }));
            table.rows.push(row);
        }

        table
    }

    #[cfg(test)]
    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Cell at `row`, looked up by header name.
    #[cfg(test)]
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let c = self.header.iter().position(|h| h == column)?;
        self.rows.get(row)?.get(c).map(String::as_str)
    }
}

/// Display text of a single DataFrame value.
pub fn cell_text(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => "NaN".to_string(),
        AnyValue::Float64(v) => format_number(*v),
        AnyValue::Float32(v) => format_number(*v as f64),
        AnyValue::String(s) => s.to_string(),
        other => other.to_string().trim_matches('"').to_string(),
    }
}

/// Fixed six-decimal rendering used for every computed number.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value:.6}")
    }
}

/// In-memory sink: an ordered list of render operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    ops: Vec<RenderOp>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[RenderOp] {
        &self.ops
    }

    #[cfg(test)]
    pub fn headings(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            RenderOp::Heading { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    #[cfg(test)]
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            RenderOp::Paragraph(text) => Some(text.as_str()),
            _ => None,
        })
    }

    #[cfg(test)]
    pub fn tables(&self) -> impl Iterator<Item = &TableData> {
        self.ops.iter().filter_map(|op| match op {
            RenderOp::Table(table) => Some(table),
            _ => None,
        })
    }

    pub fn images(&self) -> impl Iterator<Item = &PlotSpec> {
        self.ops.iter().filter_map(|op| match op {
            RenderOp::Image(plot) => Some(plot),
            _ => None,
        })
    }
}

impl RenderSink for Page {
    fn emit(&mut self, op: RenderOp) {
        self.ops.push(op);
    }
}

impl fmt::Display for TableData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut widths: Vec<usize> = self.header.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                match widths.get_mut(i) {
                    Some(w) => *w = (*w).max(cell.chars().count()),
                    None => widths.push(cell.chars().count()),
                }
            }
        }

        write_row(f, &self.header, &widths)?;
        for row in &self.rows {
            write_row(f, row, &widths)?;
        }
        Ok(())
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, cells: &[String], widths: &[usize]) -> fmt::Result {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:>width$}"))
        .collect();
    writeln!(f, "{}", line.join("  ").trim_end())
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op in &self.ops {
            match op {
                RenderOp::Heading { level, text } => {
                    writeln!(f, "{} {}", "#".repeat(*level as usize), text)?
                }
                RenderOp::Paragraph(text) => writeln!(f, "{text}")?,
                RenderOp::Table(table) => write!(f, "{table}")?,
                RenderOp::Image(plot) => writeln!(f, "[{}: {}]", plot.kind_name(), plot.title())?,
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
