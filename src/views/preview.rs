//! Import Data section: load confirmation and the first rows.

use super::ViewError;
use crate::data::Table;
use crate::page::{RenderSink, TableData};

/// Rows shown in the preview.
pub const PREVIEW_ROWS: usize = 5;

pub fn render(table: &Table, sink: &mut dyn RenderSink) -> Result<(), ViewError> {
    sink.heading("1. Import Data");
    sink.paragraph("Data loaded successfully!");
    sink.paragraph(&format!(
        "{} rows × {} columns",
        table.height(),
        table.width()
    ));
    sink.table(TableData::from_dataframe(&table.head(PREVIEW_ROWS)));
    Ok(())
}
