//! Data module - dataset loading, table access and grouping

mod loader;
mod processor;
mod table;

pub use loader::{DataLoader, DataSource, DEFAULT_DATA_URL};
pub use processor::{DataProcessor, PivotTable, ValueCounts};
pub use table::{Table, TableError};
