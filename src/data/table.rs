//! Table Module
//! Read-only wrapper around the loaded Polars DataFrame with typed column access.

use polars::prelude::*;
use std::fmt;
use std::io::Cursor;
use thiserror::Error;

/// Cell markers treated as missing values when parsing.
const NULL_MARKERS: [&str; 2] = ["?", "NaN"];

/// Rows scanned for schema inference.
const INFER_SCHEMA_ROWS: usize = 10000;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column '{0}' not found")]
    MissingColumn(String),
    #[error("Column '{0}' is not numeric")]
    NotNumeric(String),
    #[error("CSV has no columns")]
    NoColumns,
}

/// Inferred value type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Categorical,
}

impl ColumnKind {
    pub fn from_dtype(dtype: &DataType) -> Self {
        match dtype {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => ColumnKind::Integer,
            DataType::Float32 | DataType::Float64 => ColumnKind::Float,
            _ => ColumnKind::Categorical,
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, ColumnKind::Categorical)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ColumnKind::Integer => "int64",
            ColumnKind::Float => "float64",
            ColumnKind::Categorical => "object",
        };
        f.write_str(label)
    }
}

/// The dataset, loaded once and never mutated.
#[derive(Debug, Clone)]
pub struct Table {
    df: DataFrame,
}

impl Table {
    pub fn new(df: DataFrame) -> Self {
        Self { df }
    }

    /// Parse CSV text (with header row) into a table.
    pub fn from_csv_bytes(bytes: Vec<u8>) -> Result<Self, TableError> {
        let null_values = NullValues::AllColumns(NULL_MARKERS.iter().map(|s| (*s).into()).collect());

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .with_parse_options(CsvParseOptions::default().with_null_values(Some(null_values)))
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;

        if df.width() == 0 {
            return Err(TableError::NoColumns);
        }

        Ok(Self::new(df))
    }

    #[cfg(test)]
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn width(&self) -> usize {
        self.df.width()
    }

    /// Every column with its inferred kind, in file order.
    pub fn column_kinds(&self) -> Vec<(String, ColumnKind)> {
        self.df
            .get_columns()
            .iter()
            .map(|col| (col.name().to_string(), ColumnKind::from_dtype(col.dtype())))
            .collect()
    }

    pub fn kind(&self, column: &str) -> Result<ColumnKind, TableError> {
        self.df
            .column(column)
            .map(|col| ColumnKind::from_dtype(col.dtype()))
            .map_err(|_| TableError::MissingColumn(column.to_string()))
    }

    pub fn numeric_columns(&self) -> Vec<String> {
        self.column_kinds()
            .into_iter()
            .filter(|(_, kind)| kind.is_numeric())
            .map(|(name, _)| name)
            .collect()
    }

    pub fn categorical_columns(&self) -> Vec<String> {
        self.column_kinds()
            .into_iter()
            .filter(|(_, kind)| !kind.is_numeric())
            .map(|(name, _)| name)
            .collect()
    }

    /// Values of a numeric column as f64; nulls and NaN become `None`.
    pub fn numeric(&self, column: &str) -> Result<Vec<Option<f64>>, TableError> {
        if !self.kind(column)?.is_numeric() {
            return Err(TableError::NotNumeric(column.to_string()));
        }

        let values = self.column(column)?.cast(&DataType::Float64)?;
        let values_ca = values.f64()?;

        Ok(values_ca
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect())
    }

    /// Values of any column rendered as strings; nulls and empty cells become `None`.
    pub fn categorical(&self, column: &str) -> Result<Vec<Option<String>>, TableError> {
        let values = self.column(column)?.cast(&DataType::String)?;
        let values_ca = values.as_materialized_series().str()?;

        Ok(values_ca
            .into_iter()
            .map(|v| v.filter(|s| !s.is_empty()).map(str::to_string))
            .collect())
    }

    /// First `n` rows as a new DataFrame.
    pub fn head(&self, n: usize) -> DataFrame {
        self.df.head(Some(n))
    }

    fn column(&self, column: &str) -> Result<&Column, TableError> {
        self.df
            .column(column)
            .map_err(|_| TableError::MissingColumn(column.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;

    #[test]
    fn test_infers_column_kinds() {
        let table = fixtures::sample_table();

        assert_eq!(table.kind("price").unwrap(), ColumnKind::Float);
        assert_eq!(table.kind("curb-weight").unwrap(), ColumnKind::Integer);
        assert_eq!(table.kind("drive-wheels").unwrap(), ColumnKind::Categorical);
        assert_eq!(ColumnKind::Categorical.to_string(), "object");
    }

    #[test]
    fn test_missing_markers_become_none() {
        let table = fixtures::sample_table();
        let stroke = table.numeric("stroke").unwrap();
        assert_eq!(stroke.len(), table.height());
        assert!(stroke.iter().any(|v| v.is_none()));

        let price = table.numeric("price").unwrap();
        assert_eq!(price.iter().filter(|v| v.is_none()).count(), 1);
    }

    #[test]
    fn test_missing_column_and_non_numeric() {
        let table = fixtures::sample_table();
        assert!(matches!(
            table.numeric("no-such-column"),
            Err(TableError::MissingColumn(_))
        ));
        assert!(matches!(
            table.numeric("body-style"),
            Err(TableError::NotNumeric(_))
        ));
    }

    #[test]
    fn test_numeric_and_categorical_partition_columns() {
        let table = fixtures::sample_table();
        let numeric = table.numeric_columns();
        let categorical = table.categorical_columns();
        assert_eq!(numeric.len() + categorical.len(), table.width());
        assert!(numeric.contains(&"price".to_string()));
        assert!(categorical.contains(&"body-style".to_string()));
    }

    #[test]
    fn test_head_limits_rows() {
        let table = fixtures::sample_table();
        assert_eq!(table.head(5).height(), 5);
        assert_eq!(table.head(100).height(), table.height());
    }

    #[test]
    fn test_empty_csv_is_rejected() {
        assert!(Table::from_csv_bytes(Vec::new()).is_err());
    }
}
