//! Dataset Loader Module
//! Fetches the automobile CSV (HTTP or local file) once and parses it into a Table.

use super::table::{Table, TableError};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Location of the cleaned automobile dataset.
pub const DEFAULT_DATA_URL: &str =
    "https://raw.githubusercontent.com/klamsal/Fall2024Exam/refs/heads/main/CleanedAutomobile.csv";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Data unavailable: request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Data unavailable: {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("Data unavailable: cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Data unavailable: empty response from {0}")]
    Empty(String),
    #[error("Data unavailable: malformed CSV: {0}")]
    Malformed(#[from] TableError),
}

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    File(PathBuf),
}

impl DataSource {
    /// `http://` and `https://` locations are fetched, anything else is a file path.
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            DataSource::Url(trimmed.to_string())
        } else {
            DataSource::File(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => f.write_str(url),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Owns the dataset after the first successful load.
pub struct DataLoader {
    source: DataSource,
    table: Option<Table>,
}

impl DataLoader {
    pub fn new(source: DataSource) -> Self {
        Self {
            source,
            table: None,
        }
    }

    /// Load the table, fetching only on the first call.
    pub fn load(&mut self) -> Result<&Table, LoaderError> {
        let table = match self.table.take() {
            Some(table) => table,
            None => Self::fetch(&self.source)?,
        };
        Ok(self.table.insert(table))
    }

    /// Consume the loader and hand the table to its owner.
    pub fn into_table(mut self) -> Result<Table, LoaderError> {
        match self.table.take() {
            Some(table) => Ok(table),
            None => Self::fetch(&self.source),
        }
    }

    /// Read and parse the source without caching.
    pub fn fetch(source: &DataSource) -> Result<Table, LoaderError> {
        log::info!("Loading dataset from {source}");

        let bytes = match source {
            DataSource::Url(url) => {
                let response = reqwest::blocking::get(url)?;
                let status = response.status();
                if !status.is_success() {
                    return Err(LoaderError::Status {
                        url: url.clone(),
                        status: status.as_u16(),
                    });
                }
                response.bytes()?.to_vec()
            }
            DataSource::File(path) => std::fs::read(path).map_err(|source| LoaderError::Io {
                path: path.clone(),
                source,
            })?,
        };

        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(LoaderError::Empty(source.to_string()));
        }

        let table = Table::from_csv_bytes(bytes)?;
        log::info!(
            "Loaded {} rows, {} columns from {source}",
            table.height(),
            table.width()
        );
        Ok(table)
    }
}
