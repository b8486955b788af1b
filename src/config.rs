//! Application settings, read from an optional JSON file.

use crate::data::{DataSource, DEFAULT_DATA_URL};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// User-adjustable settings; every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// URL or local path of the CSV dataset
    pub data_source: String,
    /// Rendered plot size in pixels
    pub plot_width: u32,
    pub plot_height: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_source: DEFAULT_DATA_URL.to_string(),
            plot_width: 720,
            plot_height: 480,
        }
    }
}

impl AppConfig {
    /// Defaults, overlaid with the file at `path` when one is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;

        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn source(&self) -> DataSource {
        DataSource::parse(&self.data_source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_dataset_url() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.source(), DataSource::Url(DEFAULT_DATA_URL.to_string()));
        assert_eq!((config.plot_width, config.plot_height), (720, 480));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let path = std::env::temp_dir().join(format!(
            "car_price_lens_config_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{ "data_source": "autos.csv", "plot_width": 900 }"#).unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.source(), DataSource::File("autos.csv".into()));
        assert_eq!(config.plot_width, 900);
        assert_eq!(config.plot_height, 480);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_bad_file_is_an_error() {
        let path = std::env::temp_dir().join(format!(
            "car_price_lens_bad_config_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "not json").unwrap();
        let err = AppConfig::load(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config file"));
        std::fs::remove_file(&path).ok();
    }
}
