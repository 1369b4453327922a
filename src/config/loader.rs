//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration from YAML files.

use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::calculation::{MileageRateLookup, resolve_mileage_rate};
use crate::error::{EngineError, EngineResult};
use crate::models::{MileageRate, MileageRateHistory};

use super::types::{EngineConfig, EngineFile, EngineMetadata, EngineSettings};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/default/
/// ├── engine.yaml            # Metadata and calculation settings
/// └── mileage_rates/
///     ├── 2024-01-01.yaml    # One rate window per file
///     └── 2025-01-01.yaml
/// ```
///
/// # Example
///
/// ```no_run
/// use tech_pay_engine::config::ConfigLoader;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
///
/// let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
/// let lookup = loader.mileage_rate_for_date(date);
/// println!("Rate per mile: ${}", lookup.rate);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `engine.yaml` or the `mileage_rates` directory is missing
    /// - Any file contains invalid YAML
    /// - The mileage rates overlap
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let engine_path = path.join("engine.yaml");
        let engine_file = Self::load_yaml::<EngineFile>(&engine_path)?;

        let rates_dir = path.join("mileage_rates");
        let rates = Self::load_rates(&rates_dir)?;
        let mileage_rates = MileageRateHistory::new(rates)?;

        if mileage_rates.is_empty() {
            warn!(
                path = %rates_dir.display(),
                "No mileage rates configured; every lookup will use the fallback rate"
            );
        }

        debug!(
            path = %path.display(),
            rate_count = mileage_rates.rates().len(),
            "Loaded engine configuration"
        );

        Ok(Self {
            config: EngineConfig::new(engine_file.engine, engine_file.settings, mileage_rates),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads all rate files from the mileage rates directory.
    fn load_rates(rates_dir: &Path) -> EngineResult<Vec<MileageRate>> {
        let rates_dir_str = rates_dir.display().to_string();

        let entries = fs::read_dir(rates_dir).map_err(|_| EngineError::ConfigNotFound {
            path: rates_dir_str.clone(),
        })?;

        let mut rates = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: rates_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                rates.push(Self::load_yaml::<MileageRate>(&path)?);
            }
        }

        Ok(rates)
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the configuration metadata.
    pub fn metadata(&self) -> &EngineMetadata {
        self.config.metadata()
    }

    /// Returns the calculation settings.
    pub fn settings(&self) -> &EngineSettings {
        self.config.settings()
    }

    /// Returns the mileage rate history.
    pub fn mileage_rates(&self) -> &MileageRateHistory {
        self.config.mileage_rates()
    }

    /// Resolves the mileage rate effective on `date`, falling back to the
    /// configured default when no rate covers it.
    pub fn mileage_rate_for_date(&self, date: NaiveDate) -> MileageRateLookup {
        resolve_mileage_rate(
            self.mileage_rates(),
            date,
            self.settings().fallback_mileage_rate,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/default"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.metadata().name, "Technician Pay Distribution Engine");
        assert_eq!(loader.settings().fallback_mileage_rate, Decimal::ZERO);
    }

    #[test]
    fn test_rates_are_loaded_newest_first() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let rates = loader.mileage_rates().rates();

        assert_eq!(rates.len(), 3);
        assert_eq!(rates[0].effective_date, date(2025, 1, 1));
        assert!(rates[0].is_open_ended());
        assert_eq!(rates[2].effective_date, date(2023, 1, 1));
    }

    #[test]
    fn test_mileage_rate_for_date_uses_history() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        assert_eq!(loader.mileage_rate_for_date(date(2023, 7, 1)).rate, dec("0.655"));
        assert_eq!(loader.mileage_rate_for_date(date(2024, 12, 31)).rate, dec("0.67"));
        assert_eq!(loader.mileage_rate_for_date(date(2026, 2, 1)).rate, dec("0.70"));
    }

    #[test]
    fn test_mileage_rate_before_history_uses_fallback() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let lookup = loader.mileage_rate_for_date(date(2020, 1, 1));
        assert!(lookup.used_fallback);
        assert_eq!(lookup.rate, Decimal::ZERO);
    }

    #[test]
    fn test_empty_rates_directory_falls_back() {
        let dir = std::env::temp_dir().join(format!("pay-engine-empty-rates-{}", std::process::id()));
        fs::create_dir_all(dir.join("mileage_rates")).unwrap();
        fs::write(
            dir.join("engine.yaml"),
            "engine:\n  name: Empty\n  version: \"1\"\nsettings:\n  fallback_mileage_rate: \"0.50\"\n",
        )
        .unwrap();

        let loader = ConfigLoader::load(&dir).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert!(loader.mileage_rates().is_empty());
        let lookup = loader.mileage_rate_for_date(date(2025, 3, 3));
        assert!(lookup.used_fallback);
        assert_eq!(lookup.rate, dec("0.50"));
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("engine.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }
}
