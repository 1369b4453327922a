//! Configuration types for the pay engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::MileageRateHistory;

/// Metadata identifying a configuration set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineMetadata {
    /// Human-readable name of the configuration.
    pub name: String,
    /// Version or effective date of the configuration.
    pub version: String,
}

/// Tunable settings for the pay calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Rate per mile used when no configured rate covers an entry's date.
    #[serde(default)]
    pub fallback_mileage_rate: Decimal,
}

/// Layout of `engine.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineFile {
    /// Configuration metadata.
    pub engine: EngineMetadata,
    /// Calculation settings.
    #[serde(default)]
    pub settings: EngineSettings,
}

/// The complete engine configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    metadata: EngineMetadata,
    settings: EngineSettings,
    mileage_rates: MileageRateHistory,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(
        metadata: EngineMetadata,
        settings: EngineSettings,
        mileage_rates: MileageRateHistory,
    ) -> Self {
        Self {
            metadata,
            settings,
            mileage_rates,
        }
    }

    /// Returns the configuration metadata.
    pub fn metadata(&self) -> &EngineMetadata {
        &self.metadata
    }

    /// Returns the calculation settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns the mileage rate history.
    pub fn mileage_rates(&self) -> &MileageRateHistory {
        &self.mileage_rates
    }
}
