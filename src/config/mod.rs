//! Configuration loading and management for the pay engine.
//!
//! This module loads engine settings and the mileage rate history from YAML
//! files in a configuration directory.
//!
//! # Example
//!
//! ```no_run
//! use tech_pay_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Loaded configuration: {}", config.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{EngineConfig, EngineFile, EngineMetadata, EngineSettings};
