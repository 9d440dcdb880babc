//! Configuration management for the Temperature Anomaly Detector
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with TAD_ prefix

use config::{builder::DefaultState, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use shared::{PipelineConfig, PipelineError, DEFAULT_BAND_MULTIPLIER, DEFAULT_WINDOW};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Historical dataset configuration
    pub dataset: DatasetConfig,

    /// Smoothing window and band width
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatasetConfig {
    /// Path to the CSV file with columns city, timestamp, temperature, season
    pub path: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("TAD_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = Self::defaults(&environment)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (TAD_ prefix)
            .add_source(
                Environment::with_prefix("TAD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from an inline TOML document layered over the defaults
    pub fn from_toml_str(environment: &str, toml: &str) -> Result<Self, ConfigError> {
        Self::defaults(environment)?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Validated pipeline parameters
    pub fn pipeline(&self) -> Result<PipelineConfig, PipelineError> {
        self.pipeline.validate()?;
        Ok(self.pipeline)
    }

    fn defaults(environment: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("environment", environment)?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("dataset.path", "data/temperature_data.csv")?
            .set_default("pipeline.window", DEFAULT_WINDOW as i64)?
            .set_default("pipeline.band_multiplier", DEFAULT_BAND_MULTIPLIER)
    }
}
