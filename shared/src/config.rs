//! Tunable pipeline parameters

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::validation::{validate_band_multiplier, validate_window};

/// Trailing window length used by the smoother
pub const DEFAULT_WINDOW: usize = 30;

/// Width of the acceptance band in standard deviations
pub const DEFAULT_BAND_MULTIPLIER: f64 = 2.0;

/// Parameters for one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of samples in the trailing moving average
    pub window: usize,

    /// Band half-width as a multiple of the group standard deviation
    pub band_multiplier: f64,
}

impl PipelineConfig {
    pub fn new(window: usize, band_multiplier: f64) -> Result<Self> {
        let config = Self {
            window,
            band_multiplier,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_window(self.window)
            .map_err(|reason| PipelineError::invalid_parameter("window", reason))?;
        validate_band_multiplier(self.band_multiplier)
            .map_err(|reason| PipelineError::invalid_parameter("band_multiplier", reason))?;
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            band_multiplier: DEFAULT_BAND_MULTIPLIER,
        }
    }
}
