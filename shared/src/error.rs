//! Pipeline error types

use thiserror::Error;

use crate::types::{GroupKey, Season};

/// Errors raised by the anomaly-detection pipeline
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// Input dataset has the wrong columns or an unparseable value
    #[error("Invalid input format{}: {message}", line_suffix(.line))]
    InvalidInputFormat { line: Option<u64>, message: String },

    /// An observation's (city, season) group has no bounds
    #[error("No bounds for group ({city}, {season})")]
    MissingBounds { city: String, season: Season },

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl PipelineError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        PipelineError::InvalidInputFormat {
            line: None,
            message: message.into(),
        }
    }

    pub fn invalid_input_at(line: u64, message: impl Into<String>) -> Self {
        PipelineError::InvalidInputFormat {
            line: Some(line),
            message: message.into(),
        }
    }

    pub fn missing_bounds(key: &GroupKey) -> Self {
        PipelineError::MissingBounds {
            city: key.city.clone(),
            season: key.season,
        }
    }

    pub fn invalid_parameter(name: &str, reason: &str) -> Self {
        PipelineError::InvalidParameter {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}

fn line_suffix(line: &Option<u64>) -> String {
    line.map(|l| format!(" at line {}", l)).unwrap_or_default()
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
