//! Shared types and pipeline for the Temperature Anomaly Detector
//!
//! This crate contains the record model and the seasonal anomaly-detection
//! pipeline used by the backend service and the WASM bindings.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod types;
pub mod validation;

pub use config::*;
pub use error::PipelineError;
pub use models::*;
pub use pipeline::*;
pub use types::*;
pub use validation::*;
