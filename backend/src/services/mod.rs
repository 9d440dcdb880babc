//! Business logic services for the Temperature Anomaly Detector

pub mod analysis;
pub mod reporting;

pub use analysis::{AnalysisService, ObservationFilter};
pub use reporting::ReportingService;
