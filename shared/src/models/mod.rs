//! Record model for the seasonal anomaly-detection pipeline

mod bounds;
mod observation;
mod statistics;

pub use bounds::*;
pub use observation::*;
pub use statistics::*;
