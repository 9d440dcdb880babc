//! Seasonal anomaly-detection pipeline
//!
//! Raw series → smoothed series → per-group bounds → labeled series. Each
//! stage is a pure function of the previous stage's output.

pub mod classifier;
pub mod estimator;
pub mod smoother;

pub use classifier::{check_temperature, classify, classify_partial, PartialClassification};
pub use estimator::estimate_bounds;
pub use smoother::{
    running_mean, smooth_all, smooth_series, split_by_city, CitySeries, SmoothingOutcome,
};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::{
    BoundsTable, InsufficientHistory, LabeledObservation, Observation, SmoothedPoint,
};
use crate::types::GroupKey;

/// Output of a strict pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub smoothed: Vec<SmoothedPoint>,
    pub bounds: BoundsTable,
    /// One entry per input observation, in input order
    pub labeled: Vec<LabeledObservation>,
    pub insufficient: Vec<InsufficientHistory>,
}

/// Output of a lenient run, where groups without bounds stay unknown
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    pub smoothed: Vec<SmoothedPoint>,
    pub bounds: BoundsTable,
    pub labeled: Vec<LabeledObservation>,
    pub unclassified: Vec<usize>,
    pub missing: Vec<GroupKey>,
    pub insufficient: Vec<InsufficientHistory>,
}

impl PipelineReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Run smoothing, bound estimation and classification.
///
/// Fails with `MissingBounds` if any observation's group has no bounds.
pub fn run(observations: &[Observation], config: &PipelineConfig) -> Result<PipelineOutput> {
    config.validate()?;

    let (smoothing, bounds) = estimate(observations, config);
    let labeled = classify(observations, &bounds)?;

    tracing::info!(
        observations = observations.len(),
        groups = bounds.len(),
        anomalies = labeled.iter().filter(|l| l.is_anomalous).count(),
        "Pipeline run complete"
    );

    Ok(PipelineOutput {
        smoothed: smoothing.points,
        bounds,
        labeled,
        insufficient: smoothing.insufficient,
    })
}

/// Like [`run`], but observations without bounds are reported rather than
/// failing the whole batch
pub fn run_lenient(
    observations: &[Observation],
    config: &PipelineConfig,
) -> Result<PipelineReport> {
    config.validate()?;

    let (smoothing, bounds) = estimate(observations, config);
    let partial = classify_partial(observations, &bounds);

    if !partial.missing.is_empty() {
        tracing::warn!(
            groups = partial.missing.len(),
            observations = partial.unclassified.len(),
            "Some groups have no bounds and were left unclassified"
        );
    }

    Ok(PipelineReport {
        smoothed: smoothing.points,
        bounds,
        labeled: partial.labeled,
        unclassified: partial.unclassified,
        missing: partial.missing,
        insufficient: smoothing.insufficient,
    })
}

fn estimate(
    observations: &[Observation],
    config: &PipelineConfig,
) -> (SmoothingOutcome, BoundsTable) {
    let smoothing = smooth_all(observations, config.window);
    let bounds = estimate_bounds(&smoothing.points, config.band_multiplier);
    tracing::debug!(
        smoothed = smoothing.points.len(),
        groups = bounds.len(),
        "Estimated bounds"
    );
    (smoothing, bounds)
}
