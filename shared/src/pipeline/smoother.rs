//! Trailing moving average per city

use std::collections::HashMap;

use crate::models::{InsufficientHistory, Observation, SmoothedPoint};

/// One city's observations in chronological order
#[derive(Debug, Clone)]
pub struct CitySeries<'a> {
    pub city: &'a str,
    pub observations: Vec<&'a Observation>,
}

/// Smoothed points for every city plus the cities that were too short
#[derive(Debug, Clone, Default)]
pub struct SmoothingOutcome {
    pub points: Vec<SmoothedPoint>,
    pub insufficient: Vec<InsufficientHistory>,
}

/// Moving average with 'valid' convolution semantics.
///
/// Output position `i` is the mean of `values[i..i + window]`, so the result
/// has `len - window + 1` entries, or none when the input is shorter than
/// the window. Each window is summed on its own so a large reading cannot
/// leave rounding error behind in later outputs.
pub fn running_mean(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 {
        return Vec::new();
    }

    values
        .windows(window)
        .map(|w| w.iter().sum::<f64>() / window as f64)
        .collect()
}

/// Smooth one city's chronologically sorted series.
///
/// Each value is paired with the timestamp and season at the right edge of
/// its window.
pub fn smooth_series<'a, I>(series: I, window: usize) -> Vec<SmoothedPoint>
where
    I: IntoIterator<Item = &'a Observation>,
{
    let series: Vec<&Observation> = series.into_iter().collect();
    let temperatures: Vec<f64> = series.iter().map(|o| o.temperature).collect();

    running_mean(&temperatures, window)
        .into_iter()
        .zip(series.iter().skip(window.saturating_sub(1)))
        .map(|(smoothed_temperature, obs)| SmoothedPoint {
            city: obs.city.clone(),
            timestamp: obs.timestamp,
            season: obs.season,
            smoothed_temperature,
        })
        .collect()
}

/// Split observations by city, in order of first appearance.
///
/// Each city's series is stably sorted by timestamp.
pub fn split_by_city(observations: &[Observation]) -> Vec<CitySeries<'_>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut series: Vec<CitySeries<'_>> = Vec::new();

    for obs in observations {
        let slot = *index.entry(obs.city.as_str()).or_insert_with(|| {
            series.push(CitySeries {
                city: obs.city.as_str(),
                observations: Vec::new(),
            });
            series.len() - 1
        });
        series[slot].observations.push(obs);
    }

    for city in &mut series {
        city.observations.sort_by_key(|o| o.timestamp);
    }

    series
}

/// Smooth every city independently
pub fn smooth_all(observations: &[Observation], window: usize) -> SmoothingOutcome {
    let mut outcome = SmoothingOutcome::default();

    for city in split_by_city(observations) {
        let len = city.observations.len();
        if len < window {
            tracing::warn!(
                city = city.city,
                observations = len,
                window,
                "Series shorter than smoothing window, city gets no bounds"
            );
            outcome.insufficient.push(InsufficientHistory {
                city: city.city.to_string(),
                observations: len,
                window,
            });
            continue;
        }

        let points = smooth_series(city.observations, window);
        tracing::debug!(city = city.city, points = points.len(), "Smoothed series");
        outcome.points.extend(points);
    }

    outcome
}
