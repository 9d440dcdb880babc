//! Descriptive statistics over raw temperatures

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::models::Observation;
use crate::types::Season;

/// Arithmetic mean; `NaN` for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator).
///
/// Fewer than two values have no spread to estimate and yield 0.
pub fn sample_std(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Quantile of an ascending slice with linear interpolation between ranks
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let rank = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = rank.ceil() as usize;
            let frac = rank - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * frac
        }
    }
}

/// Summary of one season's raw temperatures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonStatistics {
    pub season: Season,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

impl SeasonStatistics {
    pub fn from_values(season: Season, values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let mean = mean(values);

        Some(Self {
            season,
            count: values.len(),
            mean,
            std: sample_std(values, mean),
            min: sorted[0],
            p25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            p75: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Mean temperature on one calendar day across all years
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMean {
    pub month: u32,
    pub day: u32,
    pub mean_temperature: f64,
}

/// Average day-by-day shape of a season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalProfile {
    pub season: Season,
    /// Calendar order within the season; December precedes January
    pub days: Vec<DailyMean>,
    pub mean: f64,
    pub std: f64,
}

/// Descriptive statistics of raw temperatures grouped by season
pub fn describe_by_season<'a, I>(observations: I) -> Vec<SeasonStatistics>
where
    I: IntoIterator<Item = &'a Observation>,
{
    let mut by_season: BTreeMap<Season, Vec<f64>> = BTreeMap::new();
    for obs in observations {
        by_season.entry(obs.season).or_default().push(obs.temperature);
    }

    by_season
        .into_iter()
        .filter_map(|(season, values)| SeasonStatistics::from_values(season, &values))
        .collect()
}

/// Per-season daily climatology
pub fn seasonal_profiles<'a, I>(observations: I) -> Vec<SeasonalProfile>
where
    I: IntoIterator<Item = &'a Observation>,
{
    // (month % 12) puts December ahead of January and February
    let mut by_season: BTreeMap<Season, BTreeMap<(u32, u32), Vec<f64>>> = BTreeMap::new();
    for obs in observations {
        let month = obs.timestamp.month();
        by_season
            .entry(obs.season)
            .or_default()
            .entry((month % 12, obs.timestamp.day()))
            .or_default()
            .push(obs.temperature);
    }

    by_season
        .into_iter()
        .map(|(season, days)| {
            let all: Vec<f64> = days.values().flatten().copied().collect();
            let season_mean = mean(&all);
            SeasonalProfile {
                season,
                days: days
                    .into_iter()
                    .map(|((rank, day), values)| DailyMean {
                        month: if rank == 0 { 12 } else { rank },
                        day,
                        mean_temperature: mean(&values),
                    })
                    .collect(),
                mean: season_mean,
                std: sample_std(&all, season_mean),
            }
        })
        .collect()
}
