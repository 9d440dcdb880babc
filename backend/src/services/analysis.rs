//! Analysis service over one pipeline run
//!
//! Runs the pipeline once when the dataset is loaded and answers read-only
//! queries about the labeled series, the bounds table and new readings.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;
use shared::{
    check_temperature, describe_by_season, run_lenient, seasonal_profiles, BoundsRow, DateRange,
    GroupKey, InsufficientHistory, Observation, PipelineConfig, PipelineReport, SeasonStatistics,
    SeasonalProfile, SmoothedPoint, TemperatureCheck,
};

use crate::error::{AppError, AppResult};

/// Analysis service holding the results of a pipeline run
#[derive(Debug)]
pub struct AnalysisService {
    config: PipelineConfig,
    report: PipelineReport,
    cities: BTreeMap<String, CityData>,
    observation_count: usize,
}

#[derive(Debug, Default)]
struct CityData {
    /// Chronological
    observations: Vec<ObservationView>,
    smoothed: Vec<SmoothedPoint>,
}

/// Observation as exposed to consumers.
///
/// `is_anomalous` is `None` when the observation's group has no bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationView {
    pub city: String,
    pub timestamp: NaiveDate,
    pub temperature: f64,
    pub season: shared::Season,
    pub is_anomalous: Option<bool>,
}

impl ObservationView {
    fn to_observation(&self) -> Observation {
        Observation::new(self.city.clone(), self.timestamp, self.temperature, self.season)
    }
}

/// Per-city counts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitySummary {
    pub city: String,
    pub observations: usize,
    pub anomalies: usize,
    pub unclassified: usize,
    pub seasons_with_bounds: usize,
}

/// Overview of the whole run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    pub observations: usize,
    pub anomalies: usize,
    pub unclassified: usize,
    pub cities: usize,
    pub groups: usize,
    pub window: usize,
    pub band_multiplier: f64,
    pub insufficient_history: Vec<InsufficientHistory>,
    pub missing_bounds: Vec<GroupKey>,
}

/// Filter for a city's observations
#[derive(Debug, Clone, Default)]
pub struct ObservationFilter {
    pub range: DateRange,
    pub anomalies_only: bool,
}

impl AnalysisService {
    /// Run the pipeline over `observations` and index the results by city
    pub fn new(observations: Vec<Observation>, config: PipelineConfig) -> AppResult<Self> {
        let report = run_lenient(&observations, &config)?;

        let unclassified: HashSet<usize> = report.unclassified.iter().copied().collect();
        let mut labels = report.labeled.iter();
        let mut cities: BTreeMap<String, CityData> = BTreeMap::new();

        for (position, obs) in observations.iter().enumerate() {
            let is_anomalous = if unclassified.contains(&position) {
                None
            } else {
                labels.next().map(|l| l.is_anomalous)
            };
            cities
                .entry(obs.city.clone())
                .or_default()
                .observations
                .push(ObservationView {
                    city: obs.city.clone(),
                    timestamp: obs.timestamp,
                    temperature: obs.temperature,
                    season: obs.season,
                    is_anomalous,
                });
        }

        for point in &report.smoothed {
            if let Some(city) = cities.get_mut(&point.city) {
                city.smoothed.push(point.clone());
            }
        }

        for city in cities.values_mut() {
            city.observations.sort_by_key(|o| o.timestamp);
        }

        tracing::info!(
            observations = observations.len(),
            cities = cities.len(),
            groups = report.bounds.len(),
            "Analysis ready"
        );

        Ok(Self {
            config,
            report,
            cities,
            observation_count: observations.len(),
        })
    }

    /// Summary of the run
    pub fn summary(&self) -> AnalysisSummary {
        AnalysisSummary {
            observations: self.observation_count,
            anomalies: self.report.labeled.iter().filter(|l| l.is_anomalous).count(),
            unclassified: self.report.unclassified.len(),
            cities: self.cities.len(),
            groups: self.report.bounds.len(),
            window: self.config.window,
            band_multiplier: self.config.band_multiplier,
            insufficient_history: self.report.insufficient.clone(),
            missing_bounds: self.report.missing.clone(),
        }
    }

    /// All cities in the dataset, sorted by name
    pub fn cities(&self) -> Vec<CitySummary> {
        self.cities
            .iter()
            .map(|(name, data)| CitySummary {
                city: name.clone(),
                observations: data.observations.len(),
                anomalies: data
                    .observations
                    .iter()
                    .filter(|o| o.is_anomalous == Some(true))
                    .count(),
                unclassified: data
                    .observations
                    .iter()
                    .filter(|o| o.is_anomalous.is_none())
                    .count(),
                seasons_with_bounds: self.report.bounds.rows_for_city(name).len(),
            })
            .collect()
    }

    /// Full bounds table, one row per (city, season)
    pub fn bounds_rows(&self) -> Vec<BoundsRow> {
        self.report.bounds.rows()
    }

    pub fn city_bounds(&self, city: &str) -> AppResult<Vec<BoundsRow>> {
        self.city(city)?;
        Ok(self.report.bounds.rows_for_city(city))
    }

    /// A city's observations in chronological order
    pub fn city_observations(
        &self,
        city: &str,
        filter: &ObservationFilter,
    ) -> AppResult<Vec<ObservationView>> {
        let data = self.city(city)?;
        Ok(data
            .observations
            .iter()
            .filter(|o| filter.range.contains(o.timestamp))
            .filter(|o| !filter.anomalies_only || o.is_anomalous == Some(true))
            .cloned()
            .collect())
    }

    pub fn city_smoothed(&self, city: &str) -> AppResult<Vec<SmoothedPoint>> {
        Ok(self.city(city)?.smoothed.clone())
    }

    /// Descriptive statistics of raw temperatures per season
    pub fn season_statistics(&self, city: &str) -> AppResult<Vec<SeasonStatistics>> {
        let observations = self.raw_observations(city)?;
        Ok(describe_by_season(&observations))
    }

    pub fn seasonal_profiles(&self, city: &str) -> AppResult<Vec<SeasonalProfile>> {
        let observations = self.raw_observations(city)?;
        Ok(seasonal_profiles(&observations))
    }

    /// Compare a newly observed temperature with the band for the season of
    /// `date`
    pub fn check_temperature(
        &self,
        city: &str,
        temperature: f64,
        date: NaiveDate,
    ) -> AppResult<TemperatureCheck> {
        self.city(city)?;
        Ok(check_temperature(&self.report.bounds, city, date, temperature)?)
    }

    fn city(&self, city: &str) -> AppResult<&CityData> {
        self.cities
            .get(city)
            .ok_or_else(|| AppError::NotFound(format!("City '{}'", city)))
    }

    fn raw_observations(&self, city: &str) -> AppResult<Vec<Observation>> {
        Ok(self
            .city(city)?
            .observations
            .iter()
            .map(ObservationView::to_observation)
            .collect())
    }
}
