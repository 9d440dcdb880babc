//! Observation records flowing through the pipeline

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{GroupKey, Season};

/// One historical temperature reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub city: String,
    pub timestamp: NaiveDate,
    pub temperature: f64,
    pub season: Season,
}

impl Observation {
    pub fn new(
        city: impl Into<String>,
        timestamp: NaiveDate,
        temperature: f64,
        season: Season,
    ) -> Self {
        Self {
            city: city.into(),
            timestamp,
            temperature,
            season,
        }
    }

    pub fn group_key(&self) -> GroupKey {
        GroupKey::new(self.city.clone(), self.season)
    }
}

/// Trailing moving average aligned to the right edge of its window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothedPoint {
    pub city: String,
    pub timestamp: NaiveDate,
    pub season: Season,
    pub smoothed_temperature: f64,
}

/// Observation with its anomaly label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledObservation {
    pub city: String,
    pub timestamp: NaiveDate,
    pub temperature: f64,
    pub season: Season,
    pub is_anomalous: bool,
}

impl LabeledObservation {
    pub fn new(observation: &Observation, is_anomalous: bool) -> Self {
        Self {
            city: observation.city.clone(),
            timestamp: observation.timestamp,
            temperature: observation.temperature,
            season: observation.season,
            is_anomalous,
        }
    }

    pub fn to_observation(&self) -> Observation {
        Observation::new(self.city.clone(), self.timestamp, self.temperature, self.season)
    }
}

/// A city whose series is shorter than the smoothing window.
///
/// Not an error: the city contributes no smoothed points and therefore no
/// bounds, so its observations are unknown rather than normal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsufficientHistory {
    pub city: String,
    pub observations: usize,
    pub window: usize,
}

/// Result of comparing a single new temperature against its group's band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureCheck {
    pub city: String,
    pub date: NaiveDate,
    pub season: Season,
    pub temperature: f64,
    pub low: f64,
    pub high: f64,
    pub is_anomalous: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled_keeps_observation_fields() {
        let obs = Observation::new(
            "Tokyo",
            NaiveDate::from_ymd_opt(2015, 7, 4).unwrap(),
            31.2,
            Season::Summer,
        );
        let labeled = LabeledObservation::new(&obs, true);
        assert_eq!(labeled.to_observation(), obs);
        assert!(labeled.is_anomalous);
    }

    #[test]
    fn test_labeled_serializes_flat() {
        let obs = Observation::new(
            "Cairo",
            NaiveDate::from_ymd_opt(2012, 1, 2).unwrap(),
            14.5,
            Season::Winter,
        );
        let json = serde_json::to_value(LabeledObservation::new(&obs, false)).unwrap();
        assert_eq!(json["city"], "Cairo");
        assert_eq!(json["timestamp"], "2012-01-02");
        assert_eq!(json["season"], "winter");
        assert_eq!(json["is_anomalous"], false);
    }
}
