//! Acceptance bands per (city, season) group

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::types::{GroupKey, Season};

/// Mean, standard deviation and the derived acceptance band of a group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupBounds {
    pub mean: f64,
    pub std: f64,
    pub low: f64,
    pub high: f64,
}

impl GroupBounds {
    /// Band is `mean ± multiplier · std`
    pub fn from_stats(mean: f64, std: f64, multiplier: f64) -> Self {
        Self {
            mean,
            std,
            low: mean - multiplier * std,
            high: mean + multiplier * std,
        }
    }

    /// Inclusive on both ends
    pub fn contains(&self, temperature: f64) -> bool {
        temperature >= self.low && temperature <= self.high
    }

    pub fn is_anomalous(&self, temperature: f64) -> bool {
        temperature < self.low || temperature > self.high
    }
}

/// Flat bounds-table row for export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundsRow {
    pub city: String,
    pub season: Season,
    pub mean: f64,
    pub std: f64,
    pub low: f64,
    pub high: f64,
}

/// Bounds for every (city, season) group seen in the smoothed series
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundsTable {
    groups: BTreeMap<GroupKey, GroupBounds>,
}

impl BoundsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: impl IntoIterator<Item = BoundsRow>) -> Self {
        let groups = rows
            .into_iter()
            .map(|row| {
                (
                    GroupKey::new(row.city, row.season),
                    GroupBounds {
                        mean: row.mean,
                        std: row.std,
                        low: row.low,
                        high: row.high,
                    },
                )
            })
            .collect();
        Self { groups }
    }

    pub fn insert(&mut self, key: GroupKey, bounds: GroupBounds) {
        self.groups.insert(key, bounds);
    }

    pub fn get(&self, city: &str, season: Season) -> Option<&GroupBounds> {
        self.groups.get(&GroupKey::new(city, season))
    }

    /// Like [`get`](Self::get) but a missing group is an error
    pub fn require(&self, city: &str, season: Season) -> Result<&GroupBounds> {
        self.get(city, season).ok_or_else(|| PipelineError::MissingBounds {
            city: city.to_string(),
            season,
        })
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &GroupBounds)> {
        self.groups.iter()
    }

    pub fn rows(&self) -> Vec<BoundsRow> {
        self.groups
            .iter()
            .map(|(key, b)| BoundsRow {
                city: key.city.clone(),
                season: key.season,
                mean: b.mean,
                std: b.std,
                low: b.low,
                high: b.high,
            })
            .collect()
    }

    pub fn rows_for_city(&self, city: &str) -> Vec<BoundsRow> {
        self.rows().into_iter().filter(|row| row.city == city).collect()
    }

    /// Distinct cities, sorted
    pub fn cities(&self) -> Vec<&str> {
        let mut cities: Vec<&str> = self.groups.keys().map(|k| k.city.as_str()).collect();
        cities.dedup();
        cities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_from_stats() {
        let bounds = GroupBounds::from_stats(20.0, 10.0, 2.0);
        assert_eq!(bounds.low, 0.0);
        assert_eq!(bounds.high, 40.0);
    }

    #[test]
    fn test_band_edges_are_normal() {
        let bounds = GroupBounds::from_stats(20.0, 10.0, 2.0);
        assert!(bounds.contains(0.0));
        assert!(bounds.contains(40.0));
        assert!(!bounds.is_anomalous(40.0));
        assert!(bounds.is_anomalous(40.000001));
        assert!(bounds.is_anomalous(-0.5));
    }

    #[test]
    fn test_zero_std_band_collapses_to_mean() {
        let bounds = GroupBounds::from_stats(12.5, 0.0, 2.0);
        assert_eq!(bounds.low, 12.5);
        assert_eq!(bounds.high, 12.5);
        assert!(!bounds.is_anomalous(12.5));
        assert!(bounds.is_anomalous(12.6));
    }

    #[test]
    fn test_require_missing_group() {
        let table = BoundsTable::new();
        let err = table.require("Oslo", Season::Winter).unwrap_err();
        assert_eq!(
            err,
            PipelineError::MissingBounds {
                city: "Oslo".to_string(),
                season: Season::Winter
            }
        );
    }

    #[test]
    fn test_rows_roundtrip_and_cities() {
        let mut table = BoundsTable::new();
        table.insert(
            GroupKey::new("Rome", Season::Summer),
            GroupBounds::from_stats(25.0, 2.0, 2.0),
        );
        table.insert(
            GroupKey::new("Rome", Season::Winter),
            GroupBounds::from_stats(8.0, 3.0, 2.0),
        );
        table.insert(
            GroupKey::new("Berlin", Season::Spring),
            GroupBounds::from_stats(10.0, 4.0, 2.0),
        );

        assert_eq!(table.cities(), vec!["Berlin", "Rome"]);
        assert_eq!(table.rows_for_city("Rome").len(), 2);
        assert_eq!(BoundsTable::from_rows(table.rows()), table);
    }
}
