//! Labels raw observations against their group's band

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::error::{PipelineError, Result};
use crate::models::{BoundsTable, LabeledObservation, Observation, TemperatureCheck};
use crate::types::{season_for, GroupKey};

/// Classification that skips groups without bounds instead of failing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialClassification {
    /// Labeled observations in input order, unknown groups omitted
    pub labeled: Vec<LabeledObservation>,
    /// Input positions of the observations left unlabeled
    pub unclassified: Vec<usize>,
    /// Distinct groups without bounds, sorted
    pub missing: Vec<GroupKey>,
}

/// Label every observation; fails on the first group without bounds.
///
/// A temperature equal to `low` or `high` is normal.
pub fn classify(
    observations: &[Observation],
    bounds: &BoundsTable,
) -> Result<Vec<LabeledObservation>> {
    observations
        .iter()
        .map(|obs| {
            let band = bounds.require(&obs.city, obs.season)?;
            Ok(LabeledObservation::new(obs, band.is_anomalous(obs.temperature)))
        })
        .collect()
}

/// Label what can be labeled and report the rest as unknown.
///
/// Never assigns a default label to an observation without bounds.
pub fn classify_partial(
    observations: &[Observation],
    bounds: &BoundsTable,
) -> PartialClassification {
    let mut result = PartialClassification::default();
    let mut missing = BTreeSet::new();

    for (position, obs) in observations.iter().enumerate() {
        match bounds.get(&obs.city, obs.season) {
            Some(band) => result
                .labeled
                .push(LabeledObservation::new(obs, band.is_anomalous(obs.temperature))),
            None => {
                result.unclassified.push(position);
                missing.insert(obs.group_key());
            }
        }
    }

    result.missing = missing.into_iter().collect();
    result
}

/// Compare a newly observed temperature against the band for `city` in the
/// season of `date`
pub fn check_temperature(
    bounds: &BoundsTable,
    city: &str,
    date: NaiveDate,
    temperature: f64,
) -> Result<TemperatureCheck> {
    if !temperature.is_finite() {
        return Err(PipelineError::invalid_parameter(
            "temperature",
            "must be a finite number",
        ));
    }

    let season = season_for(date);
    let band = bounds.require(city, season)?;

    Ok(TemperatureCheck {
        city: city.to_string(),
        date,
        season,
        temperature,
        low: band.low,
        high: band.high,
        is_anomalous: band.is_anomalous(temperature),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GroupBounds;
    use crate::types::Season;

    fn table() -> BoundsTable {
        let mut table = BoundsTable::new();
        table.insert(
            GroupKey::new("CityA", Season::Summer),
            GroupBounds::from_stats(20.0, 10.0, 2.0),
        );
        table
    }

    fn summer(temperature: f64) -> Observation {
        Observation::new(
            "CityA",
            NaiveDate::from_ymd_opt(2020, 7, 1).unwrap(),
            temperature,
            Season::Summer,
        )
    }

    #[test]
    fn test_band_classification() {
        let data = vec![summer(50.0), summer(40.0), summer(-5.0), summer(0.0), summer(21.0)];
        let labels: Vec<bool> = classify(&data, &table())
            .unwrap()
            .iter()
            .map(|l| l.is_anomalous)
            .collect();
        assert_eq!(labels, vec![true, false, true, false, false]);
    }

    #[test]
    fn test_missing_group_is_error() {
        let data = vec![
            summer(20.0),
            Observation::new(
                "CityA",
                NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
                -5.0,
                Season::Winter,
            ),
        ];
        let err = classify(&data, &table()).unwrap_err();
        assert_eq!(
            err,
            PipelineError::MissingBounds {
                city: "CityA".to_string(),
                season: Season::Winter,
            }
        );
    }

    #[test]
    fn test_partial_keeps_known_groups() {
        let data = vec![
            Observation::new(
                "CityZ",
                NaiveDate::from_ymd_opt(2020, 7, 1).unwrap(),
                20.0,
                Season::Summer,
            ),
            summer(50.0),
            Observation::new(
                "CityZ",
                NaiveDate::from_ymd_opt(2020, 7, 2).unwrap(),
                21.0,
                Season::Summer,
            ),
        ];
        let partial = classify_partial(&data, &table());
        assert_eq!(partial.labeled.len(), 1);
        assert!(partial.labeled[0].is_anomalous);
        assert_eq!(partial.unclassified, vec![0, 2]);
        assert_eq!(partial.missing, vec![GroupKey::new("CityZ", Season::Summer)]);
    }

    #[test]
    fn test_check_temperature_uses_date_season() {
        let july = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
        let check = check_temperature(&table(), "CityA", july, 45.0).unwrap();
        assert_eq!(check.season, Season::Summer);
        assert!(check.is_anomalous);
        assert_eq!(check.low, 0.0);
        assert_eq!(check.high, 40.0);

        let january = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert!(matches!(
            check_temperature(&table(), "CityA", january, 0.0),
            Err(PipelineError::MissingBounds { .. })
        ));
    }

    #[test]
    fn test_check_temperature_rejects_nan() {
        let july = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
        assert!(check_temperature(&table(), "CityA", july, f64::NAN).is_err());
    }
}
