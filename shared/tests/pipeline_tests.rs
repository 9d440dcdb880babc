//! Tests for the seasonal anomaly-detection pipeline
//! Verifies smoothing length, bounds derivation, band classification and
//! end-to-end labeling

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use shared::{
    classify, estimate_bounds, run, run_lenient, season_for, smooth_series, BoundsTable,
    GroupBounds, GroupKey, Observation, PipelineConfig, PipelineError, Season, SmoothedPoint,
};

/// Helper to build a daily series starting at `start`
fn daily_series(city: &str, start: NaiveDate, temps: &[f64]) -> Vec<Observation> {
    temps
        .iter()
        .enumerate()
        .map(|(i, &t)| {
            let date = start + Duration::days(i as i64);
            Observation::new(city, date, t, season_for(date))
        })
        .collect()
}

fn june_first() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 6, 1).unwrap()
}

// =============================================================================
// Smoother
// =============================================================================

mod smoother {
    use super::*;

    #[test]
    fn constant_series_of_35_days() {
        let series = daily_series("CityA", june_first(), &[10.0; 35]);
        let points = smooth_series(&series, 30);
        assert_eq!(points.len(), 6);
        for p in &points {
            assert_eq!(p.smoothed_temperature, 10.0);
        }
    }

    #[test]
    fn short_series_contributes_nothing() {
        let series = daily_series("CityA", june_first(), &[10.0; 29]);
        assert!(smooth_series(&series, 30).is_empty());
    }

    #[test]
    fn each_output_is_window_mean() {
        let temps: Vec<f64> = (0..40).map(|i| ((i * 7) % 13) as f64 - 4.5).collect();
        let series = daily_series("CityA", june_first(), &temps);
        let window = 5;
        let points = smooth_series(&series, window);

        for (i, p) in points.iter().enumerate() {
            let expected: f64 = temps[i..i + window].iter().sum::<f64>() / window as f64;
            assert!((p.smoothed_temperature - expected).abs() < 1e-9);
            assert_eq!(p.timestamp, series[i + window - 1].timestamp);
        }
    }

    proptest! {
        #[test]
        fn prop_output_length(len in 0usize..120, window in 1usize..40) {
            let temps = vec![1.0; len];
            let series = daily_series("CityA", june_first(), &temps);
            let points = smooth_series(&series, window);
            let expected = if len >= window { len - window + 1 } else { 0 };
            prop_assert_eq!(points.len(), expected);
        }
    }
}

// =============================================================================
// Bounds Estimator
// =============================================================================

mod bounds_estimator {
    use super::*;

    fn points(values: &[f64]) -> Vec<SmoothedPoint> {
        values
            .iter()
            .map(|&v| SmoothedPoint {
                city: "CityA".to_string(),
                timestamp: june_first(),
                season: Season::Summer,
                smoothed_temperature: v,
            })
            .collect()
    }

    #[test]
    fn three_values_give_known_band() {
        let table = estimate_bounds(&points(&[10.0, 20.0, 30.0]), 2.0);
        let b = table.get("CityA", Season::Summer).unwrap();
        assert!((b.mean - 20.0).abs() < 1e-12);
        assert!((b.std - 10.0).abs() < 1e-12);
        assert!(b.low.abs() < 1e-12);
        assert!((b.high - 40.0).abs() < 1e-12);
    }

    #[test]
    fn single_value_collapses_band() {
        let table = estimate_bounds(&points(&[17.25]), 2.0);
        let b = table.get("CityA", Season::Summer).unwrap();
        assert_eq!(b.mean, 17.25);
        assert_eq!(b.std, 0.0);
        assert_eq!(b.low, 17.25);
        assert_eq!(b.high, 17.25);
    }

    proptest! {
        #[test]
        fn prop_low_le_mean_le_high(values in prop::collection::vec(-60.0f64..60.0, 1..50)) {
            let table = estimate_bounds(&points(&values), 2.0);
            let b = table.get("CityA", Season::Summer).unwrap();
            prop_assert!(b.std >= 0.0);
            prop_assert!(b.low <= b.mean + 1e-9);
            prop_assert!(b.mean <= b.high + 1e-9);
        }
    }
}

// =============================================================================
// Classifier
// =============================================================================

mod classifier {
    use super::*;

    fn bounds_0_40() -> BoundsTable {
        let mut table = BoundsTable::new();
        table.insert(
            GroupKey::new("CityA", Season::Summer),
            GroupBounds {
                mean: 20.0,
                std: 10.0,
                low: 0.0,
                high: 40.0,
            },
        );
        table
    }

    fn obs(temperature: f64) -> Observation {
        Observation::new("CityA", june_first(), temperature, Season::Summer)
    }

    #[test]
    fn band_edges_and_outliers() {
        let labeled = classify(&[obs(50.0), obs(40.0), obs(-5.0)], &bounds_0_40()).unwrap();
        assert!(labeled[0].is_anomalous);
        assert!(!labeled[1].is_anomalous);
        assert!(labeled[2].is_anomalous);
    }

    #[test]
    fn missing_group_never_labeled() {
        let other = Observation::new("CityB", june_first(), 20.0, Season::Summer);
        let err = classify(&[obs(20.0), other], &bounds_0_40()).unwrap_err();
        assert_eq!(
            err,
            PipelineError::MissingBounds {
                city: "CityB".to_string(),
                season: Season::Summer,
            }
        );
    }

    proptest! {
        #[test]
        fn prop_inside_band_is_normal(t in 0.0f64..=40.0) {
            let labeled = classify(&[obs(t)], &bounds_0_40()).unwrap();
            prop_assert!(!labeled[0].is_anomalous);
        }

        #[test]
        fn prop_outside_band_is_anomalous(delta in 1e-6f64..100.0) {
            let labeled = classify(&[obs(40.0 + delta), obs(-delta)], &bounds_0_40()).unwrap();
            prop_assert!(labeled.iter().all(|l| l.is_anomalous));
        }
    }
}

// =============================================================================
// End-to-end
// =============================================================================

mod end_to_end {
    use super::*;

    fn spike_dataset() -> Vec<Observation> {
        let mut temps = vec![10.0; 31];
        temps[30] = 100.0;
        daily_series("CityA", june_first(), &temps)
    }

    #[test]
    fn spike_on_day_31_is_anomalous() {
        let output = run(&spike_dataset(), &PipelineConfig::default()).unwrap();

        assert_eq!(output.smoothed.len(), 2);
        assert!((output.smoothed[0].smoothed_temperature - 10.0).abs() < 1e-9);
        assert!((output.smoothed[1].smoothed_temperature - 13.0).abs() < 1e-9);

        let b = output.bounds.get("CityA", Season::Summer).unwrap();
        assert!((b.mean - 11.5).abs() < 1e-9);
        assert!(b.std > 1.5 && b.std < 2.5);

        assert_eq!(output.labeled.len(), 31);
        assert!(output.labeled[..30].iter().all(|l| !l.is_anomalous));
        assert!(output.labeled[30].is_anomalous);
    }

    #[test]
    fn labeled_output_matches_input_order() {
        let mut data = spike_dataset();
        data.reverse();
        let output = run(&data, &PipelineConfig::default()).unwrap();
        for (input, labeled) in data.iter().zip(&output.labeled) {
            assert_eq!(labeled.timestamp, input.timestamp);
            assert_eq!(labeled.temperature, input.temperature);
        }
        // Smoothing sorted the series first, so the spike is still the last window
        assert!((output.smoothed[1].smoothed_temperature - 13.0).abs() < 1e-9);
    }

    #[test]
    fn short_city_fails_strict_run() {
        let mut data = spike_dataset();
        data.extend(daily_series("Tiny", june_first(), &[5.0; 3]));

        let err = run(&data, &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::MissingBounds { ref city, .. } if city == "Tiny"));
    }

    #[test]
    fn short_city_is_unknown_in_lenient_run() {
        let mut data = spike_dataset();
        data.extend(daily_series("Tiny", june_first(), &[5.0; 3]));

        let report = run_lenient(&data, &PipelineConfig::default()).unwrap();
        assert!(!report.is_complete());
        assert_eq!(report.labeled.len(), 31);
        assert_eq!(report.unclassified, vec![31, 32, 33]);
        assert_eq!(report.missing, vec![GroupKey::new("Tiny", Season::Summer)]);
        assert_eq!(report.insufficient.len(), 1);
        assert_eq!(report.insufficient[0].city, "Tiny");
    }

    #[test]
    fn invalid_config_rejected_before_work() {
        let config = PipelineConfig {
            window: 0,
            band_multiplier: 2.0,
        };
        assert!(matches!(
            run(&spike_dataset(), &config),
            Err(PipelineError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn custom_window_and_multiplier() {
        let config = PipelineConfig::new(7, 3.0).unwrap();
        let output = run(&spike_dataset(), &config).unwrap();
        assert_eq!(output.smoothed.len(), 31 - 7 + 1);
        let b = output.bounds.get("CityA", Season::Summer).unwrap();
        assert!((b.high - (b.mean + 3.0 * b.std)).abs() < 1e-9);
    }

    #[test]
    fn seasons_split_into_separate_groups() {
        // 31 days from mid-August crosses into autumn
        let start = NaiveDate::from_ymd_opt(2021, 8, 10).unwrap();
        let temps: Vec<f64> = (0..60).map(|i| 20.0 - i as f64 * 0.1).collect();
        let data = daily_series("CityA", start, &temps);

        let output = run(&data, &PipelineConfig::new(10, 2.0).unwrap()).unwrap();
        assert!(output.bounds.get("CityA", Season::Summer).is_some());
        assert!(output.bounds.get("CityA", Season::Autumn).is_some());
        assert_eq!(output.bounds.len(), 2);
    }

    proptest! {
        #[test]
        fn prop_run_is_idempotent(temps in prop::collection::vec(-30.0f64..40.0, 30..90)) {
            let data = daily_series("CityA", june_first(), &temps);
            let config = PipelineConfig::new(5, 2.0).unwrap();
            let first = run(&data, &config);
            let second = run(&data, &config);
            prop_assert_eq!(first, second);
        }
    }
}
