//! Per-(city, season) bounds from the smoothed series

use std::collections::BTreeMap;

use crate::models::{mean, sample_std, BoundsTable, GroupBounds, SmoothedPoint};
use crate::types::{GroupKey, Season};

/// Group smoothed points by (city, season) and derive each group's band.
///
/// The std is the sample standard deviation; a group with a single point
/// has std 0 and therefore `low == high == mean`. Only groups present in
/// `points` get an entry.
pub fn estimate_bounds(points: &[SmoothedPoint], band_multiplier: f64) -> BoundsTable {
    let mut groups: BTreeMap<(&str, Season), Vec<f64>> = BTreeMap::new();
    for point in points {
        groups
            .entry((point.city.as_str(), point.season))
            .or_default()
            .push(point.smoothed_temperature);
    }

    let mut table = BoundsTable::new();
    for ((city, season), values) in groups {
        let group_mean = mean(&values);
        let std_dev = sample_std(&values, group_mean);
        tracing::debug!(
            city,
            season = %season,
            points = values.len(),
            mean = group_mean,
            std = std_dev,
            "Estimated group bounds"
        );
        table.insert(
            GroupKey::new(city, season),
            GroupBounds::from_stats(group_mean, std_dev, band_multiplier),
        );
    }

    table
}
