//! Commuter and time-lost estimates.
//!
//! The feed carries no traffic counts, so every figure in this module is a
//! heuristic derived from the congestion index. None of them are
//! measurements.

use tx_congestion_analytics_models::{CommuterImpact, SortDirection};
use tx_congestion_roadway_models::RoadwayRecord;

use crate::rank::{top_n_by, truncate_name};

/// Workdays per year used to scale per-day delay to a yearly figure.
pub const WORKDAYS_PER_YEAR: f64 = 220.0;

/// Commuters assumed per unit of congestion index.
pub const COMMUTERS_PER_TCI_UNIT: f64 = 10_000.0;

/// Estimated state population.
pub const ESTIMATED_POPULATION: f64 = 29_000_000.0;

/// Share of the population assumed to commute.
pub const COMMUTER_SHARE: f64 = 0.3;

/// Commercial trucks assumed to share the truck cost of delay.
pub const ESTIMATED_COMMERCIAL_TRUCKS: f64 = 100_000.0;

/// Estimated number of commuters affected by a roadway.
///
/// `tci * 10000`, scaled by `0.8 + (id % 10) / 25` when the record id is
/// known (a fixed per-road jitter between `0.8` and `1.16`) and by `1.0`
/// otherwise. Halves round up.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn estimate_commuters(congestion_index: f64, record_id: Option<i64>) -> i64 {
    let base = congestion_index * COMMUTERS_PER_TCI_UNIT;
    let multiplier = record_id.map_or(1.0, |id| 0.8 + (id % 10) as f64 / 25.0);
    round_half_up(base * multiplier) as i64
}

/// Yearly hours lost on a roadway, from its per-mile delay.
#[must_use]
pub fn time_wasted(delay_per_mile: f64) -> f64 {
    delay_per_mile * WORKDAYS_PER_YEAR
}

/// Rounds to the nearest integer, halves toward positive infinity.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// The `n` most congested roadways with their commuter estimates.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn commuter_impact(
    records: &[RoadwayRecord],
    n: usize,
    name_limit: usize,
) -> Vec<CommuterImpact> {
    top_n_by(records, |r| r.congestion_index, n, SortDirection::Desc)
        .into_iter()
        .map(|record| {
            let estimated_commuters = estimate_commuters(record.congestion_index, Some(record.id));
            let cost_per_commuter = if estimated_commuters > 0 {
                record.cost_of_delay / estimated_commuters as f64
            } else {
                0.0
            };
            CommuterImpact {
                id: record.id,
                name: truncate_name(&record.name, name_limit),
                full_name: record.name.clone(),
                district: record.district.clone(),
                congestion_index: record.congestion_index,
                estimated_commuters,
                cost_per_commuter,
                time_wasted: time_wasted(record.delay_per_mile),
            }
        })
        .collect()
}
