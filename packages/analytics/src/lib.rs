#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation and classification pipeline over congested roadway records.
//!
//! Every function here is pure: it borrows a slice of
//! [`RoadwayRecord`](tx_congestion_roadway_models::RoadwayRecord)s and returns
//! freshly built view types from `tx_congestion_analytics_models`. Nothing
//! holds state between calls, so the same snapshot can be aggregated from
//! any number of threads.

pub mod aggregate;
pub mod classify;
pub mod estimate;
pub mod filter;
pub mod format;
pub mod normalize;
pub mod quality;
pub mod rank;
pub mod report;

use thiserror::Error;

pub use aggregate::{
    aggregate_by_district, aggregate_by_road_type, aggregate_by_severity, cost_breakdown,
    count_by_severity, district_costs, district_names, sort_districts, top_road_types,
};
pub use classify::{classify_road_type, classify_severity, congestion_color};
pub use estimate::{commuter_impact, estimate_commuters};
pub use normalize::{comparison_view, normalize_districts};
pub use rank::{ranking, top_n, top_n_by, truncate_name};
pub use report::build_report;

/// Errors that can occur when resolving analytics parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// A metric name did not match any known metric.
    #[error("Unknown metric: {name}")]
    UnknownMetric {
        /// The name as given.
        name: String,
    },

    /// A sort direction other than `asc` or `desc`.
    #[error("Unknown sort direction: {name}")]
    UnknownDirection {
        /// The name as given.
        name: String,
    },

    /// A congestion bound is `NaN` or infinite.
    #[error("Congestion bounds must be finite")]
    NonFiniteBound,

    /// The lower congestion bound is above the upper one.
    #[error("Invalid congestion range: {min} is above {max}")]
    InvertedRange {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
}

/// Parses a roadway metric by its camelCase name.
///
/// # Errors
///
/// Returns [`AnalyticsError::UnknownMetric`] for unrecognised names.
pub fn parse_rank_metric(
    name: &str,
) -> Result<tx_congestion_analytics_models::RankMetric, AnalyticsError> {
    name.parse().map_err(|_| AnalyticsError::UnknownMetric {
        name: name.to_string(),
    })
}

/// Parses a district metric by its camelCase name.
///
/// # Errors
///
/// Returns [`AnalyticsError::UnknownMetric`] for unrecognised names.
pub fn parse_district_metric(
    name: &str,
) -> Result<tx_congestion_analytics_models::DistrictMetric, AnalyticsError> {
    name.parse().map_err(|_| AnalyticsError::UnknownMetric {
        name: name.to_string(),
    })
}

/// Parses `asc` / `desc`, case-insensitively.
///
/// # Errors
///
/// Returns [`AnalyticsError::UnknownDirection`] for anything else.
pub fn parse_direction(
    name: &str,
) -> Result<tx_congestion_analytics_models::SortDirection, AnalyticsError> {
    name.parse().map_err(|_| AnalyticsError::UnknownDirection {
        name: name.to_string(),
    })
}
