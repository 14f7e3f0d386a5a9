#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Roadway record types shared across the congestion toolchain.
//!
//! A [`RoadwayRecord`] is one segment from the `TxDOT` Top 100 Congested
//! Roadways feed after its raw `GeoJSON` properties have been renamed and
//! typed. Records are immutable once mapped; every downstream view borrows
//! them and builds new containers.

use serde::{Deserialize, Serialize};

/// Raw property names used by the `ArcGIS` feed.
pub mod properties {
    /// Roadway name.
    pub const ROAD_NAME: &str = "RD_NM";
    /// Overall congestion rank (1 = worst).
    pub const RANK: &str = "RANK";
    /// Rank by truck delay.
    pub const TRUCK_RANK: &str = "TRK_RANK";
    /// `TxDOT` district name.
    pub const DISTRICT: &str = "DIST_NM";
    /// Annual hours of delay per mile.
    pub const DELAY_PER_MILE: &str = "DLAY_MILE";
    /// Travel time / congestion index.
    pub const CONGESTION_INDEX: &str = "TCI";
    /// Annual cost of delay.
    pub const COST_OF_DELAY: &str = "COST_DLAY";
    /// Annual truck delay hours.
    pub const TRUCK_DELAY: &str = "TRK_DLY";
    /// Annual truck cost of delay.
    pub const COST_OF_TRUCK_DELAY: &str = "COST_TRK";
    /// Data vintage.
    pub const YEAR: &str = "YR";
    /// Segment identifier.
    pub const SEGMENT_ID: &str = "SEG_ID";
    /// `ArcGIS` object id, used when the feature itself carries no id.
    pub const FID: &str = "FID";
}

/// Path of a roadway segment as `[longitude, latitude]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadGeometry {
    /// `GeoJSON` geometry type the coordinates came from.
    #[serde(rename = "type")]
    pub kind: String,
    /// Ordered vertices, verbatim from the feed.
    pub coordinates: Vec<[f64; 2]>,
}

impl RoadGeometry {
    /// A geometry with no vertices.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            kind: "LineString".to_string(),
            coordinates: Vec::new(),
        }
    }

    /// Returns `true` when the path has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}

/// Envelope of a set of geometries, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    /// Minimum longitude.
    pub west: f64,
    /// Minimum latitude.
    pub south: f64,
    /// Maximum longitude.
    pub east: f64,
    /// Maximum latitude.
    pub north: f64,
}

/// One congested roadway segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadwayRecord {
    /// Stable identifier (feature id).
    pub id: i64,
    /// Roadway name (e.g. "IH 35").
    pub name: String,
    /// Overall congestion rank, 1 = worst.
    pub rank: i64,
    /// Rank by truck-specific delay.
    pub truck_rank: i64,
    /// `TxDOT` district name, verbatim.
    pub district: String,
    /// Annual hours of delay per mile.
    pub delay_per_mile: f64,
    /// Peak to free-flow travel time ratio.
    pub congestion_index: f64,
    /// Annual economic cost of delay.
    pub cost_of_delay: f64,
    /// Annual truck delay hours.
    pub truck_delay: f64,
    /// Annual truck-attributable cost of delay.
    pub cost_of_truck_delay: f64,
    /// Data vintage.
    pub year: i64,
    /// Source segment id, when the feed provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_id: Option<i64>,
    /// Road path.
    pub geometry: RoadGeometry,
}

impl RoadwayRecord {
    /// Whether the truck share of the cost is within the total cost.
    ///
    /// The feed is expected to satisfy this, but it is not validated at
    /// mapping time.
    #[must_use]
    pub fn truck_cost_within_total(&self) -> bool {
        self.cost_of_truck_delay <= self.cost_of_delay
    }
}

/// The immutable record set for one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadwaySnapshot {
    /// Where the records came from (feed id or file path).
    pub source: String,
    /// Mapped records, in feed order.
    pub records: Vec<RoadwayRecord>,
    /// Number of features dropped by the mapper as malformed.
    pub rejected: usize,
    /// Recoverable load failure, if the feed could not be read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_error: Option<String>,
}

impl RoadwaySnapshot {
    /// Creates a snapshot from successfully mapped records.
    #[must_use]
    pub fn new(source: impl Into<String>, records: Vec<RoadwayRecord>, rejected: usize) -> Self {
        Self {
            source: source.into(),
            records,
            rejected,
            load_error: None,
        }
    }

    /// Creates an empty snapshot that remembers why loading failed.
    #[must_use]
    pub fn failed(source: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            records: Vec::new(),
            rejected: 0,
            load_error: Some(error.into()),
        }
    }

    /// Borrows the records.
    #[must_use]
    pub fn records(&self) -> &[RoadwayRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when there is nothing to aggregate.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A roadway feed, deserialized from an embedded TOML definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedDefinition {
    /// Unique feed identifier (e.g. `"txdot_top_100"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// `ArcGIS` query endpoint (up to `.../query`).
    pub url: String,
    /// `where` clause sent with the query.
    #[serde(default = "default_where_clause")]
    pub where_clause: String,
    /// Output field list.
    #[serde(default = "default_out_fields")]
    pub out_fields: String,
}

fn default_where_clause() -> String {
    "1=1".to_string()
}

fn default_out_fields() -> String {
    "*".to_string()
}

/// Client-side record filter used by the map view.
///
/// Both congestion bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadwayFilter {
    /// Exact district name, or `None` for all districts.
    pub district: Option<String>,
    /// Lowest congestion index to keep.
    pub min_congestion: f64,
    /// Highest congestion index to keep.
    pub max_congestion: f64,
}

impl Default for RoadwayFilter {
    fn default() -> Self {
        Self {
            district: None,
            min_congestion: 0.0,
            max_congestion: 3.0,
        }
    }
}

impl RoadwayFilter {
    /// Builds a filter from optional parts.
    ///
    /// An empty district or `all` (any case) selects every district; missing
    /// bounds take the [`Default`] values.
    #[must_use]
    pub fn new(
        district: Option<&str>,
        min_congestion: Option<f64>,
        max_congestion: Option<f64>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            district: district
                .filter(|d| !d.is_empty() && !d.eq_ignore_ascii_case("all"))
                .map(str::to_string),
            min_congestion: min_congestion.unwrap_or(defaults.min_congestion),
            max_congestion: max_congestion.unwrap_or(defaults.max_congestion),
        }
    }

    /// Returns `true` if `record` passes the filter.
    #[must_use]
    pub fn matches(&self, record: &RoadwayRecord) -> bool {
        if let Some(district) = &self.district
            && record.district != *district
        {
            return false;
        }
        record.congestion_index >= self.min_congestion
            && record.congestion_index <= self.max_congestion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(district: &str, tci: f64) -> RoadwayRecord {
        RoadwayRecord {
            id: 1,
            name: "IH 35".to_string(),
            rank: 1,
            truck_rank: 2,
            district: district.to_string(),
            delay_per_mile: 100.0,
            congestion_index: tci,
            cost_of_delay: 1_000.0,
            truck_delay: 10.0,
            cost_of_truck_delay: 200.0,
            year: 2023,
            segment_id: None,
            geometry: RoadGeometry::empty(),
        }
    }

    #[test]
    fn default_filter_is_inclusive_on_both_ends() {
        let filter = RoadwayFilter::default();
        assert!(filter.matches(&record("Austin", 0.0)));
        assert!(filter.matches(&record("Austin", 3.0)));
        assert!(!filter.matches(&record("Austin", 3.01)));
    }

    #[test]
    fn all_or_empty_district_selects_everything() {
        assert_eq!(RoadwayFilter::new(Some("all"), None, None).district, None);
        assert_eq!(RoadwayFilter::new(Some("ALL"), None, None).district, None);
        assert_eq!(RoadwayFilter::new(Some(""), None, None).district, None);
        let filter = RoadwayFilter::new(Some("Austin"), Some(1.0), None);
        assert_eq!(filter.district.as_deref(), Some("Austin"));
        assert!((filter.min_congestion - 1.0).abs() < f64::EPSILON);
        assert!((filter.max_congestion - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn district_filter_is_exact() {
        let filter = RoadwayFilter {
            district: Some("Houston".to_string()),
            ..RoadwayFilter::default()
        };
        assert!(filter.matches(&record("Houston", 1.5)));
        assert!(!filter.matches(&record("houston", 1.5)));
        assert!(!filter.matches(&record("Houston ", 1.5)));
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(record("Dallas", 1.2)).unwrap();
        assert_eq!(json["truckRank"], 2);
        assert_eq!(json["congestionIndex"], 1.2);
        assert_eq!(json["geometry"]["type"], "LineString");
        assert!(json.get("segmentId").is_none());
    }

    #[test]
    fn failed_snapshot_is_empty() {
        let snapshot = RoadwaySnapshot::failed("txdot_top_100", "HTTP 503");
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.load_error.as_deref(), Some("HTTP 503"));
    }

    #[test]
    fn truck_cost_check() {
        let mut r = record("Dallas", 1.0);
        assert!(r.truck_cost_within_total());
        r.cost_of_truck_delay = 2_000.0;
        assert!(!r.truck_cost_within_total());
    }
}
