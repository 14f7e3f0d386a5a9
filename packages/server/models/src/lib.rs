#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the congestion server.
//!
//! Query parameter structs keep metric and direction names as raw strings;
//! the handlers resolve them so that unknown names can be reported back as
//! `400 Bad Request` instead of a generic deserialization failure.

use serde::{Deserialize, Serialize};
use tx_congestion_analytics_models::MapView;
use tx_congestion_roadway_models::{BoundingBox, RoadwayFilter, RoadwayRecord, RoadwaySnapshot};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Provenance of the snapshot the server is answering from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSnapshot {
    /// Feed id or file path.
    pub source: String,
    /// Number of loaded roadways.
    pub record_count: usize,
    /// Features rejected as malformed.
    pub rejected: usize,
    /// Why loading failed, when it did.
    pub load_error: Option<String>,
}

impl From<&RoadwaySnapshot> for ApiSnapshot {
    fn from(snapshot: &RoadwaySnapshot) -> Self {
        Self {
            source: snapshot.source.clone(),
            record_count: snapshot.len(),
            rejected: snapshot.rejected,
            load_error: snapshot.load_error.clone(),
        }
    }
}

/// Query parameters for the roadways endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadwayQueryParams {
    /// Exact district name. `all` or absent means every district.
    pub district: Option<String>,
    /// Inclusive lower congestion bound.
    pub min_congestion: Option<f64>,
    /// Inclusive upper congestion bound.
    pub max_congestion: Option<f64>,
}

impl RoadwayQueryParams {
    /// Builds the record filter, filling gaps from [`RoadwayFilter::default`].
    #[must_use]
    pub fn to_filter(&self) -> RoadwayFilter {
        RoadwayFilter::new(
            self.district.as_deref(),
            self.min_congestion,
            self.max_congestion,
        )
    }
}

/// Filtered roadways with map framing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRoadways<'a> {
    /// Number of roadways that passed the filter.
    pub count: usize,
    /// Where to center the map.
    pub map_view: MapView,
    /// Envelope of the filtered geometries.
    pub bounding_box: Option<BoundingBox>,
    /// The filtered roadways.
    pub roadways: Vec<&'a RoadwayRecord>,
}

/// Query parameters for the districts endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictQueryParams {
    /// District metric to sort by.
    pub sort: Option<String>,
    /// `asc` or `desc`.
    pub direction: Option<String>,
}

/// A single optional `limit` parameter.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitQueryParams {
    /// Maximum number of rows.
    pub limit: Option<usize>,
}

/// Query parameters for the top-N endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopQueryParams {
    /// Roadway metric to rank by.
    pub metric: Option<String>,
    /// Number of rows.
    pub n: Option<usize>,
    /// `asc` or `desc`.
    pub direction: Option<String>,
    /// Display name truncation limit.
    pub name_limit: Option<usize>,
}

/// Query parameters for the rankings endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingQueryParams {
    /// Rows per ranking.
    pub n: Option<usize>,
    /// Display name truncation limit.
    pub name_limit: Option<usize>,
}

/// A metric accepted by the top-N endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMetric {
    /// Name to pass as `metric`.
    pub name: String,
    /// Human-readable label.
    pub label: String,
}

/// Query parameters for the commuter impact endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommuterQueryParams {
    /// Number of rows.
    pub n: Option<usize>,
    /// Display name truncation limit.
    pub name_limit: Option<usize>,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// What went wrong.
    pub error: String,
}

impl ApiError {
    /// Creates an error body.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
