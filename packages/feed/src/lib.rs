#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Roadway feed loading.
//!
//! Fetches the `TxDOT` Top 100 Congested Roadways `FeatureCollection` (or
//! reads a saved copy from disk), maps every feature into a
//! [`RoadwayRecord`](tx_congestion_roadway_models::RoadwayRecord), and wraps
//! the result in an immutable
//! [`RoadwaySnapshot`](tx_congestion_roadway_models::RoadwaySnapshot).
//!
//! Loading is fail-open: a transport, status, or parse failure yields an
//! empty snapshot together with the [`FeedError`] so callers can log it and
//! keep rendering their "no data" paths.

pub mod fetch;
pub mod mapper;
pub mod progress;
pub mod registry;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tx_congestion_roadway_models::{FeedDefinition, RoadwaySnapshot};

use crate::progress::ProgressCallback;

/// Environment variable that overrides the feed query URL.
pub const FEED_URL_ENV: &str = "TX_CONGESTION_FEED_URL";

/// Environment variable pointing at a saved `GeoJSON` file to load instead
/// of the live feed.
pub const FEED_FILE_ENV: &str = "TX_CONGESTION_FEED_FILE";

/// Errors that can occur while loading the feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Feed request failed with status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// Response body is not JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Response body is JSON but not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// `ArcGIS` reported an error in the response body.
    #[error("ArcGIS API error: {message}")]
    Api {
        /// Message reported by the service.
        message: String,
    },

    /// The document parsed, but is not a `FeatureCollection`.
    #[error("Expected a FeatureCollection, found {kind}")]
    NotFeatureCollection {
        /// What was found instead.
        kind: &'static str,
    },

    /// Reading a local feed file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unknown feed id.
    #[error("Unknown feed: {id}")]
    UnknownFeed {
        /// The requested id.
        id: String,
    },
}

/// Why a single feature was rejected by the mapper.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MappingError {
    /// A required property is absent or `null`.
    #[error("missing property {property}")]
    MissingProperty {
        /// Raw property name.
        property: &'static str,
    },

    /// A property has the wrong JSON type or a non-finite value.
    #[error("property {property} has an invalid value: {value}")]
    InvalidProperty {
        /// Raw property name.
        property: &'static str,
        /// The offending value, rendered as JSON.
        value: String,
    },

    /// A measure that must be non-negative is negative.
    #[error("property {property} is negative: {value}")]
    NegativeMeasure {
        /// Raw property name.
        property: &'static str,
        /// The offending value.
        value: f64,
    },

    /// The geometry is not a line.
    #[error("unsupported geometry type {kind}")]
    UnsupportedGeometry {
        /// `GeoJSON` geometry type name.
        kind: &'static str,
    },

    /// Neither the feature nor its properties carry a usable id.
    #[error("feature has no id")]
    MissingId,
}

/// Where to read roadway data from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    /// Query a live feed.
    Url(FeedDefinition),
    /// Read a saved `FeatureCollection` from disk.
    File(PathBuf),
}

impl FeedSource {
    /// Label stored as the snapshot's source.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Url(feed) => feed.id.clone(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

/// Resolves the feed source from the environment.
///
/// `TX_CONGESTION_FEED_FILE` wins over everything; otherwise the default
/// registry feed is used, with its URL replaced by `TX_CONGESTION_FEED_URL`
/// when set.
#[must_use]
pub fn source_from_env() -> FeedSource {
    if let Ok(path) = std::env::var(FEED_FILE_ENV)
        && !path.trim().is_empty()
    {
        return FeedSource::File(PathBuf::from(path));
    }

    let mut feed = registry::default_feed();
    if let Ok(url) = std::env::var(FEED_URL_ENV)
        && !url.trim().is_empty()
    {
        log::debug!("Overriding {} URL from {FEED_URL_ENV}", feed.id);
        feed.url = url;
    }
    FeedSource::Url(feed)
}

/// Builds the HTTP client used for feed requests.
///
/// # Errors
///
/// Returns [`FeedError::Http`] if the TLS backend cannot be initialised.
pub fn build_client() -> Result<reqwest::Client, FeedError> {
    Ok(reqwest::Client::builder()
        .user_agent(concat!("tx-congestion/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// Result of a fail-open load.
#[derive(Debug)]
pub struct FeedLoad {
    /// The snapshot; empty when `error` is set.
    pub snapshot: RoadwaySnapshot,
    /// Recoverable load failure.
    pub error: Option<FeedError>,
}

impl FeedLoad {
    fn failed(source: String, error: FeedError) -> Self {
        log::error!("Failed to load roadway data from {source}: {error}");
        Self {
            snapshot: RoadwaySnapshot::failed(source, error.to_string()),
            error: Some(error),
        }
    }

    fn mapped(source: String, features: &[geojson::Feature], progress: &dyn ProgressCallback) -> Self {
        progress.set_total(features.len() as u64);
        let mapped = mapper::map_features_with_progress(features, progress);
        progress.finish(format!(
            "Loaded {} roadways ({} rejected)",
            mapped.records.len(),
            mapped.rejected
        ));
        log::info!(
            "Loaded {} roadways from {source} ({} rejected)",
            mapped.records.len(),
            mapped.rejected
        );
        Self {
            snapshot: RoadwaySnapshot::new(source, mapped.records, mapped.rejected),
            error: None,
        }
    }
}

/// Loads roadway data from `source`, never failing.
pub async fn load(
    source: &FeedSource,
    client: &reqwest::Client,
    progress: &dyn ProgressCallback,
) -> FeedLoad {
    match source {
        FeedSource::Url(feed) => load_feed(client, feed, progress).await,
        FeedSource::File(path) => load_file(path, progress),
    }
}

/// Fetches and maps a live feed. On failure the snapshot is empty and the
/// error is returned alongside it.
pub async fn load_feed(
    client: &reqwest::Client,
    feed: &FeedDefinition,
    progress: &dyn ProgressCallback,
) -> FeedLoad {
    progress.set_message(format!("Fetching {}", feed.name));
    match fetch::fetch_features(client, feed).await {
        Ok(features) => FeedLoad::mapped(feed.id.clone(), &features, progress),
        Err(e) => {
            progress.finish_and_clear();
            FeedLoad::failed(feed.id.clone(), e)
        }
    }
}

/// Reads and maps a saved `FeatureCollection`. On failure the snapshot is
/// empty and the error is returned alongside it.
pub fn load_file(path: &Path, progress: &dyn ProgressCallback) -> FeedLoad {
    let source = path.display().to_string();
    progress.set_message(format!("Reading {source}"));
    let parsed = std::fs::read_to_string(path)
        .map_err(FeedError::from)
        .and_then(|body| fetch::parse_feature_collection(&body));
    match parsed {
        Ok(features) => FeedLoad::mapped(source, &features, progress),
        Err(e) => {
            progress.finish_and_clear();
            FeedLoad::failed(source, e)
        }
    }
}
