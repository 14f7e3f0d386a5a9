//! `ArcGIS` `FeatureServer` query fetcher.
//!
//! Issues a single `f=geojson` query against the feed endpoint. The Top 100
//! layer fits in one page, so there is no `resultOffset` pagination and no
//! retry: a failure is reported once and the caller falls back to an empty
//! snapshot.

use geojson::{Feature, GeoJson};
use tx_congestion_roadway_models::FeedDefinition;

use crate::FeedError;

/// Fetches all features from the feed's query endpoint.
///
/// # Errors
///
/// Returns [`FeedError`] if the request fails, the status is not a success,
/// or the body is not a `GeoJSON` `FeatureCollection`.
pub async fn fetch_features(
    client: &reqwest::Client,
    feed: &FeedDefinition,
) -> Result<Vec<Feature>, FeedError> {
    log::debug!("GET {} (where={})", feed.url, feed.where_clause);

    let resp = client
        .get(&feed.url)
        .query(&[
            ("outFields", feed.out_fields.as_str()),
            ("where", feed.where_clause.as_str()),
            ("f", "geojson"),
        ])
        .send()
        .await?;

    if !resp.status().is_success() {
        return Err(FeedError::Status {
            status: resp.status().as_u16(),
        });
    }
    let body = resp.text().await?;

    parse_feature_collection(&body)
}

/// Parses a response body into its feature list.
///
/// # Errors
///
/// Returns [`FeedError`] if the body is not JSON, carries an `ArcGIS`
/// `error` object, or is not a `FeatureCollection`.
pub fn parse_feature_collection(body: &str) -> Result<Vec<Feature>, FeedError> {
    let json: serde_json::Value = serde_json::from_str(body)?;

    // ArcGIS answers 200 with an error object for bad queries
    if let Some(error) = json.get("error") {
        return Err(FeedError::Api {
            message: error
                .get("message")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
        });
    }

    match GeoJson::from_json_value(json)? {
        GeoJson::FeatureCollection(collection) => Ok(collection.features),
        GeoJson::Feature(_) => Err(FeedError::NotFeatureCollection { kind: "Feature" }),
        GeoJson::Geometry(_) => Err(FeedError::NotFeatureCollection { kind: "Geometry" }),
    }
}
