//! Compile-time registry of roadway feeds.
//!
//! Each entry is a `(name, toml_content)` pair embedded via `include_str!`.

use tx_congestion_roadway_models::FeedDefinition;

use crate::FeedError;

/// Id of the feed used when none is specified.
pub const DEFAULT_FEED_ID: &str = "txdot_top_100";

/// Embedded TOML feed definitions.
const FEED_TOMLS: &[(&str, &str)] = &[(
    "txdot_top_100",
    include_str!("../feeds/txdot_top_100.toml"),
)];

/// Returns all registered feeds.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. These are compile-time
/// constants, so a parse failure is a development error caught by the
/// tests below.
#[must_use]
pub fn all_feeds() -> Vec<FeedDefinition> {
    FEED_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse feed definition '{name}': {e}"))
        })
        .collect()
}

/// Looks up a feed by id.
///
/// # Errors
///
/// Returns [`FeedError::UnknownFeed`] if no feed has that id.
pub fn feed(id: &str) -> Result<FeedDefinition, FeedError> {
    all_feeds()
        .into_iter()
        .find(|f| f.id == id)
        .ok_or_else(|| FeedError::UnknownFeed { id: id.to_string() })
}

/// The `TxDOT` Top 100 Congested Roadways feed.
///
/// # Panics
///
/// Panics if the default feed is missing from the registry, which the tests
/// below rule out.
#[must_use]
pub fn default_feed() -> FeedDefinition {
    feed(DEFAULT_FEED_ID).unwrap_or_else(|e| panic!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn loads_all_feeds() {
        assert_eq!(all_feeds().len(), FEED_TOMLS.len());
    }

    #[test]
    fn feed_ids_are_unique() {
        let mut seen = BTreeSet::new();
        for feed in all_feeds() {
            assert!(seen.insert(feed.id.clone()), "Duplicate feed ID: {}", feed.id);
        }
    }

    #[test]
    fn default_feed_is_arcgis_query() {
        let feed = default_feed();
        assert_eq!(feed.id, DEFAULT_FEED_ID);
        assert!(feed.url.starts_with("https://"));
        assert!(feed.url.ends_with("/FeatureServer/0/query"));
        assert_eq!(feed.where_clause, "1=1");
        assert_eq!(feed.out_fields, "*");
    }

    #[test]
    fn unknown_feed_is_an_error() {
        assert!(matches!(
            feed("nope"),
            Err(FeedError::UnknownFeed { id }) if id == "nope"
        ));
    }
}
