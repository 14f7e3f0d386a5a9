//! Severity and road-type classifiers.
//!
//! Both classifiers are ordered rule tables evaluated first-match. Order is
//! significant: the road-type rules match unanchored substrings, so a later
//! rule only sees names that every earlier rule rejected.

use std::sync::LazyLock;

use regex::Regex;
use tx_congestion_analytics_models::{RoadType, SeverityTier};

/// Severity tiers as `(tier, inclusive low, exclusive high)`.
const SEVERITY_RULES: [(SeverityTier, f64, f64); 5] = [
    (SeverityTier::Low, 0.0, 1.0),
    (SeverityTier::Medium, 1.0, 1.5),
    (SeverityTier::High, 1.5, 2.0),
    (SeverityTier::Severe, 2.0, 2.5),
    (SeverityTier::Extreme, 2.5, f64::INFINITY),
];

/// Assigns a congestion index to its severity tier.
///
/// Boundary values belong to the higher tier. Negative and `NaN` values
/// belong to no tier.
#[must_use]
pub fn classify_severity(congestion_index: f64) -> Option<SeverityTier> {
    SEVERITY_RULES
        .iter()
        .find(|(_, low, high)| congestion_index >= *low && congestion_index < *high)
        .map(|(tier, _, _)| *tier)
}

/// Map color for a congestion index.
///
/// Unlike [`classify_severity`] this never fails: anything below `1.0`
/// (including negative values) is drawn in the low color and anything
/// else that is not below `2.5` in the extreme color.
#[must_use]
pub fn congestion_color(congestion_index: f64) -> &'static str {
    let tier = if congestion_index < 1.0 {
        SeverityTier::Low
    } else if congestion_index < 1.5 {
        SeverityTier::Medium
    } else if congestion_index < 2.0 {
        SeverityTier::High
    } else if congestion_index < 2.5 {
        SeverityTier::Severe
    } else {
        SeverityTier::Extreme
    };
    tier.color()
}

static INTERSTATE_SHORTHAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^i\s\d").unwrap_or_else(|_| unreachable!()));

/// Road-type rules as `(type, substrings)`. Interstate has extra prefix
/// checks handled in [`classify_road_type`].
const ROAD_TYPE_RULES: &[(RoadType, &[&str])] = &[
    (RoadType::Interstate, &["ih", "interstate"]),
    (RoadType::StateHighway, &["sh", "state highway"]),
    (RoadType::UsHighway, &["us", "u.s."]),
    (RoadType::FarmToMarket, &["fm", "farm to market"]),
    (RoadType::Loop, &["lp", "loop"]),
    (RoadType::Spur, &["spur"]),
    (RoadType::Boulevard, &["blvd", "boulevard"]),
    (RoadType::Parkway, &["pkwy", "parkway"]),
    (RoadType::Drive, &["dr", "drive"]),
    (RoadType::Road, &["rd", "road"]),
    (RoadType::Avenue, &["ave", "avenue"]),
    (RoadType::Street, &["st", "street"]),
];

/// Classifies a roadway by keywords in its name.
///
/// Matching is case-insensitive and unanchored, so short codes hit inside
/// longer words: `"George Bush Tpke"` contains `"sh"` and is a State Highway.
#[must_use]
pub fn classify_road_type(name: &str) -> RoadType {
    let lower = name.to_lowercase();

    if lower.starts_with("i-") || INTERSTATE_SHORTHAND.is_match(&lower) {
        return RoadType::Interstate;
    }

    ROAD_TYPE_RULES
        .iter()
        .find(|(_, keywords)| contains_any(&lower, keywords))
        .map_or(RoadType::Other, |(road_type, _)| *road_type)
}

/// Returns `true` if `haystack` contains any of the `needles`.
fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_boundaries_go_to_the_higher_tier() {
        assert_eq!(classify_severity(0.0), Some(SeverityTier::Low));
        assert_eq!(classify_severity(0.99), Some(SeverityTier::Low));
        assert_eq!(classify_severity(1.0), Some(SeverityTier::Medium));
        assert_eq!(classify_severity(1.5), Some(SeverityTier::High));
        assert_eq!(classify_severity(2.0), Some(SeverityTier::Severe));
        assert_eq!(classify_severity(2.5), Some(SeverityTier::Extreme));
        assert_eq!(classify_severity(40.0), Some(SeverityTier::Extreme));
    }

    #[test]
    fn out_of_range_values_have_no_tier() {
        assert_eq!(classify_severity(-0.1), None);
        assert_eq!(classify_severity(f64::NAN), None);
    }

    #[test]
    fn every_valid_value_lands_in_exactly_one_tier() {
        for step in 0..400 {
            let value = f64::from(step) * 0.01;
            let hits = SEVERITY_RULES
                .iter()
                .filter(|(_, low, high)| value >= *low && value < *high)
                .count();
            assert_eq!(hits, 1, "{value} matched {hits} tiers");
        }
    }

    #[test]
    fn rule_table_matches_tier_ranges() {
        for (tier, low, high) in SEVERITY_RULES {
            let (range_low, range_high) = tier.range();
            assert_eq!(range_low, low);
            assert_eq!(range_high.unwrap_or(f64::INFINITY), high);
        }
    }

    #[test]
    fn colors_follow_tiers() {
        assert_eq!(congestion_color(0.5), "#4ade80");
        assert_eq!(congestion_color(1.2), "#facc15");
        assert_eq!(congestion_color(1.7), "#f87171");
        assert_eq!(congestion_color(2.2), "#ef4444");
        assert_eq!(congestion_color(2.5), "#b91c1c");
        assert_eq!(congestion_color(-1.0), "#4ade80");
    }

    #[test]
    fn interstate_spellings() {
        assert_eq!(classify_road_type("IH-35"), RoadType::Interstate);
        assert_eq!(classify_road_type("IH 610"), RoadType::Interstate);
        assert_eq!(classify_road_type("Interstate 10"), RoadType::Interstate);
        assert_eq!(classify_road_type("I-45"), RoadType::Interstate);
        assert_eq!(classify_road_type("I 20"), RoadType::Interstate);
    }

    #[test]
    fn common_prefixes() {
        assert_eq!(classify_road_type("SH 130"), RoadType::StateHighway);
        assert_eq!(classify_road_type("US 183"), RoadType::UsHighway);
        assert_eq!(classify_road_type("FM 1960"), RoadType::FarmToMarket);
        assert_eq!(classify_road_type("Loop 1"), RoadType::Loop);
        assert_eq!(classify_road_type("Spur 366"), RoadType::Spur);
        assert_eq!(classify_road_type("Lamar Blvd"), RoadType::Boulevard);
        assert_eq!(classify_road_type("Mopac Parkway"), RoadType::Parkway);
        assert_eq!(classify_road_type("Memorial Drive"), RoadType::Drive);
        assert_eq!(classify_road_type("Westheimer Rd"), RoadType::Road);
        assert_eq!(classify_road_type("Lake Avenue"), RoadType::Avenue);
        assert_eq!(classify_road_type("Main"), RoadType::Other);
    }

    #[test]
    fn substring_matches_are_unanchored() {
        assert_eq!(classify_road_type("George Bush Tpke"), RoadType::StateHighway);
        assert_eq!(classify_road_type("Houston Ave"), RoadType::UsHighway);
        assert_eq!(classify_road_type("Sam Houston Pkwy"), RoadType::UsHighway);
        assert_eq!(classify_road_type("Hardy Toll"), RoadType::Road);
        assert_eq!(classify_road_type("First"), RoadType::Street);
    }

    #[test]
    fn classification_ignores_case() {
        assert_eq!(classify_road_type("ih 35"), classify_road_type("IH 35"));
        assert_eq!(classify_road_type("fArM tO mArKeT 1"), RoadType::FarmToMarket);
    }
}
