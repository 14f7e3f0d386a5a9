#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Classification tiers and aggregate view types.
//!
//! Everything here is plain data: the tiers and road types the classifiers
//! return, the metrics callers can rank or normalize by, and the summary
//! rows the aggregators build. All types serialize with camelCase field
//! names so the JSON matches what the congestion dashboard consumes.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use tx_congestion_roadway_models::RoadwayRecord;

/// Congestion severity tier, keyed by congestion index.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum SeverityTier {
    /// `[0, 1)`
    Low,
    /// `[1, 1.5)`
    Medium,
    /// `[1.5, 2)`
    High,
    /// `[2, 2.5)`
    Severe,
    /// `[2.5, ∞)`
    Extreme,
}

impl SeverityTier {
    /// All tiers in ascending order.
    pub const ALL: [Self; 5] = [
        Self::Low,
        Self::Medium,
        Self::High,
        Self::Severe,
        Self::Extreme,
    ];

    /// Lower (inclusive) and upper (exclusive) congestion index bounds.
    /// `None` means unbounded.
    #[must_use]
    pub const fn range(self) -> (f64, Option<f64>) {
        match self {
            Self::Low => (0.0, Some(1.0)),
            Self::Medium => (1.0, Some(1.5)),
            Self::High => (1.5, Some(2.0)),
            Self::Severe => (2.0, Some(2.5)),
            Self::Extreme => (2.5, None),
        }
    }

    /// Map color for the tier.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Low => "#4ade80",
            Self::Medium => "#facc15",
            Self::High => "#f87171",
            Self::Severe => "#ef4444",
            Self::Extreme => "#b91c1c",
        }
    }
}

/// Road type derived from the roadway name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum RoadType {
    /// `IH`, `I-` and friends.
    Interstate,
    /// `SH`
    #[serde(rename = "State Highway")]
    #[strum(serialize = "State Highway")]
    StateHighway,
    /// `US`
    #[serde(rename = "US Highway")]
    #[strum(serialize = "US Highway")]
    UsHighway,
    /// `FM`
    #[serde(rename = "Farm to Market")]
    #[strum(serialize = "Farm to Market")]
    FarmToMarket,
    /// `LP` / Loop
    Loop,
    /// Spur
    Spur,
    /// Boulevard
    Boulevard,
    /// Parkway
    Parkway,
    /// Drive
    Drive,
    /// Road
    Road,
    /// Avenue
    Avenue,
    /// Street
    Street,
    /// No rule matched.
    Other,
}

/// Sort order for rankings.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

/// A numeric roadway field that views can rank by.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum RankMetric {
    /// Overall congestion rank.
    Rank,
    /// Truck delay rank.
    TruckRank,
    /// Annual delay hours per mile.
    DelayPerMile,
    /// Congestion index.
    CongestionIndex,
    /// Annual cost of delay.
    CostOfDelay,
    /// Annual truck delay hours.
    TruckDelay,
    /// Annual truck cost of delay.
    CostOfTruckDelay,
    /// Data vintage.
    Year,
}

impl RankMetric {
    /// All metrics.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Rank,
            Self::TruckRank,
            Self::DelayPerMile,
            Self::CongestionIndex,
            Self::CostOfDelay,
            Self::TruckDelay,
            Self::CostOfTruckDelay,
            Self::Year,
        ]
    }

    /// Reads this metric from a record.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn value(self, record: &RoadwayRecord) -> f64 {
        match self {
            Self::Rank => record.rank as f64,
            Self::TruckRank => record.truck_rank as f64,
            Self::DelayPerMile => record.delay_per_mile,
            Self::CongestionIndex => record.congestion_index,
            Self::CostOfDelay => record.cost_of_delay,
            Self::TruckDelay => record.truck_delay,
            Self::CostOfTruckDelay => record.cost_of_truck_delay,
            Self::Year => record.year as f64,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Rank => "Rank",
            Self::TruckRank => "Truck Rank",
            Self::DelayPerMile => "Delay per Mile",
            Self::CongestionIndex => "Congestion Index",
            Self::CostOfDelay => "Cost of Delay",
            Self::TruckDelay => "Truck Delay",
            Self::CostOfTruckDelay => "Truck Cost of Delay",
            Self::Year => "Year",
        }
    }
}

/// The fixed rankings shown on the rankings and overview views.
///
/// A preset sorts by one field and may display another: the overall ranking
/// sorts by `rank` but charts delay per mile.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum RankingPreset {
    /// Best (lowest) overall rank first, showing delay per mile.
    Overall,
    /// Best truck rank first, showing truck delay.
    Truck,
    /// Highest cost of delay first.
    Cost,
    /// Highest congestion index first.
    MostCongested,
}

impl RankingPreset {
    /// Field the records are sorted by.
    #[must_use]
    pub const fn sort_metric(self) -> RankMetric {
        match self {
            Self::Overall => RankMetric::Rank,
            Self::Truck => RankMetric::TruckRank,
            Self::Cost => RankMetric::CostOfDelay,
            Self::MostCongested => RankMetric::CongestionIndex,
        }
    }

    /// Sort direction.
    #[must_use]
    pub const fn direction(self) -> SortDirection {
        match self {
            Self::Overall | Self::Truck => SortDirection::Asc,
            Self::Cost | Self::MostCongested => SortDirection::Desc,
        }
    }

    /// Field reported as each row's `value`.
    #[must_use]
    pub const fn value_metric(self) -> RankMetric {
        match self {
            Self::Overall => RankMetric::DelayPerMile,
            Self::Truck => RankMetric::TruckDelay,
            Self::Cost => RankMetric::CostOfDelay,
            Self::MostCongested => RankMetric::CongestionIndex,
        }
    }
}

/// Per-district rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictSummary {
    /// District name, verbatim.
    pub name: String,
    /// Number of roadways in the district.
    pub road_count: u64,
    /// Sum of delay per mile.
    pub total_delay_per_mile: f64,
    /// Mean delay per mile.
    pub avg_delay_per_mile: f64,
    /// Sum of cost of delay.
    pub total_cost_of_delay: f64,
    /// Mean congestion index.
    pub avg_congestion_index: f64,
}

/// A district-level field used for sorting and normalized comparison.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum DistrictMetric {
    /// Number of roadways.
    RoadCount,
    /// Mean congestion index.
    AvgCongestionIndex,
    /// Total cost of delay.
    TotalCostOfDelay,
    /// Mean delay per mile.
    AvgDelayPerMile,
}

impl DistrictMetric {
    /// Metrics shown side by side in the regional comparison.
    pub const COMPARISON: [Self; 3] = [
        Self::RoadCount,
        Self::AvgCongestionIndex,
        Self::TotalCostOfDelay,
    ];

    /// Reads this metric from a summary.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn value(self, summary: &DistrictSummary) -> f64 {
        match self {
            Self::RoadCount => summary.road_count as f64,
            Self::AvgCongestionIndex => summary.avg_congestion_index,
            Self::TotalCostOfDelay => summary.total_cost_of_delay,
            Self::AvgDelayPerMile => summary.avg_delay_per_mile,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::RoadCount => "Road Count",
            Self::AvgCongestionIndex => "Avg Congestion",
            Self::TotalCostOfDelay => "Cost of Delay",
            Self::AvgDelayPerMile => "Avg Delay per Mile",
        }
    }
}

/// Aggregates for one severity tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityBucket {
    /// The tier.
    pub tier: SeverityTier,
    /// Inclusive lower bound.
    pub range_low: f64,
    /// Exclusive upper bound, `None` when unbounded.
    pub range_high: Option<f64>,
    /// Map color.
    pub color: String,
    /// Number of member roadways.
    pub road_count: u64,
    /// Sum of estimated commuters over members.
    pub total_commuters: i64,
    /// Sum of cost of delay over members.
    pub total_cost: f64,
    /// Mean delay per mile times workdays per year, 0 when empty.
    pub avg_time_wasted: f64,
    /// Ids of the member roadways, in feed order.
    pub road_ids: Vec<i64>,
}

/// Count of roadways in one severity tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CongestionCategory {
    /// The tier.
    pub tier: SeverityTier,
    /// Map color.
    pub color: String,
    /// Number of roadways.
    pub count: u64,
}

/// Aggregates for one road type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadTypeBucket {
    /// The road type.
    pub road_type: RoadType,
    /// Number of roadways.
    pub count: u64,
    /// Mean congestion index.
    pub avg_congestion: f64,
    /// Mean delay per mile.
    pub avg_delay: f64,
    /// Sum of cost of delay.
    pub total_cost: f64,
    /// Share of the statewide cost of delay, in percent.
    pub cost_percentage: f64,
    /// Most congested members, highest congestion index first.
    pub top_roads: Vec<ProjectedRecord>,
}

/// A roadway projected for a ranked view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedRecord {
    /// Roadway id.
    pub id: i64,
    /// Display name, truncated with `...` past the caller's limit.
    pub name: String,
    /// Untruncated name.
    pub full_name: String,
    /// Value of the ranked (or preset display) metric.
    pub value: f64,
    /// District name.
    pub district: String,
    /// Overall rank.
    pub rank: i64,
    /// Truck rank.
    pub truck_rank: i64,
    /// Congestion index.
    pub congestion_index: f64,
    /// Delay per mile.
    pub delay_per_mile: f64,
    /// Cost of delay.
    pub cost_of_delay: f64,
    /// Truck delay.
    pub truck_delay: f64,
    /// Truck cost of delay.
    pub cost_of_truck_delay: f64,
    /// Map color for the congestion index.
    pub color: String,
}

/// Statewide split of the cost of delay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    /// Sum of cost of delay.
    pub total_cost: f64,
    /// Sum of truck cost of delay.
    pub truck_cost: f64,
    /// `total_cost - truck_cost`.
    pub commuter_cost: f64,
    /// Total cost over the estimated state population.
    pub cost_per_capita: f64,
    /// Total cost over the estimated commuting population.
    pub cost_per_commuter: f64,
    /// Commuter cost over the estimated commuting population.
    pub commuter_cost_per_commuter: f64,
    /// Truck cost over the estimated commercial truck fleet.
    pub cost_per_truck: f64,
}

/// Cost split for one district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictCost {
    /// District name.
    pub name: String,
    /// Sum of cost of delay.
    pub total_cost: f64,
    /// Sum of truck cost of delay.
    pub truck_cost: f64,
    /// Sum of `cost - truck cost` per roadway.
    pub commuter_cost: f64,
    /// Number of roadways.
    pub road_count: u64,
    /// Ids of the district's roadways, in feed order.
    pub road_ids: Vec<i64>,
}

/// Estimated commuter impact of one roadway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommuterImpact {
    /// Roadway id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Untruncated name.
    pub full_name: String,
    /// District name.
    pub district: String,
    /// Congestion index.
    pub congestion_index: f64,
    /// Estimated affected commuters.
    pub estimated_commuters: i64,
    /// Cost of delay per estimated commuter, 0 when there are none.
    pub cost_per_commuter: f64,
    /// Delay per mile times workdays per year.
    pub time_wasted: f64,
}

/// One metric of a district, scaled against the maximum in its group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedMetricValue {
    /// The metric.
    pub metric: DistrictMetric,
    /// `100 * actual / max`, 0 when the max is 0.
    pub score: f64,
    /// Unscaled value.
    pub actual: f64,
}

/// A district with every requested metric normalized to 0-100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedDistrict {
    /// District name.
    pub name: String,
    /// One entry per requested metric, in request order.
    pub values: Vec<NormalizedMetricValue>,
}

/// Top-N rankings shown on the rankings view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rankings {
    /// By overall rank.
    pub overall: Vec<ProjectedRecord>,
    /// By truck rank.
    pub truck: Vec<ProjectedRecord>,
    /// By cost of delay.
    pub cost: Vec<ProjectedRecord>,
    /// By congestion index.
    pub most_congested: Vec<ProjectedRecord>,
}

/// Where the map view should be centered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    /// `[latitude, longitude]`.
    pub center: [f64; 2],
    /// Tile zoom level.
    pub zoom: u8,
}

/// Data-quality findings that do not block aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuality {
    /// Ids of roadways whose truck cost exceeds their total cost.
    pub truck_cost_violations: Vec<i64>,
}

/// Sizes and display limits for a full report.
///
/// Defaults match the dashboard views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReportConfig {
    /// Rows per ranking.
    pub ranking_size: usize,
    /// Name truncation limit for rankings.
    pub ranking_name_limit: usize,
    /// Rows in the commuter impact view.
    pub commuter_size: usize,
    /// Name truncation limit for the commuter impact view.
    pub commuter_name_limit: usize,
    /// Road types kept, by count.
    pub road_type_limit: usize,
    /// Districts kept in the cost view.
    pub district_cost_limit: usize,
    /// Districts kept in the normalized comparison.
    pub comparison_limit: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            ranking_size: 10,
            ranking_name_limit: 25,
            commuter_size: 15,
            commuter_name_limit: 20,
            road_type_limit: 8,
            district_cost_limit: 8,
            comparison_limit: 6,
        }
    }
}

/// Every view computed from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CongestionReport {
    /// Snapshot source label.
    pub source: String,
    /// Number of records aggregated.
    pub record_count: usize,
    /// Number of features rejected at load.
    pub rejected: usize,
    /// District summaries, most roadways first.
    pub districts: Vec<DistrictSummary>,
    /// Normalized comparison of the largest districts.
    pub district_comparison: Vec<NormalizedDistrict>,
    /// Costliest districts.
    pub district_costs: Vec<DistrictCost>,
    /// Severity buckets in tier order.
    pub severity: Vec<SeverityBucket>,
    /// Per-tier counts.
    pub categories: Vec<CongestionCategory>,
    /// Road-type buckets, most roadways first.
    pub road_types: Vec<RoadTypeBucket>,
    /// Preset rankings.
    pub rankings: Rankings,
    /// Most congested roadways with commuter estimates.
    pub commuter_impact: Vec<CommuterImpact>,
    /// Statewide cost split.
    pub costs: CostBreakdown,
    /// Data-quality findings.
    pub quality: DataQuality,
}
