//! District, severity, road-type and cost aggregators.
//!
//! Groupings keep the order in which each key is first seen in the input.
//! Views that need a different order sort the result themselves.

use std::{
    cmp::Ordering,
    collections::{BTreeSet, HashMap},
    hash::Hash,
};

use tx_congestion_analytics_models::{
    CongestionCategory, CostBreakdown, DistrictCost, DistrictMetric, DistrictSummary,
    RoadTypeBucket, SeverityBucket, SeverityTier, SortDirection,
};
use tx_congestion_roadway_models::RoadwayRecord;

use crate::{
    classify::{classify_road_type, classify_severity},
    estimate::{
        COMMUTER_SHARE, ESTIMATED_COMMERCIAL_TRUCKS, ESTIMATED_POPULATION, WORKDAYS_PER_YEAR,
        estimate_commuters,
    },
    rank::{project, top_n_by},
};

/// Members listed per road-type bucket.
pub const ROAD_TYPE_TOP_ROADS: usize = 5;

/// Groups records by `key`, in first-seen key order.
fn group_by<K, F>(records: &[RoadwayRecord], key: F) -> Vec<(K, Vec<&RoadwayRecord>)>
where
    K: Eq + Hash + Clone,
    F: Fn(&RoadwayRecord) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&RoadwayRecord>)> = Vec::new();

    for record in records {
        let k = key(record);
        let slot = if let Some(&slot) = index.get(&k) {
            slot
        } else {
            index.insert(k.clone(), groups.len());
            groups.push((k, Vec::new()));
            groups.len() - 1
        };
        groups[slot].1.push(record);
    }

    groups
}

/// Arithmetic mean, 0 for an empty group.
#[allow(clippy::cast_precision_loss)]
fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { sum / count as f64 }
}

fn sum_by(records: &[&RoadwayRecord], field: impl Fn(&RoadwayRecord) -> f64) -> f64 {
    records.iter().map(|r| field(r)).sum()
}

fn ids(records: &[&RoadwayRecord]) -> Vec<i64> {
    records.iter().map(|r| r.id).collect()
}

/// Per-district totals and means, in first-seen district order.
///
/// Districts are grouped on the exact district string.
#[must_use]
pub fn aggregate_by_district(records: &[RoadwayRecord]) -> Vec<DistrictSummary> {
    group_by(records, |r| r.district.clone())
        .into_iter()
        .map(|(name, members)| {
            let total_delay_per_mile = sum_by(&members, |r| r.delay_per_mile);
            let total_congestion = sum_by(&members, |r| r.congestion_index);
            DistrictSummary {
                name,
                road_count: members.len() as u64,
                total_delay_per_mile,
                avg_delay_per_mile: mean(total_delay_per_mile, members.len()),
                total_cost_of_delay: sum_by(&members, |r| r.cost_of_delay),
                avg_congestion_index: mean(total_congestion, members.len()),
            }
        })
        .collect()
}

/// Sorts district summaries by `metric`. Ties keep their current order.
pub fn sort_districts(
    summaries: &mut [DistrictSummary],
    metric: DistrictMetric,
    direction: SortDirection,
) {
    summaries.sort_by(|a, b| {
        let ordering = metric
            .value(a)
            .partial_cmp(&metric.value(b))
            .unwrap_or(Ordering::Equal);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// Sorted, de-duplicated district names.
#[must_use]
pub fn district_names(records: &[RoadwayRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.district.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// One bucket per severity tier, in tier order. Empty tiers are zeroed.
///
/// Records whose congestion index has no tier are left out of every
/// bucket.
#[must_use]
pub fn aggregate_by_severity(records: &[RoadwayRecord]) -> [SeverityBucket; 5] {
    SeverityTier::ALL.map(|tier| {
        let members: Vec<&RoadwayRecord> = records
            .iter()
            .filter(|r| classify_severity(r.congestion_index) == Some(tier))
            .collect();
        let (range_low, range_high) = tier.range();

        SeverityBucket {
            tier,
            range_low,
            range_high,
            color: tier.color().to_string(),
            road_count: members.len() as u64,
            total_commuters: members
                .iter()
                .map(|r| estimate_commuters(r.congestion_index, Some(r.id)))
                .sum(),
            total_cost: sum_by(&members, |r| r.cost_of_delay),
            avg_time_wasted: mean(sum_by(&members, |r| r.delay_per_mile), members.len())
                * WORKDAYS_PER_YEAR,
            road_ids: ids(&members),
        }
    })
}

/// Roadway count per severity tier, in tier order.
#[must_use]
pub fn count_by_severity(records: &[RoadwayRecord]) -> Vec<CongestionCategory> {
    categories(&aggregate_by_severity(records))
}

/// Per-tier counts taken from already-built severity buckets.
#[must_use]
pub fn categories(buckets: &[SeverityBucket]) -> Vec<CongestionCategory> {
    buckets
        .iter()
        .map(|bucket| CongestionCategory {
            tier: bucket.tier,
            color: bucket.color.clone(),
            count: bucket.road_count,
        })
        .collect()
}

/// Per-road-type means and cost share, in first-seen type order.
///
/// `cost_percentage` is the type's share of the summed cost of delay over
/// all `records`, and 0 when that sum is 0. `top_roads` holds up to
/// [`ROAD_TYPE_TOP_ROADS`] members by congestion index, names untruncated.
#[must_use]
pub fn aggregate_by_road_type(records: &[RoadwayRecord]) -> Vec<RoadTypeBucket> {
    let statewide_cost: f64 = records.iter().map(|r| r.cost_of_delay).sum();

    group_by(records, |r| classify_road_type(&r.name))
        .into_iter()
        .map(|(road_type, members)| {
            let total_cost = sum_by(&members, |r| r.cost_of_delay);
            RoadTypeBucket {
                road_type,
                count: members.len() as u64,
                avg_congestion: mean(sum_by(&members, |r| r.congestion_index), members.len()),
                avg_delay: mean(sum_by(&members, |r| r.delay_per_mile), members.len()),
                total_cost,
                cost_percentage: if statewide_cost > 0.0 {
                    total_cost / statewide_cost * 100.0
                } else {
                    0.0
                },
                top_roads: top_n_by(
                    members.iter().copied(),
                    |r| r.congestion_index,
                    ROAD_TYPE_TOP_ROADS,
                    SortDirection::Desc,
                )
                .into_iter()
                .map(|r| project(r, r.congestion_index, usize::MAX))
                .collect(),
            }
        })
        .collect()
}

/// Road-type buckets with the most roadways, at most `limit` of them.
#[must_use]
pub fn top_road_types(records: &[RoadwayRecord], limit: usize) -> Vec<RoadTypeBucket> {
    let mut buckets = aggregate_by_road_type(records);
    buckets.sort_by(|a, b| b.count.cmp(&a.count));
    buckets.truncate(limit);
    buckets
}

/// Costliest districts first, at most `limit` of them.
#[must_use]
pub fn district_costs(records: &[RoadwayRecord], limit: usize) -> Vec<DistrictCost> {
    let mut costs: Vec<DistrictCost> = group_by(records, |r| r.district.clone())
        .into_iter()
        .map(|(name, members)| DistrictCost {
            name,
            total_cost: sum_by(&members, |r| r.cost_of_delay),
            truck_cost: sum_by(&members, |r| r.cost_of_truck_delay),
            commuter_cost: sum_by(&members, |r| r.cost_of_delay - r.cost_of_truck_delay),
            road_count: members.len() as u64,
            road_ids: ids(&members),
        })
        .collect();

    costs.sort_by(|a, b| {
        b.total_cost
            .partial_cmp(&a.total_cost)
            .unwrap_or(Ordering::Equal)
    });
    costs.truncate(limit);
    costs
}

/// Statewide cost split, with per-capita, per-commuter and per-truck
/// figures based on the estimated population and truck fleet.
#[must_use]
pub fn cost_breakdown(records: &[RoadwayRecord]) -> CostBreakdown {
    let total_cost: f64 = records.iter().map(|r| r.cost_of_delay).sum();
    let truck_cost: f64 = records.iter().map(|r| r.cost_of_truck_delay).sum();
    let commuter_cost = total_cost - truck_cost;
    let estimated_commuters = ESTIMATED_POPULATION * COMMUTER_SHARE;

    CostBreakdown {
        total_cost,
        truck_cost,
        commuter_cost,
        cost_per_capita: total_cost / ESTIMATED_POPULATION,
        cost_per_commuter: total_cost / estimated_commuters,
        commuter_cost_per_commuter: commuter_cost / estimated_commuters,
        cost_per_truck: truck_cost / ESTIMATED_COMMERCIAL_TRUCKS,
    }
}
