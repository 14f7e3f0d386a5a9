//! Full report over one snapshot.

use tx_congestion_analytics_models::{
    CongestionReport, DistrictMetric, ReportConfig, SortDirection,
};
use tx_congestion_roadway_models::RoadwaySnapshot;

use crate::{
    aggregate::{
        aggregate_by_district, aggregate_by_severity, categories, cost_breakdown, district_costs,
        sort_districts, top_road_types,
    },
    estimate::commuter_impact,
    normalize::comparison_view,
    quality::data_quality,
    rank::rankings,
};

/// Computes every view of `snapshot`.
///
/// The result depends only on the snapshot and `config`, so building it
/// twice yields identical output.
#[must_use]
pub fn build_report(snapshot: &RoadwaySnapshot, config: &ReportConfig) -> CongestionReport {
    let records = snapshot.records();
    log::debug!(
        "Building report over {} roadways from {}",
        records.len(),
        snapshot.source
    );

    let mut districts = aggregate_by_district(records);
    let district_comparison = comparison_view(&districts, config.comparison_limit);
    sort_districts(&mut districts, DistrictMetric::RoadCount, SortDirection::Desc);

    let severity = aggregate_by_severity(records);
    let categories = categories(&severity);

    CongestionReport {
        source: snapshot.source.clone(),
        record_count: records.len(),
        rejected: snapshot.rejected,
        districts,
        district_comparison,
        district_costs: district_costs(records, config.district_cost_limit),
        severity: severity.to_vec(),
        categories,
        road_types: top_road_types(records, config.road_type_limit),
        rankings: rankings(records, config.ranking_size, config.ranking_name_limit),
        commuter_impact: commuter_impact(
            records,
            config.commuter_size,
            config.commuter_name_limit,
        ),
        costs: cost_breakdown(records),
        quality: data_quality(records),
    }
}
