//! Plain-text table rendering for every pipeline view.

use serde::Serialize;
use tx_congestion_analytics::format::{
    format_currency, format_number, format_percent, format_time,
};
use tx_congestion_analytics_models::{
    CommuterImpact, CongestionReport, CostBreakdown, DataQuality, DistrictCost, DistrictSummary,
    MapView, NormalizedDistrict, ProjectedRecord, Rankings, RoadTypeBucket, SeverityBucket,
};
use tx_congestion_roadway_models::{RoadwayRecord, RoadwaySnapshot};

/// Prints any view as pretty JSON.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn heading(title: &str) {
    println!();
    println!("{title}");
    println!("{}", "-".repeat(78));
}

/// One line describing where the data came from.
pub fn print_snapshot(snapshot: &RoadwaySnapshot) {
    println!(
        "Source: {} ({} roadways, {} rejected)",
        snapshot.source,
        snapshot.len(),
        snapshot.rejected
    );
    if let Some(error) = &snapshot.load_error {
        println!("Load failed: {error}");
    }
}

/// Filtered roadways and the map framing.
pub fn print_roadways(roadways: &[&RoadwayRecord], view: &MapView) {
    heading(&format!("Roadways ({})", roadways.len()));
    println!(
        "{:>4}  {:<28} {:<16} {:>6} {:>12} {:>16}",
        "RANK", "NAME", "DISTRICT", "TCI", "DELAY/MI", "COST"
    );
    for road in roadways {
        println!(
            "{:>4}  {:<28} {:<16} {:>6.2} {:>12} {:>16}",
            road.rank,
            road.name,
            road.district,
            road.congestion_index,
            format_number(road.delay_per_mile),
            format_currency(road.cost_of_delay)
        );
    }
    println!();
    println!(
        "Map center {:.4}, {:.4} at zoom {}",
        view.center[0], view.center[1], view.zoom
    );
}

/// District summaries.
pub fn print_districts(districts: &[DistrictSummary]) {
    heading("Districts");
    println!(
        "{:<20} {:>6} {:>14} {:>10} {:>18}",
        "DISTRICT", "ROADS", "AVG DELAY/MI", "AVG TCI", "COST OF DELAY"
    );
    for district in districts {
        println!(
            "{:<20} {:>6} {:>14} {:>10.2} {:>18}",
            district.name,
            district.road_count,
            format_number(district.avg_delay_per_mile),
            district.avg_congestion_index,
            format_currency(district.total_cost_of_delay)
        );
    }
}

/// Normalized district comparison.
pub fn print_comparison(districts: &[NormalizedDistrict]) {
    heading("District comparison (0-100, relative to the largest value)");
    for district in districts {
        let scores: Vec<String> = district
            .values
            .iter()
            .map(|v| format!("{} {:>5.1}", v.metric.label(), v.score))
            .collect();
        println!("{:<20} {}", district.name, scores.join("   "));
    }
}

/// Severity buckets.
#[allow(clippy::cast_precision_loss)]
pub fn print_severity(buckets: &[SeverityBucket]) {
    heading("Severity");
    println!(
        "{:<8} {:<12} {:>6} {:>14} {:>18} {:>16}",
        "TIER", "RANGE", "ROADS", "COMMUTERS", "COST", "TIME/YEAR"
    );
    for bucket in buckets {
        let range = bucket.range_high.map_or_else(
            || format!("{}+", bucket.range_low),
            |high| format!("{}-{high}", bucket.range_low),
        );
        println!(
            "{:<8} {:<12} {:>6} {:>14} {:>18} {:>16}",
            bucket.tier.as_ref(),
            range,
            bucket.road_count,
            format_number(bucket.total_commuters as f64),
            format_currency(bucket.total_cost),
            format_time(bucket.avg_time_wasted * 60.0)
        );
    }
}

/// Road-type buckets.
pub fn print_road_types(buckets: &[RoadTypeBucket]) {
    heading("Road types");
    println!(
        "{:<16} {:>6} {:>8} {:>12} {:>18} {:>8}",
        "TYPE", "ROADS", "AVG TCI", "AVG DELAY", "COST", "SHARE"
    );
    for bucket in buckets {
        println!(
            "{:<16} {:>6} {:>8.2} {:>12} {:>18} {:>8}",
            bucket.road_type.as_ref(),
            bucket.count,
            bucket.avg_congestion,
            format_number(bucket.avg_delay),
            format_currency(bucket.total_cost),
            format_percent(bucket.cost_percentage)
        );
        for road in &bucket.top_roads {
            println!(
                "    {:<28} {:<16} {:>6.2}",
                road.name, road.district, road.congestion_index
            );
        }
    }
}

/// A top-N projection.
pub fn print_projected(title: &str, value_label: &str, rows: &[ProjectedRecord]) {
    heading(title);
    println!(
        "{:>3}  {:<28} {:<16} {:>16}",
        "#", "NAME", "DISTRICT", value_label
    );
    for (i, row) in rows.iter().enumerate() {
        println!(
            "{:>3}  {:<28} {:<16} {:>16}",
            i + 1,
            row.name,
            row.district,
            format_number(row.value)
        );
    }
}

/// The four preset rankings.
pub fn print_rankings(rankings: &Rankings) {
    print_projected("Worst overall rank", "DELAY/MI", &rankings.overall);
    print_projected("Worst truck rank", "TRUCK DELAY", &rankings.truck);
    print_projected("Highest cost of delay", "COST", &rankings.cost);
    print_projected("Most congested", "TCI", &rankings.most_congested);
}

/// Commuter impact estimates.
#[allow(clippy::cast_precision_loss)]
pub fn print_commuters(rows: &[CommuterImpact]) {
    heading("Commuter impact (estimated)");
    println!(
        "{:<22} {:<16} {:>6} {:>12} {:>14} {:>14}",
        "NAME", "DISTRICT", "TCI", "COMMUTERS", "COST/COMMUTER", "TIME/YEAR"
    );
    for row in rows {
        println!(
            "{:<22} {:<16} {:>6.2} {:>12} {:>14} {:>14}",
            row.name,
            row.district,
            row.congestion_index,
            format_number(row.estimated_commuters as f64),
            format_currency(row.cost_per_commuter),
            format_time(row.time_wasted * 60.0)
        );
    }
}

/// Statewide and per-district cost split.
pub fn print_costs(costs: &CostBreakdown, districts: &[DistrictCost]) {
    heading("Cost of delay");
    println!("Total:          {}", format_currency(costs.total_cost));
    println!("Truck:          {}", format_currency(costs.truck_cost));
    println!("Commuter:       {}", format_currency(costs.commuter_cost));
    println!("Per capita:     {}", format_currency(costs.cost_per_capita));
    println!("Per commuter:   {}", format_currency(costs.cost_per_commuter));
    println!(
        "Commuter cost per commuter: {}",
        format_currency(costs.commuter_cost_per_commuter)
    );
    println!("Truck cost per truck:       {}", format_currency(costs.cost_per_truck));

    if districts.is_empty() {
        return;
    }
    println!();
    println!(
        "{:<20} {:>6} {:>18} {:>18} {:>18}",
        "DISTRICT", "ROADS", "TOTAL", "TRUCK", "COMMUTER"
    );
    for district in districts {
        println!(
            "{:<20} {:>6} {:>18} {:>18} {:>18}",
            district.name,
            district.road_count,
            format_currency(district.total_cost),
            format_currency(district.truck_cost),
            format_currency(district.commuter_cost)
        );
    }
}

/// Data-quality findings.
pub fn print_quality(quality: &DataQuality, records: &[RoadwayRecord]) {
    heading("Data quality");
    if quality.truck_cost_violations.is_empty() {
        println!("No findings.");
        return;
    }
    println!(
        "{} roadways report a truck cost above their total cost:",
        quality.truck_cost_violations.len()
    );
    for id in &quality.truck_cost_violations {
        if let Some(road) = records.iter().find(|r| r.id == *id) {
            println!(
                "  {:>6}  {:<28} truck {} > total {}",
                road.id,
                road.name,
                format_currency(road.cost_of_truck_delay),
                format_currency(road.cost_of_delay)
            );
        }
    }
}

/// Every section of a report.
pub fn print_report(report: &CongestionReport, records: &[RoadwayRecord]) {
    println!(
        "{} roadways from {} ({} rejected)",
        report.record_count, report.source, report.rejected
    );
    print_costs(&report.costs, &report.district_costs);
    print_districts(&report.districts);
    print_comparison(&report.district_comparison);
    print_severity(&report.severity);
    print_road_types(&report.road_types);
    print_rankings(&report.rankings);
    print_commuters(&report.commuter_impact);
    print_quality(&report.quality, records);
}
