//! Data-quality checks that never block aggregation.

use tx_congestion_analytics_models::DataQuality;
use tx_congestion_roadway_models::RoadwayRecord;

/// Records whose truck cost of delay exceeds their total cost of delay.
#[must_use]
pub fn cost_invariant_violations(records: &[RoadwayRecord]) -> Vec<&RoadwayRecord> {
    records
        .iter()
        .filter(|r| !r.truck_cost_within_total())
        .collect()
}

/// Runs every check and logs each finding at `warn`.
#[must_use]
pub fn data_quality(records: &[RoadwayRecord]) -> DataQuality {
    let violations = cost_invariant_violations(records);

    for record in &violations {
        log::warn!(
            "Roadway {} ({}) has truck cost {} above its total cost {}",
            record.id,
            record.name,
            record.cost_of_truck_delay,
            record.cost_of_delay
        );
    }

    DataQuality {
        truck_cost_violations: violations.iter().map(|r| r.id).collect(),
    }
}
