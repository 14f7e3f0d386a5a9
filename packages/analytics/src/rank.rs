//! Top-N selection and ranked projections.

use std::cmp::Ordering;

use tx_congestion_analytics_models::{
    ProjectedRecord, RankMetric, RankingPreset, Rankings, SortDirection,
};
use tx_congestion_roadway_models::RoadwayRecord;

use crate::classify::congestion_color;

/// Returns the first `n` records ordered by `key`.
///
/// The sort is stable, so records with equal keys keep their source order.
/// Incomparable keys (`NaN`) compare as equal. The input is not modified.
#[must_use]
pub fn top_n_by<'a, I, F>(
    records: I,
    key: F,
    n: usize,
    direction: SortDirection,
) -> Vec<&'a RoadwayRecord>
where
    I: IntoIterator<Item = &'a RoadwayRecord>,
    F: Fn(&RoadwayRecord) -> f64,
{
    let mut sorted: Vec<&RoadwayRecord> = records.into_iter().collect();
    sorted.sort_by(|a, b| {
        let ordering = key(a).partial_cmp(&key(b)).unwrap_or(Ordering::Equal);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    sorted.truncate(n);
    sorted
}

/// The first `n` records by `metric`, projected for display.
///
/// Each row's `value` is the ranked metric.
#[must_use]
pub fn top_n(
    records: &[RoadwayRecord],
    metric: RankMetric,
    n: usize,
    direction: SortDirection,
    name_limit: usize,
) -> Vec<ProjectedRecord> {
    top_n_by(records, |r| metric.value(r), n, direction)
        .into_iter()
        .map(|r| project(r, metric.value(r), name_limit))
        .collect()
}

/// One of the fixed site rankings.
///
/// Presets may sort by one field and report another as `value`.
#[must_use]
pub fn ranking(
    records: &[RoadwayRecord],
    preset: RankingPreset,
    n: usize,
    name_limit: usize,
) -> Vec<ProjectedRecord> {
    let sort_metric = preset.sort_metric();
    let value_metric = preset.value_metric();
    top_n_by(records, |r| sort_metric.value(r), n, preset.direction())
        .into_iter()
        .map(|r| project(r, value_metric.value(r), name_limit))
        .collect()
}

/// All preset rankings.
#[must_use]
pub fn rankings(records: &[RoadwayRecord], n: usize, name_limit: usize) -> Rankings {
    Rankings {
        overall: ranking(records, RankingPreset::Overall, n, name_limit),
        truck: ranking(records, RankingPreset::Truck, n, name_limit),
        cost: ranking(records, RankingPreset::Cost, n, name_limit),
        most_congested: ranking(records, RankingPreset::MostCongested, n, name_limit),
    }
}

/// Shortens `name` to `limit` characters, ending in `...` when cut.
///
/// Names at or under the limit are returned unchanged.
#[must_use]
pub fn truncate_name(name: &str, limit: usize) -> String {
    if name.chars().count() <= limit {
        return name.to_string();
    }
    let mut truncated: String = name.chars().take(limit.saturating_sub(3)).collect();
    truncated.push_str("...");
    truncated
}

/// Builds the display row for one record.
#[must_use]
pub fn project(record: &RoadwayRecord, value: f64, name_limit: usize) -> ProjectedRecord {
    ProjectedRecord {
        id: record.id,
        name: truncate_name(&record.name, name_limit),
        full_name: record.name.clone(),
        value,
        district: record.district.clone(),
        rank: record.rank,
        truck_rank: record.truck_rank,
        congestion_index: record.congestion_index,
        delay_per_mile: record.delay_per_mile,
        cost_of_delay: record.cost_of_delay,
        truck_delay: record.truck_delay,
        cost_of_truck_delay: record.cost_of_truck_delay,
        color: congestion_color(record.congestion_index).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record;

    fn values(rows: &[ProjectedRecord]) -> Vec<f64> {
        rows.iter().map(|r| r.value).collect()
    }

    #[test]
    fn top_two_by_congestion() {
        let records = vec![
            record(1, "A", "Austin", 2.0),
            record(2, "B", "Austin", 1.0),
            record(3, "C", "Austin", 3.0),
        ];
        let top = top_n(
            &records,
            RankMetric::CongestionIndex,
            2,
            SortDirection::Desc,
            25,
        );
        assert_eq!(values(&top), vec![3.0, 2.0]);
        // Source order is untouched.
        assert_eq!(records[0].id, 1);
    }

    #[test]
    fn ties_keep_source_order() {
        let records = vec![
            record(1, "A", "Austin", 1.5),
            record(2, "B", "Austin", 1.5),
            record(3, "C", "Austin", 1.5),
        ];
        let asc = top_n_by(&records, |r| r.congestion_index, 3, SortDirection::Asc);
        let desc = top_n_by(&records, |r| r.congestion_index, 3, SortDirection::Desc);
        assert_eq!(asc.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(desc.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn n_larger_than_input_returns_everything() {
        let records = vec![record(1, "A", "Austin", 1.0)];
        assert_eq!(top_n_by(&records, |r| r.delay_per_mile, 10, SortDirection::Desc).len(), 1);
        let none: Vec<RoadwayRecord> = Vec::new();
        assert!(top_n_by(&none, |r| r.delay_per_mile, 10, SortDirection::Desc).is_empty());
    }

    #[test]
    fn overall_preset_sorts_by_rank_and_reports_delay() {
        let mut first = record(7, "IH 35", "Austin", 2.0);
        first.rank = 1;
        first.delay_per_mile = 500.0;
        let mut second = record(8, "US 59", "Houston", 3.0);
        second.rank = 2;
        second.delay_per_mile = 900.0;
        let records = vec![second, first];

        let rows = ranking(&records, RankingPreset::Overall, 10, 25);
        assert_eq!(rows[0].id, 7);
        assert!((rows[0].value - 500.0).abs() < f64::EPSILON);
        assert_eq!(rows[1].id, 8);
    }

    #[test]
    fn rankings_fill_every_preset() {
        let records = vec![
            record(1, "A", "Austin", 2.0),
            record(2, "B", "Dallas", 1.0),
        ];
        let rankings = rankings(&records, 1, 25);
        assert_eq!(rankings.overall.len(), 1);
        assert_eq!(rankings.truck.len(), 1);
        assert_eq!(rankings.cost.len(), 1);
        assert_eq!(rankings.most_congested[0].id, 1);
    }

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate_name("Short", 25), "Short");
        assert_eq!(truncate_name("Exactly Five", 12), "Exactly Five");
        assert_eq!(truncate_name("North Central Expressway", 10), "North C...");
        assert_eq!(truncate_name("Añil Über Straße", 7), "Añil...");
        assert_eq!(truncate_name("Long", 2), "...");
    }

    #[test]
    fn projection_carries_color() {
        let row = project(&record(1, "A", "Austin", 2.7), 0.0, 25);
        assert_eq!(row.color, "#b91c1c");
        assert_eq!(row.full_name, "A");
    }
}
