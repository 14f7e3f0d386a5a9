//! Multi-metric normalization of district summaries.

use std::cmp::Ordering;

use tx_congestion_analytics_models::{
    DistrictMetric, DistrictSummary, NormalizedDistrict, NormalizedMetricValue,
};

/// Scales each requested metric to 0-100 against its maximum over
/// `summaries`.
///
/// A metric whose maximum is 0 (or not finite) scores 0 for every district.
#[must_use]
pub fn normalize_districts(
    summaries: &[DistrictSummary],
    metrics: &[DistrictMetric],
) -> Vec<NormalizedDistrict> {
    normalize_against(summaries, summaries, metrics)
}

/// The grouped comparison view: the `limit` districts with the most
/// roadways, each scored on road count, average congestion and total cost.
///
/// Scores are relative to the maximum over *all* `summaries`, so a district
/// outside the top `limit` can still set the scale for a metric.
#[must_use]
pub fn comparison_view(summaries: &[DistrictSummary], limit: usize) -> Vec<NormalizedDistrict> {
    let mut largest = summaries.to_vec();
    largest.sort_by(|a, b| b.road_count.cmp(&a.road_count));
    largest.truncate(limit);
    normalize_against(&largest, summaries, &DistrictMetric::COMPARISON)
}

fn normalize_against(
    selected: &[DistrictSummary],
    reference: &[DistrictSummary],
    metrics: &[DistrictMetric],
) -> Vec<NormalizedDistrict> {
    let maxima: Vec<f64> = metrics
        .iter()
        .map(|metric| metric_max(reference, *metric))
        .collect();

    selected
        .iter()
        .map(|summary| NormalizedDistrict {
            name: summary.name.clone(),
            values: metrics
                .iter()
                .zip(&maxima)
                .map(|(metric, max)| {
                    let actual = metric.value(summary);
                    NormalizedMetricValue {
                        metric: *metric,
                        score: scale(actual, *max),
                        actual,
                    }
                })
                .collect(),
        })
        .collect()
}

fn metric_max(summaries: &[DistrictSummary], metric: DistrictMetric) -> f64 {
    summaries
        .iter()
        .map(|s| metric.value(s))
        .max_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
        .unwrap_or(0.0)
}

fn scale(value: f64, max: f64) -> f64 {
    if max == 0.0 || !max.is_finite() {
        return 0.0;
    }
    100.0 * value / max
}
