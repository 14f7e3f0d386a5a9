//! HTTP handler functions for the congestion API.

use actix_web::{HttpResponse, web};
use tx_congestion_analytics::{
    AnalyticsError, aggregate, estimate, filter, normalize, parse_direction,
    parse_district_metric, parse_rank_metric, quality as data_quality, rank,
};
use tx_congestion_analytics_models::{DistrictMetric, RankMetric, SortDirection};
use tx_congestion_server_models::{
    ApiError, ApiHealth, ApiMetric, ApiRoadways, ApiSnapshot, CommuterQueryParams,
    DistrictQueryParams, LimitQueryParams, RankingQueryParams, RoadwayQueryParams,
    TopQueryParams,
};

use crate::AppState;

fn bad_request(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiError::new(message))
}

fn analytics_error(error: &AnalyticsError) -> HttpResponse {
    log::debug!("Rejected request: {error}");
    bad_request(error.to_string())
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/snapshot`
///
/// Where the data came from and whether loading failed.
pub async fn snapshot(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiSnapshot::from(state.snapshot.as_ref()))
}

/// `GET /api/roadways`
///
/// Roadways matching the district and congestion filters, with map framing.
pub async fn roadways(
    state: web::Data<AppState>,
    params: web::Query<RoadwayQueryParams>,
) -> HttpResponse {
    let roadway_filter = params.to_filter();
    if let Err(e) = filter::validate_filter(&roadway_filter) {
        return analytics_error(&e);
    }

    let filtered = filter::apply_filter(state.snapshot.records(), &roadway_filter);
    HttpResponse::Ok().json(ApiRoadways {
        count: filtered.len(),
        map_view: filter::map_view(&roadway_filter, &filtered),
        bounding_box: filter::bounding_box(&filtered),
        roadways: filtered,
    })
}

/// `GET /api/districts`
///
/// District summaries, sorted by `sort` (default `roadCount`) in
/// `direction` (default `desc`).
pub async fn districts(
    state: web::Data<AppState>,
    params: web::Query<DistrictQueryParams>,
) -> HttpResponse {
    let metric = match params.sort.as_deref().map(parse_district_metric) {
        None => DistrictMetric::RoadCount,
        Some(Ok(metric)) => metric,
        Some(Err(e)) => return analytics_error(&e),
    };
    let direction = match params.direction.as_deref().map(parse_direction) {
        None => SortDirection::Desc,
        Some(Ok(direction)) => direction,
        Some(Err(e)) => return analytics_error(&e),
    };

    let mut summaries = aggregate::aggregate_by_district(state.snapshot.records());
    aggregate::sort_districts(&mut summaries, metric, direction);
    HttpResponse::Ok().json(summaries)
}

/// `GET /api/districts/names`
pub async fn district_names(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(aggregate::district_names(state.snapshot.records()))
}

/// `GET /api/districts/compare`
///
/// Largest districts normalized on road count, congestion, and cost.
pub async fn district_compare(
    state: web::Data<AppState>,
    params: web::Query<LimitQueryParams>,
) -> HttpResponse {
    let limit = params.limit.unwrap_or(state.config.comparison_limit);
    let summaries = aggregate::aggregate_by_district(state.snapshot.records());
    HttpResponse::Ok().json(normalize::comparison_view(&summaries, limit))
}

/// `GET /api/districts/costs`
pub async fn district_costs(
    state: web::Data<AppState>,
    params: web::Query<LimitQueryParams>,
) -> HttpResponse {
    let limit = params.limit.unwrap_or(state.config.district_cost_limit);
    HttpResponse::Ok().json(aggregate::district_costs(state.snapshot.records(), limit))
}

/// `GET /api/severity`
pub async fn severity(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(aggregate::aggregate_by_severity(state.snapshot.records()))
}

/// `GET /api/severity/counts`
pub async fn severity_counts(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(aggregate::count_by_severity(state.snapshot.records()))
}

/// `GET /api/road-types`
pub async fn road_types(
    state: web::Data<AppState>,
    params: web::Query<LimitQueryParams>,
) -> HttpResponse {
    let limit = params.limit.unwrap_or(state.config.road_type_limit);
    HttpResponse::Ok().json(aggregate::top_road_types(state.snapshot.records(), limit))
}

/// `GET /api/metrics`
///
/// Metric names accepted by `/api/top`.
pub async fn metrics() -> HttpResponse {
    let metrics: Vec<ApiMetric> = RankMetric::all()
        .iter()
        .map(|metric| ApiMetric {
            name: metric.to_string(),
            label: metric.label().to_string(),
        })
        .collect();
    HttpResponse::Ok().json(metrics)
}

/// `GET /api/top`
///
/// Top `n` roadways by any numeric field.
pub async fn top(state: web::Data<AppState>, params: web::Query<TopQueryParams>) -> HttpResponse {
    let metric = match params.metric.as_deref().map(parse_rank_metric) {
        None => RankMetric::CongestionIndex,
        Some(Ok(metric)) => metric,
        Some(Err(e)) => return analytics_error(&e),
    };
    let direction = match params.direction.as_deref().map(parse_direction) {
        None => SortDirection::Desc,
        Some(Ok(direction)) => direction,
        Some(Err(e)) => return analytics_error(&e),
    };
    let n = params.n.unwrap_or(state.config.ranking_size);
    let name_limit = params.name_limit.unwrap_or(state.config.ranking_name_limit);

    HttpResponse::Ok().json(rank::top_n(
        state.snapshot.records(),
        metric,
        n,
        direction,
        name_limit,
    ))
}

/// `GET /api/rankings`
///
/// The four preset rankings.
pub async fn rankings(
    state: web::Data<AppState>,
    params: web::Query<RankingQueryParams>,
) -> HttpResponse {
    let n = params.n.unwrap_or(state.config.ranking_size);
    let name_limit = params.name_limit.unwrap_or(state.config.ranking_name_limit);
    HttpResponse::Ok().json(rank::rankings(state.snapshot.records(), n, name_limit))
}

/// `GET /api/commuters`
pub async fn commuters(
    state: web::Data<AppState>,
    params: web::Query<CommuterQueryParams>,
) -> HttpResponse {
    let n = params.n.unwrap_or(state.config.commuter_size);
    let name_limit = params.name_limit.unwrap_or(state.config.commuter_name_limit);
    HttpResponse::Ok().json(estimate::commuter_impact(
        state.snapshot.records(),
        n,
        name_limit,
    ))
}

/// `GET /api/costs`
pub async fn costs(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(aggregate::cost_breakdown(state.snapshot.records()))
}

/// `GET /api/quality`
pub async fn quality(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(data_quality::data_quality(state.snapshot.records()))
}

/// `GET /api/report`
///
/// Every view in one document.
pub async fn report(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(tx_congestion_analytics::build_report(
        &state.snapshot,
        &state.config,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{body::to_bytes, http::StatusCode};
    use tx_congestion_analytics_models::ReportConfig;
    use tx_congestion_roadway_models::{RoadGeometry, RoadwayRecord, RoadwaySnapshot};

    fn road(id: i64, name: &str, district: &str, tci: f64) -> RoadwayRecord {
        RoadwayRecord {
            id,
            name: name.to_string(),
            rank: id,
            truck_rank: id,
            district: district.to_string(),
            delay_per_mile: 100.0 * tci,
            congestion_index: tci,
            cost_of_delay: 1_000_000.0 * tci,
            truck_delay: 10.0,
            cost_of_truck_delay: 100_000.0,
            year: 2023,
            segment_id: None,
            geometry: RoadGeometry {
                kind: "LineString".to_string(),
                coordinates: vec![[-97.0 - tci, 30.0 + tci]],
            },
        }
    }

    fn state() -> web::Data<AppState> {
        let records = vec![
            road(1, "IH 35", "Austin", 2.0),
            road(2, "US 59", "Houston", 1.0),
            road(3, "Loop 1", "Austin", 3.0),
            road(4, "IH 45", "Houston", 2.6),
            road(5, "SH 130", "Dallas", 0.5),
        ];
        web::Data::new(AppState::new(
            RoadwaySnapshot::new("test", records, 0),
            ReportConfig::default(),
        ))
    }

    async fn json(response: HttpResponse) -> serde_json::Value {
        let body = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_reports_version() {
        let response = health().await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body["healthy"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn top_defaults_to_most_congested() {
        let response = top(state(), web::Query(TopQueryParams::default())).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        let ids: Vec<i64> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![3, 4, 1, 2, 5]);
    }

    #[tokio::test]
    async fn metrics_list_every_rankable_field() {
        let body = json(metrics().await).await;
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["name"].as_str().unwrap())
            .collect();
        assert_eq!(names.len(), RankMetric::all().len());
        assert!(names.contains(&"congestionIndex"));
        assert!(names.contains(&"costOfTruckDelay"));
        for name in names {
            assert!(parse_rank_metric(name).is_ok(), "{name} does not parse");
        }
    }

    #[tokio::test]
    async fn rankings_honour_row_count() {
        let params = RankingQueryParams {
            n: Some(2),
            name_limit: None,
        };
        let body = json(rankings(state(), web::Query(params)).await).await;
        assert_eq!(body["overall"].as_array().unwrap().len(), 2);
        assert_eq!(body["mostCongested"][0]["id"], 3);
    }

    #[tokio::test]
    async fn top_rejects_unknown_metric() {
        let params = TopQueryParams {
            metric: Some("speed".to_string()),
            ..TopQueryParams::default()
        };
        let response = top(state(), web::Query(params)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json(response).await;
        assert_eq!(body["error"], "Unknown metric: speed");
    }

    #[tokio::test]
    async fn districts_sorted_by_requested_metric() {
        let params = DistrictQueryParams {
            sort: Some("avgCongestionIndex".to_string()),
            direction: Some("asc".to_string()),
        };
        let response = districts(state(), web::Query(params)).await;
        let body = json(response).await;
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Dallas", "Houston", "Austin"]);
    }

    #[tokio::test]
    async fn districts_reject_unknown_direction() {
        let params = DistrictQueryParams {
            sort: None,
            direction: Some("sideways".to_string()),
        };
        let response = districts(state(), web::Query(params)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn roadways_filter_by_district_and_range() {
        let params = RoadwayQueryParams {
            district: Some("Houston".to_string()),
            min_congestion: Some(0.0),
            max_congestion: Some(3.0),
        };
        let response = roadways(state(), web::Query(params)).await;
        let body = json(response).await;
        assert_eq!(body["count"], 2);
        assert_eq!(body["mapView"]["zoom"], 9);
        assert!(body["boundingBox"].is_object());
    }

    #[tokio::test]
    async fn roadways_reject_inverted_range() {
        let params = RoadwayQueryParams {
            district: None,
            min_congestion: Some(2.0),
            max_congestion: Some(1.0),
        };
        let response = roadways(state(), web::Query(params)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json(response).await;
        assert_eq!(body["error"], "Invalid congestion range: 2 is above 1");
    }

    #[tokio::test]
    async fn severity_has_five_buckets() {
        let body = json(severity(state()).await).await;
        let buckets = body.as_array().unwrap();
        assert_eq!(buckets.len(), 5);
        let total: u64 = buckets
            .iter()
            .map(|b| b["roadCount"].as_u64().unwrap())
            .sum();
        assert_eq!(total, 5);
    }

    #[tokio::test]
    async fn empty_snapshot_still_answers() {
        let state = web::Data::new(AppState::new(
            RoadwaySnapshot::failed("txdot_top_100", "HTTP 503"),
            ReportConfig::default(),
        ));
        let body = json(snapshot(state.clone()).await).await;
        assert_eq!(body["recordCount"], 0);
        assert_eq!(body["loadError"], "HTTP 503");

        let body = json(report(state).await).await;
        assert_eq!(body["recordCount"], 0);
        assert_eq!(body["costs"]["totalCost"], 0.0);
    }
}
