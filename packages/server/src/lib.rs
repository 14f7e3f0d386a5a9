#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the congested roadways pipeline.
//!
//! The roadway feed is loaded once at startup into an immutable
//! [`RoadwaySnapshot`] shared by every worker. Each endpoint under `/api`
//! runs one view of the pipeline over that snapshot and returns JSON. A
//! failed load still starts the server; the views are then empty and
//! `/api/snapshot` reports why.

mod handlers;
pub mod interactive;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, error::InternalError, middleware, web};
use tx_congestion_analytics_models::ReportConfig;
use tx_congestion_feed::{FeedSource, progress::NullProgress};
use tx_congestion_roadway_models::RoadwaySnapshot;
use tx_congestion_server_models::ApiError;

/// Default bind address when `BIND_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";

/// Default port when `PORT` is unset or invalid.
pub const DEFAULT_PORT: u16 = 8080;

/// Shared application state.
pub struct AppState {
    /// The roadway records every view is computed from.
    pub snapshot: Arc<RoadwaySnapshot>,
    /// Default sizes for views whose request leaves them out.
    pub config: ReportConfig,
}

impl AppState {
    /// Creates state over `snapshot`.
    #[must_use]
    pub fn new(snapshot: RoadwaySnapshot, config: ReportConfig) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
            config,
        }
    }
}

/// Reads `BIND_ADDR` and `PORT`, falling back to the defaults.
#[must_use]
pub fn bind_config_from_env() -> (String, u16) {
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    (bind_addr, port)
}

/// Loads the snapshot from `source`, never failing.
///
/// Load errors are logged and leave the snapshot empty; data-quality
/// findings are logged at `warn`.
pub async fn load_snapshot(source: &FeedSource) -> RoadwaySnapshot {
    let client = match tx_congestion_feed::build_client() {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to build HTTP client: {e}");
            return RoadwaySnapshot::failed(source.label(), e.to_string());
        }
    };

    let load = tx_congestion_feed::load(source, &client, &NullProgress).await;
    let quality = tx_congestion_analytics::quality::data_quality(load.snapshot.records());
    if !quality.truck_cost_violations.is_empty() {
        log::warn!(
            "{} roadways report a truck cost above their total cost",
            quality.truck_cost_violations.len()
        );
    }
    load.snapshot
}

/// Registers every `/api` route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        InternalError::from_response(err, HttpResponse::BadRequest().json(ApiError::new(message)))
            .into()
    }))
    .service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/snapshot", web::get().to(handlers::snapshot))
            .route("/roadways", web::get().to(handlers::roadways))
            .route("/districts", web::get().to(handlers::districts))
            .route("/districts/names", web::get().to(handlers::district_names))
            .route("/districts/compare", web::get().to(handlers::district_compare))
            .route("/districts/costs", web::get().to(handlers::district_costs))
            .route("/severity", web::get().to(handlers::severity))
            .route("/severity/counts", web::get().to(handlers::severity_counts))
            .route("/road-types", web::get().to(handlers::road_types))
            .route("/metrics", web::get().to(handlers::metrics))
            .route("/top", web::get().to(handlers::top))
            .route("/rankings", web::get().to(handlers::rankings))
            .route("/commuters", web::get().to(handlers::commuters))
            .route("/costs", web::get().to(handlers::costs))
            .route("/quality", web::get().to(handlers::quality))
            .route("/report", web::get().to(handlers::report)),
    );
}

/// Serves `snapshot` on `bind_addr:port` until shut down.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
pub async fn serve(
    snapshot: RoadwaySnapshot,
    config: ReportConfig,
    bind_addr: String,
    port: u16,
) -> std::io::Result<()> {
    log::info!(
        "Serving {} roadways from {}",
        snapshot.len(),
        snapshot.source
    );
    let state = web::Data::new(AppState::new(snapshot, config));

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}

/// Starts the congestion API server.
///
/// Resolves the feed from the environment (`TX_CONGESTION_FEED_FILE`,
/// `TX_CONGESTION_FEED_URL`), loads it once, and serves it on `BIND_ADDR`
/// and `PORT`. This is a regular async function; the caller provides the
/// runtime (e.g. via `#[actix_web::main]`) and the logger.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
pub async fn run_server() -> std::io::Result<()> {
    let source = tx_congestion_feed::source_from_env();
    log::info!("Loading roadways from {}...", source.label());
    let snapshot = load_snapshot(&source).await;

    let (bind_addr, port) = bind_config_from_env();
    serve(snapshot, ReportConfig::default(), bind_addr, port).await
}
