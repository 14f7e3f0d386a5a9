#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line views over the `TxDOT` Top 100 Congested Roadways feed.
//!
//! Each subcommand loads the feed once (or a saved copy with `--file`),
//! runs one view of the pipeline, and prints it as a table or, with
//! `--json`, as JSON. Without a subcommand an interactive menu picks the
//! view.
//!
//! Uses `indicatif-log-bridge` (via [`tx_congestion_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and the load indicator never fight for the terminal.

mod interactive;
mod views;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tx_congestion_analytics::{
    AnalyticsError, aggregate, estimate, filter, normalize, parse_direction, parse_district_metric,
    parse_rank_metric, quality, rank,
};
use tx_congestion_analytics_models::{DistrictMetric, RankMetric, ReportConfig, SortDirection};
use tx_congestion_cli_utils::{IndicatifProgress, MultiProgress};
use tx_congestion_feed::{FeedSource, registry};
use tx_congestion_roadway_models::{RoadwayFilter, RoadwaySnapshot};

#[derive(Parser)]
#[command(
    name = "tx_congestion",
    about = "Texas Top 100 congested roadways analytics"
)]
struct Cli {
    /// Read a saved `GeoJSON` `FeatureCollection` instead of the live feed
    #[arg(long, global = true, conflicts_with = "url")]
    file: Option<PathBuf>,
    /// Query this `ArcGIS` endpoint instead of the registry URL
    #[arg(long, global = true)]
    url: Option<String>,
    /// TOML file overriding report sizes and name limits
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone)]
enum Commands {
    #[command(flatten)]
    View(ViewCommand),
    /// List the built-in feeds
    Feeds,
    /// Serve the JSON API over the loaded snapshot
    Serve {
        /// Bind address (defaults to `BIND_ADDR` or 127.0.0.1)
        #[arg(long)]
        bind: Option<String>,
        /// Port (defaults to `PORT` or 8080)
        #[arg(long)]
        port: Option<u16>,
    },
}

/// Subcommands that print one view of a loaded snapshot.
#[derive(Subcommand, Clone)]
enum ViewCommand {
    /// Every view in one report
    Report,
    /// Roadways matching a district and congestion range
    Roadways {
        /// Exact district name (`all` keeps every district)
        #[arg(long)]
        district: Option<String>,
        /// Inclusive lower congestion bound
        #[arg(long, default_value_t = 0.0)]
        min_congestion: f64,
        /// Inclusive upper congestion bound
        #[arg(long, default_value_t = 3.0)]
        max_congestion: f64,
    },
    /// District summaries
    Districts {
        /// Metric to sort by (`roadCount`, `avgCongestionIndex`,
        /// `totalCostOfDelay`, `avgDelayPerMile`)
        #[arg(long, default_value = "roadCount", value_parser = parse_district_metric)]
        sort: DistrictMetric,
        /// `asc` or `desc`
        #[arg(long, default_value = "desc", value_parser = parse_direction)]
        direction: SortDirection,
    },
    /// Largest districts compared on a 0-100 scale
    Compare {
        /// Number of districts
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Roadways grouped by congestion severity
    Severity,
    /// Roadways grouped by road type
    RoadTypes {
        /// Number of road types
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Top roadways by any numeric field
    Top {
        /// Field to rank by (e.g. `congestionIndex`, `costOfDelay`, `rank`)
        #[arg(long, default_value = "congestionIndex", value_parser = parse_rank_metric)]
        metric: RankMetric,
        /// Number of roadways
        #[arg(long)]
        n: Option<usize>,
        /// `asc` or `desc`
        #[arg(long, default_value = "desc", value_parser = parse_direction)]
        direction: SortDirection,
        /// Truncate names longer than this
        #[arg(long)]
        name_limit: Option<usize>,
    },
    /// The preset overall, truck, cost and congestion rankings
    Rankings {
        /// Roadways per ranking
        #[arg(long)]
        n: Option<usize>,
    },
    /// Estimated commuter impact of the most congested roadways
    Commuters {
        /// Number of roadways
        #[arg(long)]
        n: Option<usize>,
        /// Truncate names longer than this
        #[arg(long)]
        name_limit: Option<usize>,
    },
    /// Statewide and per-district cost of delay
    Costs {
        /// Number of districts
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Data-quality findings
    Quality,
}

/// Picks the feed from the flags, falling back to the environment.
fn resolve_source(file: Option<PathBuf>, url: Option<String>) -> FeedSource {
    if let Some(path) = file {
        return FeedSource::File(path);
    }
    if let Some(url) = url {
        let mut feed = registry::default_feed();
        feed.url = url;
        return FeedSource::Url(feed);
    }
    tx_congestion_feed::source_from_env()
}

/// Reads report sizes from a TOML file. Missing keys keep their defaults.
fn load_config(path: Option<&Path>) -> Result<ReportConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(ReportConfig::default());
    };
    let body = std::fs::read_to_string(path)?;
    let config = toml::from_str(&body)?;
    log::debug!("Loaded report config from {}", path.display());
    Ok(config)
}

/// Loads the snapshot with a progress indicator. Never fails on feed
/// errors; the snapshot is empty instead.
async fn load_snapshot(
    source: &FeedSource,
    multi: &MultiProgress,
) -> Result<RoadwaySnapshot, Box<dyn std::error::Error>> {
    let client = tx_congestion_feed::build_client()?;
    let progress = IndicatifProgress::feed_bar(multi, &format!("Loading {}", source.label()));
    let load = tx_congestion_feed::load(source, &client, progress.as_ref()).await;
    Ok(load.snapshot)
}

/// Builds the roadway filter from the command-line bounds.
fn build_filter(
    district: Option<&str>,
    min_congestion: f64,
    max_congestion: f64,
) -> Result<RoadwayFilter, AnalyticsError> {
    let roadway_filter =
        RoadwayFilter::new(district, Some(min_congestion), Some(max_congestion));
    filter::validate_filter(&roadway_filter)?;
    Ok(roadway_filter)
}

/// Prints one view of `snapshot`.
///
/// # Errors
///
/// Returns an error if the congestion range is invalid or JSON output
/// cannot be serialized.
fn show(
    command: &ViewCommand,
    snapshot: &RoadwaySnapshot,
    config: &ReportConfig,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let records = snapshot.records();

    if !json {
        views::print_snapshot(snapshot);
    }

    match command {
        ViewCommand::Report => {
            let report = tx_congestion_analytics::build_report(snapshot, config);
            if json {
                views::print_json(&report)?;
            } else {
                views::print_report(&report, records);
            }
        }
        ViewCommand::Roadways {
            district,
            min_congestion,
            max_congestion,
        } => {
            let roadway_filter =
                build_filter(district.as_deref(), *min_congestion, *max_congestion)?;
            let filtered = filter::apply_filter(records, &roadway_filter);
            let view = filter::map_view(&roadway_filter, &filtered);
            if json {
                views::print_json(&filtered)?;
            } else {
                views::print_roadways(&filtered, &view);
            }
        }
        ViewCommand::Districts { sort, direction } => {
            let mut districts = aggregate::aggregate_by_district(records);
            aggregate::sort_districts(&mut districts, *sort, *direction);
            if json {
                views::print_json(&districts)?;
            } else {
                views::print_districts(&districts);
            }
        }
        ViewCommand::Compare { limit } => {
            let districts = aggregate::aggregate_by_district(records);
            let comparison =
                normalize::comparison_view(&districts, limit.unwrap_or(config.comparison_limit));
            if json {
                views::print_json(&comparison)?;
            } else {
                views::print_comparison(&comparison);
            }
        }
        ViewCommand::Severity => {
            let buckets = aggregate::aggregate_by_severity(records);
            if json {
                views::print_json(&buckets)?;
            } else {
                views::print_severity(&buckets);
            }
        }
        ViewCommand::RoadTypes { limit } => {
            let buckets =
                aggregate::top_road_types(records, limit.unwrap_or(config.road_type_limit));
            if json {
                views::print_json(&buckets)?;
            } else {
                views::print_road_types(&buckets);
            }
        }
        ViewCommand::Top {
            metric,
            n,
            direction,
            name_limit,
        } => {
            let rows = rank::top_n(
                records,
                *metric,
                n.unwrap_or(config.ranking_size),
                *direction,
                name_limit.unwrap_or(config.ranking_name_limit),
            );
            if json {
                views::print_json(&rows)?;
            } else {
                views::print_projected(
                    &format!("Top by {}", metric.label()),
                    &metric.label().to_uppercase(),
                    &rows,
                );
            }
        }
        ViewCommand::Rankings { n } => {
            let rankings = rank::rankings(
                records,
                n.unwrap_or(config.ranking_size),
                config.ranking_name_limit,
            );
            if json {
                views::print_json(&rankings)?;
            } else {
                views::print_rankings(&rankings);
            }
        }
        ViewCommand::Commuters { n, name_limit } => {
            let rows = estimate::commuter_impact(
                records,
                n.unwrap_or(config.commuter_size),
                name_limit.unwrap_or(config.commuter_name_limit),
            );
            if json {
                views::print_json(&rows)?;
            } else {
                views::print_commuters(&rows);
            }
        }
        ViewCommand::Costs { limit } => {
            let costs = aggregate::cost_breakdown(records);
            let districts =
                aggregate::district_costs(records, limit.unwrap_or(config.district_cost_limit));
            if json {
                views::print_json(&serde_json::json!({
                    "statewide": costs,
                    "districts": districts,
                }))?;
            } else {
                views::print_costs(&costs, &districts);
            }
        }
        ViewCommand::Quality => {
            let findings = quality::data_quality(records);
            if json {
                views::print_json(&findings)?;
            } else {
                views::print_quality(&findings, records);
            }
        }
    }

    Ok(())
}

fn print_feeds() {
    println!("{:<20} NAME", "ID");
    println!("{}", "-".repeat(50));
    for feed in registry::all_feeds() {
        println!("{:<20} {}", feed.id, feed.name);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = tx_congestion_cli_utils::init_logger();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let source = resolve_source(cli.file, cli.url);

    let Some(command) = cli.command else {
        return interactive::run(&source, &config, &multi).await;
    };

    match command {
        Commands::Feeds => print_feeds(),
        Commands::Serve { bind, port } => {
            let snapshot = load_snapshot(&source, &multi).await?;
            let (env_bind, env_port) = tx_congestion_server::bind_config_from_env();
            let bind = bind.unwrap_or(env_bind);
            let port = port.unwrap_or(env_port);

            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(move || {
                actix_web::rt::System::new().block_on(tx_congestion_server::serve(
                    snapshot, config, bind, port,
                ))
            })
            .await??;
        }
        Commands::View(command) => {
            let snapshot = load_snapshot(&source, &multi).await?;
            show(&command, &snapshot, &config, cli.json)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory as _;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn file_flag_wins() {
        let source = resolve_source(Some(PathBuf::from("top100.geojson")), None);
        assert_eq!(source, FeedSource::File(PathBuf::from("top100.geojson")));
    }

    #[test]
    fn url_flag_overrides_registry_url() {
        let source = resolve_source(None, Some("http://localhost:9000/query".to_string()));
        let FeedSource::Url(feed) = source else {
            panic!("expected a URL source");
        };
        assert_eq!(feed.url, "http://localhost:9000/query");
        assert_eq!(feed.id, registry::DEFAULT_FEED_ID);
    }

    #[test]
    fn parses_top_arguments() {
        let cli = Cli::try_parse_from([
            "tx_congestion",
            "top",
            "--metric",
            "costOfDelay",
            "--n",
            "5",
            "--direction",
            "asc",
        ])
        .unwrap();
        let Some(Commands::View(ViewCommand::Top {
            metric,
            n,
            direction,
            name_limit,
        })) = cli.command
        else {
            panic!("expected top");
        };
        assert_eq!(metric, RankMetric::CostOfDelay);
        assert_eq!(n, Some(5));
        assert_eq!(direction, SortDirection::Asc);
        assert_eq!(name_limit, None);
    }

    #[test]
    fn rejects_unknown_metric() {
        assert!(Cli::try_parse_from(["tx_congestion", "top", "--metric", "speed"]).is_err());
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from(["tx_congestion", "report", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Some(Commands::View(ViewCommand::Report))));
    }

    #[test]
    fn config_file_keeps_unset_defaults() {
        let path = std::env::temp_dir().join("tx_congestion_cli_config.toml");
        std::fs::write(&path, "rankingSize = 3\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(config.ranking_size, 3);
        assert_eq!(config.commuter_size, 15);
    }

    #[test]
    fn all_district_is_no_district_filter() {
        let roadway_filter = build_filter(Some("all"), 0.0, 3.0).unwrap();
        assert_eq!(roadway_filter.district, None);

        let roadway_filter = build_filter(Some("Houston"), 1.0, 2.0).unwrap();
        assert_eq!(roadway_filter.district.as_deref(), Some("Houston"));
    }

    #[test]
    fn inverted_congestion_range_is_an_error() {
        let err = build_filter(None, 2.0, 1.0).unwrap_err();
        assert_eq!(err, AnalyticsError::InvertedRange { min: 2.0, max: 1.0 });
    }

    #[test]
    fn roadways_view_rejects_inverted_range() {
        let cli = Cli::try_parse_from([
            "tx_congestion",
            "roadways",
            "--min-congestion",
            "2",
            "--max-congestion",
            "1",
        ])
        .unwrap();
        let Some(Commands::View(command)) = cli.command else {
            panic!("expected a view");
        };
        let snapshot = RoadwaySnapshot::new("test", Vec::new(), 0);
        assert!(show(&command, &snapshot, &ReportConfig::default(), true).is_err());
    }

    #[test]
    fn feeds_and_serve_are_not_views() {
        let cli = Cli::try_parse_from(["tx_congestion", "feeds"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Feeds)));
        let cli = Cli::try_parse_from(["tx_congestion", "serve", "--port", "9000"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Serve { port: Some(9000), .. })
        ));
    }
}
