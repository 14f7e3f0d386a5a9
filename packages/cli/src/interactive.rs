//! Menu-driven browsing of the congestion views.

use dialoguer::Select;
use tx_congestion_analytics_models::{DistrictMetric, RankMetric, ReportConfig, SortDirection};
use tx_congestion_cli_utils::MultiProgress;
use tx_congestion_feed::FeedSource;
use tx_congestion_roadway_models::RoadwaySnapshot;

use crate::ViewCommand;

/// Top-level menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tool {
    Report,
    Districts,
    Compare,
    Severity,
    RoadTypes,
    TopCongestion,
    Rankings,
    Commuters,
    Costs,
    Quality,
    Server,
    Quit,
}

impl Tool {
    const ALL: &[Self] = &[
        Self::Report,
        Self::Districts,
        Self::Compare,
        Self::Severity,
        Self::RoadTypes,
        Self::TopCongestion,
        Self::Rankings,
        Self::Commuters,
        Self::Costs,
        Self::Quality,
        Self::Server,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Report => "Full report",
            Self::Districts => "District summaries",
            Self::Compare => "Compare districts",
            Self::Severity => "Congestion severity",
            Self::RoadTypes => "Road types",
            Self::TopCongestion => "Most congested roadways",
            Self::Rankings => "Rankings",
            Self::Commuters => "Commuter impact",
            Self::Costs => "Cost of delay",
            Self::Quality => "Data quality",
            Self::Server => "Start server",
            Self::Quit => "Quit",
        }
    }

    /// The view this entry prints, with default sizes.
    fn command(self) -> Option<ViewCommand> {
        Some(match self {
            Self::Report => ViewCommand::Report,
            Self::Districts => ViewCommand::Districts {
                sort: DistrictMetric::RoadCount,
                direction: SortDirection::Desc,
            },
            Self::Compare => ViewCommand::Compare { limit: None },
            Self::Severity => ViewCommand::Severity,
            Self::RoadTypes => ViewCommand::RoadTypes { limit: None },
            Self::TopCongestion => ViewCommand::Top {
                metric: RankMetric::CongestionIndex,
                n: None,
                direction: SortDirection::Desc,
                name_limit: None,
            },
            Self::Rankings => ViewCommand::Rankings { n: None },
            Self::Commuters => ViewCommand::Commuters {
                n: None,
                name_limit: None,
            },
            Self::Costs => ViewCommand::Costs { limit: None },
            Self::Quality => ViewCommand::Quality,
            Self::Server | Self::Quit => return None,
        })
    }
}

/// Runs the interactive menu until the user quits or starts the server.
///
/// The feed is loaded the first time a view needs it and reused after.
///
/// # Errors
///
/// Returns an error if a prompt fails, JSON output fails, or the server
/// fails to start.
pub async fn run(
    source: &FeedSource,
    config: &ReportConfig,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Texas Congested Roadways");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();
    let mut snapshot: Option<RoadwaySnapshot> = None;

    loop {
        let idx = Select::new()
            .with_prompt("What would you like to see?")
            .items(&labels)
            .default(0)
            .interact()?;

        let tool = Tool::ALL[idx];
        match tool {
            Tool::Quit => break,
            Tool::Server => {
                let loaded = take_or_load(&mut snapshot, source, multi).await?;
                let config = config.clone();
                // The server uses actix-web's runtime, so we need to run it
                // in a blocking task to avoid nesting tokio runtimes.
                tokio::task::spawn_blocking(move || {
                    actix_web::rt::System::new()
                        .block_on(tx_congestion_server::interactive::run(loaded, config))
                })
                .await??;
                break;
            }
            _ => {
                let Some(command) = tool.command() else {
                    continue;
                };
                if snapshot.is_none() {
                    snapshot = Some(crate::load_snapshot(source, multi).await?);
                }
                if let Some(snapshot) = &snapshot {
                    if let Err(e) = crate::show(&command, snapshot, config, false) {
                        log::error!("{e}");
                    }
                }
                println!();
            }
        }
    }

    Ok(())
}

/// Hands over the snapshot the menu already loaded, or loads it from
/// `source` if no view has needed it yet.
async fn take_or_load(
    snapshot: &mut Option<RoadwaySnapshot>,
    source: &FeedSource,
    multi: &MultiProgress,
) -> Result<RoadwaySnapshot, Box<dyn std::error::Error>> {
    match snapshot.take() {
        Some(loaded) => Ok(loaded),
        None => crate::load_snapshot(source, multi).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_view_entry_has_a_command() {
        for tool in Tool::ALL {
            let has_command = tool.command().is_some();
            assert_eq!(has_command, !matches!(tool, Tool::Server | Tool::Quit));
        }
    }

    #[test]
    fn labels_are_unique() {
        let mut labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), Tool::ALL.len());
    }

    const SAVED_FEED: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "id": 1,
            "geometry": null,
            "properties": {
                "RD_NM": "IH 35", "RANK": 1, "TRK_RANK": 2, "DIST_NM": "Austin",
                "DLAY_MILE": 500.0, "TCI": 2.4, "COST_DLAY": 1000000, "TRK_DLY": 10,
                "COST_TRK": 100000, "YR": 2023
            }
        }]
    }"#;

    #[tokio::test]
    async fn server_gets_the_snapshot_from_the_chosen_file() {
        let path = std::env::temp_dir().join("tx_congestion_cli_menu_feed.geojson");
        std::fs::write(&path, SAVED_FEED).unwrap();
        let source = FeedSource::File(path.clone());
        let multi = MultiProgress::new();

        let mut snapshot = None;
        let loaded = take_or_load(&mut snapshot, &source, &multi).await.unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.source, path.display().to_string());
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.records()[0].district, "Austin");
    }

    #[tokio::test]
    async fn server_reuses_the_snapshot_a_view_loaded() {
        let source = FeedSource::File("does/not/exist.geojson".into());
        let multi = MultiProgress::new();

        let mut snapshot = Some(RoadwaySnapshot::new("already loaded", Vec::new(), 0));
        let loaded = take_or_load(&mut snapshot, &source, &multi).await.unwrap();

        assert_eq!(loaded.source, "already loaded");
        assert!(snapshot.is_none());
    }
}
