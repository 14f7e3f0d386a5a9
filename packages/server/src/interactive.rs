//! Interactive mode for the server.
//!
//! Serves a snapshot the caller already loaded, prompting only for the
//! bind address and port.

use dialoguer::{Confirm, Input};
use tx_congestion_analytics_models::ReportConfig;
use tx_congestion_roadway_models::RoadwaySnapshot;

use crate::bind_config_from_env;

/// Prompts for the bind address and port, then serves `snapshot`.
///
/// Prompt defaults come from `BIND_ADDR` and `PORT`. Nothing is written back
/// to the environment.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
pub async fn run(snapshot: RoadwaySnapshot, config: ReportConfig) -> std::io::Result<()> {
    println!("Texas Congestion Server");
    println!(
        "Serving {} roadways from {}",
        snapshot.len(),
        snapshot.source
    );
    println!();

    let (default_bind, default_port) = bind_config_from_env();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default(default_bind.clone())
        .interact_text()
        .unwrap_or(default_bind);

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(default_port)
        .interact_text()
        .unwrap_or(default_port);

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::serve(snapshot, config, bind_addr, port).await
}
