use serde::Deserialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bus_board::feed::{FeedClient, FeedConfig};
use bus_board::poller::{StopConfig, StopRegistry};

/// The stop list loaded from the host configuration file.
#[derive(Debug, Deserialize)]
struct BoardConfig {
    stops: Vec<StopConfig>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "bus_board=info".into()),
        )
        .init();

    // Stand-in for the host collaborator: a JSON stop list on disk
    let config_path =
        std::env::var("BUS_BOARD_CONFIG").unwrap_or_else(|_| "stops.json".to_string());
    let raw = std::fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("failed to read stop configuration {config_path}: {e}"));
    let board: BoardConfig = serde_json::from_str(&raw)
        .unwrap_or_else(|e| panic!("invalid stop configuration {config_path}: {e}"));

    let mut feed_config = FeedConfig::new();
    if let Ok(url) = std::env::var("BUS_BOARD_FEED_URL") {
        feed_config = feed_config.with_base_url(url);
    }
    let client = FeedClient::new(feed_config).expect("failed to create feed client");

    let (registry, mut updates) = StopRegistry::new(client);
    for stop in board.stops {
        registry.register_stop(stop);
    }
    info!(stops = registry.len(), "bus board running");

    loop {
        tokio::select! {
            update = updates.recv() => {
                let Some(update) = update else { break };
                // the log line is the display transport here; a real
                // host would forward the payload to its renderer
                match serde_json::to_string(&update) {
                    Ok(json) => info!(stop = %update.stop_id(), update = %json, "stop update"),
                    Err(e) => error!(error = %e, "failed to encode update"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down, suspending pollers");
                registry.suspend_all();
                break;
            }
        }
    }
}
