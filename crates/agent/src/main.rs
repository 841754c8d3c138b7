//! stashway agent entry point.
//!
//! Boots the agent, runs the install/activate transitions, then relays host
//! message envelopes from stdin (one JSON object per line). Logging goes to
//! stderr so stdout stays free for the host transport.

use std::sync::Arc;

use anyhow::Result;
use stashway_agent::{Agent, Envelope};
use stashway_client::{HttpNetwork, Network, NetworkConfig};
use stashway_core::AppConfig;
use tokio::io::AsyncBufReadExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let network: Arc<dyn Network> = Arc::new(HttpNetwork::new(NetworkConfig::from(&config))?);
    let agent = Agent::new(config, network).await?;

    agent.install().await;
    agent.activate().await;

    tracing::info!("stashway agent ready, reading host messages from stdin");

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Envelope>(&line) {
            Ok(envelope) => agent.on_message(envelope).await,
            Err(e) => tracing::warn!(error = %e, "unparseable host message"),
        }
    }

    // Host closed the transport; let background refreshes settle.
    agent.quiesce().await;

    Ok(())
}
