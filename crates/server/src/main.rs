//! Demo harness for the recommendation workflow.
//!
//! Runs one hard-coded shopping query end to end against the real services
//! and prints the final state as pretty JSON.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use server::{Config, ShopOrchestrator};

const DEMO_QUERY: &str = "best smartphones under $1000";
const DEMO_EMAIL: &str = "shopgenie.demo@example.com";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting ShopGenie demo");

    let config = Config::from_env().context("Failed to load configuration")?;
    let orchestrator = ShopOrchestrator::from_config(&config)?;

    info!("Requesting recommendation for {:?}", DEMO_QUERY);
    let state = orchestrator.run(DEMO_QUERY, DEMO_EMAIL).await;

    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}
