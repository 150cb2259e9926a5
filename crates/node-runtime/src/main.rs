//! # Quorum-Ledger Node
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry (logs, metrics)
//! 2. Load configuration from `QL_*` environment variables
//! 3. Load or create the wallet key, open ledgers, seed genesis
//! 4. Bind the peer listener and join the network
//! 5. Run until Ctrl+C

use anyhow::{Context, Result};
use tracing::info;

use node_runtime::{load_config, NodeRuntime};
use quorum_telemetry::{init_telemetry, TelemetryConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry = init_telemetry(TelemetryConfig::from_env())
        .context("Failed to initialize telemetry")?;

    let config = load_config().context("Invalid configuration")?;

    let runtime = NodeRuntime::new(config)?;
    runtime.start().await?;

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    runtime.shutdown().await;
    Ok(())
}
