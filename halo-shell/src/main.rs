// Halo Shell core process entry point

use std::sync::Arc;

use anyhow::{Context, Result};
use halo_core::config::ConfigLoader;
use halo_domain::{MatugenExtractor, NotifySendNotifier};
use tracing::info;

use halo_shell::{LoggingDaemon, Shell};

#[tokio::main]
async fn main() -> Result<()> {
    halo_core::init_minimal_logging();

    let config = ConfigLoader::load().context("Failed to load configuration")?;
    halo_core::init_logging(&config.logging, true).context("Failed to initialize logging")?;
    info!("Starting Halo Shell core...");

    let extractor = Arc::new(MatugenExtractor::new(config.theming.extractor_binary.clone()));
    let shell = Shell::build(&config, extractor, Arc::new(LoggingDaemon), &NotifySendNotifier).await?;
    info!("Halo Shell core running; press Ctrl-C to exit.");

    tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl-C")?;
    info!("Shutdown requested.");
    shell.shutdown().await;
    info!("Halo Shell core shutting down.");
    Ok(())
}
