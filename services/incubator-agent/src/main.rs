//! hatchery incubator agent
//!
//! Runs reconciliation passes against the inventory service on a fixed
//! interval until Ctrl-C.

use std::sync::Arc;

use anyhow::Result;
use hatchery_incubator::client::InventoryClient;
use hatchery_incubator::config::Config;
use hatchery_incubator::reconciler::Reconciler;
use hatchery_incubator::sink::TracingSink;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str())),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Starting hatchery incubator agent");
    info!(
        profile_dir = %config.profile_dir.display(),
        inventory_url = %config.inventory_url,
        min_incubator_km = config.min_incubator_km,
        "Configuration loaded"
    );

    // Create shutdown channel
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let client = Arc::new(InventoryClient::new(&config)?);
    let reconciler = Reconciler::new(
        client.clone(),
        client,
        Arc::new(TracingSink),
        config.usage_store(),
        config.allocation_policy(),
        config.reconciler_config(),
    );

    let mut reconciler_handle = tokio::spawn({
        let shutdown_rx = shutdown_rx.clone();
        async move {
            reconciler.run(shutdown_rx).await;
        }
    });

    // Wait for shutdown signal
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
            let _ = shutdown_tx.send(true);
            let _ = (&mut reconciler_handle).await;
        }
        _ = &mut reconciler_handle => {
            info!("Reconciler exited");
        }
    }

    info!("Incubator agent shutdown complete");
    Ok(())
}
