//! BloomSky weather station readings exposed as individually polled sensors.

pub mod client;
pub mod config;
pub mod host;
pub mod models;
pub mod platform;
pub mod sensors;

use crate::client::{DataProvider, SnapshotClient};
use crate::config::AppConfig;
use crate::host::EntityRegistry;
use crate::platform::setup_platform;
use anyhow::Context;
use log::{debug, error, info};
use std::sync::Arc;
use std::time::Duration;

pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    info!("Starting application");

    tokio::select! {
        result = main_loop(&config) => {
            match result {
                Ok(_) => info!("Application completed successfully"),
                Err(e) => {
                    error!("Application error: {e:#}");
                    // Print chain of error causes
                    for cause in e.chain().skip(1) {
                        error!("Caused by: {cause}");
                    }
                    return Err(e).context("Application failed to run");
                }
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, shutting down");
        }
    }

    Ok(())
}

async fn main_loop(config: &AppConfig) -> anyhow::Result<()> {
    let platform = config
        .sensor
        .validate()
        .context("Invalid sensor configuration")?;

    debug!("Setting up BloomSky client");
    let client = SnapshotClient::new(
        &config.bloomsky.devices_file,
        config.bloomsky.is_metric,
        Duration::from_secs(config.bloomsky.min_refresh_secs),
    )
    .context("Failed to set up BloomSky client")?;
    let provider: Arc<dyn DataProvider> = Arc::new(client);

    let mut registry = EntityRegistry::new();
    setup_platform(
        &platform,
        provider,
        |entities, update_before_add| registry.add_entities(entities, update_before_add),
        None,
    );
    if registry.is_empty() {
        info!("No sensors to poll");
        return Ok(());
    }

    let scan_interval = Duration::from_secs(config.polling.scan_interval.max(1));
    let mut interval = tokio::time::interval(scan_interval);
    // The first tick fires at once, entities were already updated when added
    interval.tick().await;
    loop {
        interval.tick().await; // Wait for the next tick

        let summary = registry.poll();
        debug!(
            "Poll finished: {} updated, {} failed",
            summary.updated, summary.failed
        );

        for snapshot in registry.snapshots() {
            info!("{}", snapshot);
        }
    }
}
