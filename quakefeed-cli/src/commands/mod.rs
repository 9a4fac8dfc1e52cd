//! CLI command implementations.

pub mod config;
pub mod list;
pub mod open;
pub mod watch;

use anyhow::{Context, Result};
use quakefeed_core::config::{ENDPOINT_KEY, MAX_MAGNITUDE_KEY, MIN_MAGNITUDE_KEY, ORDER_BY_KEY};
use quakefeed_fetch::FeedPipeline;
use quakefeed_store::{Settings, SettingsStore};
use tracing::debug;

use crate::Cli;
use crate::session::FeedSession;

/// Returns the stored settings with this run's flag overrides applied.
///
/// Overrides are validated like `config set` but never saved.
pub async fn resolve_settings(store: &SettingsStore, cli: &Cli) -> Result<Settings> {
    let mut settings = store.get().await;

    let overrides = [
        (ORDER_BY_KEY, cli.order_by.as_deref()),
        (MIN_MAGNITUDE_KEY, cli.min_magnitude.as_deref()),
        (MAX_MAGNITUDE_KEY, cli.max_magnitude.as_deref()),
        (ENDPOINT_KEY, cli.endpoint.as_deref()),
    ];
    for (key, value) in overrides {
        if let Some(value) = value {
            debug!(key, value, "Flag override");
            settings.set_value(key, value)?;
        }
    }

    Ok(settings)
}

/// Opens a feed session for the resolved settings.
pub async fn open_session(store: &SettingsStore, cli: &Cli) -> Result<FeedSession> {
    let settings = resolve_settings(store, cli).await?;
    session_for(&settings)
}

/// Opens a feed session for already resolved settings.
pub fn session_for(settings: &Settings) -> Result<FeedSession> {
    let pipeline = FeedPipeline::http(settings.endpoint.clone())
        .context("Failed to create HTTP client")?;
    Ok(FeedSession::new(pipeline, settings.query_parameters()))
}

// ============================================================================
// Tests
// ============================================================================
