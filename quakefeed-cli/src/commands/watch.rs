//! Watch command - reload the feed periodically.

use anyhow::Result;
use clap::Args;
use quakefeed_store::{Settings, SettingsStore};
use std::io::{Write, stdout};
use tokio::sync::watch;
use tokio::time::{Duration, Instant, Interval, MissedTickBehavior, interval, interval_at};
use tracing::{info, warn};

use super::{list, resolve_settings, session_for};
use crate::{Cli, OutputFormat};

/// Shortest allowed refresh interval in seconds.
const MIN_INTERVAL_SECS: u64 = 10;

/// Arguments for watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// Refresh interval in seconds (defaults to the configured interval).
    #[arg(long, short)]
    pub interval: Option<u64>,
}

/// Runs the watch command.
///
/// The settings file is re-read before every refresh; edits made with
/// `config set` from another shell take effect on the next tick.
pub async fn run(args: &WatchArgs, cli: &Cli, store: &SettingsStore) -> Result<()> {
    let mut changes = store.subscribe();
    let mut settings = resolve_settings(store, cli).await?;
    let mut period = refresh_period(args.interval, &settings);

    info!(interval = period.as_secs(), "Starting watch mode");

    let mut session = session_for(&settings)?;
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        let outcome = tokio::select! {
            outcome = async {
                ticker.tick().await;
                if let Some(changed) = changed_settings(store, cli, &mut changes).await? {
                    info!("Settings changed, rebuilding query");
                    session = session_for(&changed)?;
                    settings = changed;
                }
                session.reload().await
            } => outcome?,
            _ = &mut shutdown => {
                info!("Watch mode stopped");
                return Ok(());
            }
        };
        if let Some(failure) = outcome.failure() {
            warn!(error = %failure, "Feed refresh failed");
        }

        let next_period = refresh_period(args.interval, &settings);
        if next_period != period {
            info!(interval = next_period.as_secs(), "Refresh interval changed");
            period = next_period;
            ticker = delayed_interval(period);
        }

        let rendered = list::render(&session, &outcome, cli)?;

        match cli.format {
            OutputFormat::Text => {
                // Clear screen
                print!("\x1b[2J\x1b[H");
                stdout().flush()?;

                let now = chrono::Local::now();
                println!(
                    "QuakeFeed Watch Mode - {} (refresh: {}s)",
                    now.format("%H:%M:%S"),
                    period.as_secs()
                );
                println!();
                println!("{rendered}");
                println!();
                println!("Press Ctrl+C to exit");
            }
            // One document per refresh.
            OutputFormat::Json => println!("{rendered}"),
        }
    }
}

/// Interval between refreshes: the flag if given, else the setting, never
/// below [`MIN_INTERVAL_SECS`].
fn refresh_period(flag: Option<u64>, settings: &Settings) -> Duration {
    let min = Duration::from_secs(MIN_INTERVAL_SECS);
    flag.map_or_else(|| settings.refresh_interval(), Duration::from_secs).max(min)
}

/// Ticker whose first tick is one full period away.
fn delayed_interval(period: Duration) -> Interval {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Re-reads the settings file and returns the resolved settings if they
/// changed since the last call.
async fn changed_settings(
    store: &SettingsStore,
    cli: &Cli,
    changes: &mut watch::Receiver<u64>,
) -> Result<Option<Settings>> {
    store.reload().await;
    if !changes.has_changed()? {
        return Ok(None);
    }
    changes.borrow_and_update();
    Ok(Some(resolve_settings(store, cli).await?))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use quakefeed_core::OrderBy;
    use tempfile::TempDir;

    #[test]
    fn test_refresh_period_prefers_flag_and_clamps() {
        let mut settings = Settings::default();
        assert_eq!(refresh_period(None, &settings), Duration::from_secs(300));
        assert_eq!(refresh_period(Some(45), &settings), Duration::from_secs(45));
        assert_eq!(refresh_period(Some(1), &settings), Duration::from_secs(10));

        settings.refresh_interval_secs = 3;
        assert_eq!(refresh_period(None, &settings), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_changed_settings_follows_file_and_keeps_flags() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        let store = SettingsStore::load(path.clone()).await;
        let mut changes = store.subscribe();
        let cli = Cli::parse_from(["quakefeed", "--order-by", "time"]);

        assert!(changed_settings(&store, &cli, &mut changes).await.unwrap().is_none());

        let editor = SettingsStore::load(path).await;
        editor.set_value("min_magnitude", "5").await.unwrap();
        editor.set_value("refresh_interval_secs", "30").await.unwrap();
        editor.save().await.unwrap();

        let settings = changed_settings(&store, &cli, &mut changes)
            .await
            .unwrap()
            .expect("file edit is picked up");
        assert_eq!(settings.min_magnitude, "5");
        assert_eq!(settings.order_by, OrderBy::Time);
        assert_eq!(refresh_period(None, &settings), Duration::from_secs(30));

        assert!(changed_settings(&store, &cli, &mut changes).await.unwrap().is_none());
    }
}
