// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! QuakeFeed CLI - recent earthquakes from the USGS feed.
//!
//! # Examples
//!
//! ```bash
//! # List the strongest recent earthquakes (magnitude 6 to 10)
//! quakefeed
//!
//! # Smaller events, newest first
//! quakefeed --min-magnitude 2.5 --order-by time
//!
//! # JSON output
//! quakefeed --format json --pretty
//!
//! # Print the detail link of the second row
//! quakefeed open 2
//!
//! # Watch mode
//! quakefeed watch --interval 60
//!
//! # Persist a preference
//! quakefeed config set min_magnitude 4.5
//! ```

mod commands;
mod output;
mod session;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use quakefeed_store::{LogLevel, SettingsStore};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{config, list, open, watch};

// ============================================================================
// CLI Definition
// ============================================================================

/// QuakeFeed CLI - recent earthquakes from the command line.
#[derive(Parser)]
#[command(name = "quakefeed")]
#[command(about = "Recent earthquake reports from the USGS feed")]
#[command(long_about = r#"
QuakeFeed fetches recent earthquake reports from the USGS event service
and lists them with magnitude, location and local time.

Query values come from the settings file and can be overridden per run:
  order_by        magnitude | time
  min_magnitude   lower magnitude bound (default 6)
  max_magnitude   upper magnitude bound (default 10)

Examples:
  quakefeed                          # Strongest recent events
  quakefeed --order-by time          # Newest first
  quakefeed open 1                   # Detail link of the first row
  quakefeed watch                    # Refresh periodically
  quakefeed --format json            # JSON output
"#)]
#[command(version)]
#[command(author = "QuakeFeed Contributors")]
pub struct Cli {
    /// Subcommand to run. If none, runs 'list' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Lower magnitude bound for this run.
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub min_magnitude: Option<String>,

    /// Upper magnitude bound for this run.
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub max_magnitude: Option<String>,

    /// Feed ordering for this run (magnitude or time).
    #[arg(long, global = true)]
    pub order_by: Option<String>,

    /// Query endpoint for this run.
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Settings file to use instead of the default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// List recent earthquakes (default if no command specified).
    #[command(visible_alias = "l")]
    List,

    /// Reload the feed periodically.
    #[command(visible_alias = "w")]
    Watch(watch::WatchArgs),

    /// Print the detail link of a listed event.
    #[command(visible_alias = "o")]
    Open(open::OpenArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    #[allow(dead_code)]
    Success = 0,
    /// General error.
    Error = 1,
    /// The feed could not be fetched.
    FeedUnavailable = 2,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool, level: LogLevel) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("quakefeed=debug")
    } else {
        EnvFilter::new(format!("quakefeed={level}"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let store = match &cli.config {
        Some(path) => SettingsStore::load(path.clone()).await,
        None => SettingsStore::load_default().await,
    };

    setup_logging(cli.verbose, cli.quiet, store.get().await.log_level);

    let result = match &cli.command {
        Some(Commands::List) | None => list::run(&cli, &store).await,
        Some(Commands::Watch(args)) => watch::run(args, &cli, &store).await,
        Some(Commands::Open(args)) => open::run(args, &cli, &store).await,
        Some(Commands::Config(args)) => config::run(args, &cli, &store).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(ExitCode::Error as i32);
    }

    Ok(())
}
