//! Open command - print the detail link of one listed event.

use anyhow::{Result, bail};
use clap::Args;
use quakefeed_store::SettingsStore;
use tracing::info;

use super::open_session;
use crate::output::{JsonFormatter, LinkOutput};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the open command.
#[derive(Args)]
pub struct OpenArgs {
    /// Row number as shown by `list` (starting at 1).
    pub row: usize,
}

/// Runs the open command.
pub async fn run(args: &OpenArgs, cli: &Cli, store: &SettingsStore) -> Result<()> {
    let mut session = open_session(store, cli).await?;
    let outcome = session.load().await?;

    if let Some(failure) = outcome.failure() {
        if !cli.quiet {
            eprintln!("Error: {failure}");
        }
        std::process::exit(ExitCode::FeedUnavailable as i32);
    }

    let list = session.list_mut();
    let rows = list.len();
    list.set_on_activate(|event| {
        info!(
            magnitude = event.magnitude,
            location = %event.raw_location,
            "Event activated"
        );
    });

    let Some(url) = args.row.checked_sub(1).and_then(|index| list.activate(index)) else {
        bail!("No row {} (the feed has {} rows)", args.row, rows);
    };

    match cli.format {
        OutputFormat::Text => println!("{url}"),
        OutputFormat::Json => {
            let output = LinkOutput { row: args.row, url };
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }

    Ok(())
}
