//! List command - load the feed once and print it.

use anyhow::Result;
use quakefeed_core::FeedOutcome;
use quakefeed_store::SettingsStore;
use tracing::info;

use super::open_session;
use crate::output::{JsonFormatter, TextFormatter};
use crate::session::FeedSession;
use crate::{Cli, ExitCode, OutputFormat};

/// Runs the list command.
pub async fn run(cli: &Cli, store: &SettingsStore) -> Result<()> {
    let mut session = open_session(store, cli).await?;
    let outcome = session.load().await?;

    info!(
        loaded = outcome.is_loaded(),
        rows = session.list().len(),
        "Feed loaded"
    );

    println!("{}", render(&session, &outcome, cli)?);

    if !outcome.is_loaded() {
        std::process::exit(ExitCode::FeedUnavailable as i32);
    }

    Ok(())
}

/// Renders the session's rows and the outcome they came from.
pub fn render(session: &FeedSession, outcome: &FeedOutcome, cli: &Cli) -> Result<String> {
    let list = session.list();

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            let mut lines = vec![
                formatter.format_header(session.params()),
                formatter.format_rows(&list.display_records()),
            ];
            if let Some(status) = formatter.format_status(outcome) {
                lines.push(String::new());
                lines.push(status);
            }
            Ok(lines.join("\n"))
        }
        OutputFormat::Json => {
            let rows: Vec<_> = list
                .events()
                .iter()
                .cloned()
                .zip(list.display_records())
                .collect();
            JsonFormatter::new(cli.pretty).format_feed(session.params(), outcome, &rows)
        }
    }
}
