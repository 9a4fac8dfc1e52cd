//! Text output formatting with magnitude colors.

use quakefeed_core::{DisplayRecord, FeedOutcome, MagnitudeColor, QueryParameters};
use quakefeed_store::Settings;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";

/// Width of the location column.
const LOCATION_WIDTH: usize = 34;

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Formats the list header for a query.
    pub fn format_header(&self, params: &QueryParameters) -> String {
        format!(
            "{}\n{}",
            self.bold(&format!(
                "Earthquakes M{} to M{} (ordered by {})",
                params.min_magnitude, params.max_magnitude, params.order_by
            )),
            "─".repeat(60)
        )
    }

    /// Formats every row, or a message when there is nothing to show.
    pub fn format_rows(&self, rows: &[DisplayRecord]) -> String {
        if rows.is_empty() {
            return self.dim("No earthquakes found.");
        }

        rows.iter()
            .enumerate()
            .map(|(index, row)| self.format_row(index + 1, row))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Formats one row: position, magnitude, location and local time.
    pub fn format_row(&self, position: usize, row: &DisplayRecord) -> String {
        let location = format!(
            "{} {}",
            row.location_offset_phrase,
            row.primary_location.trim_start()
        );

        format!(
            "{:>3}  {}  {:<width$}  {} {}",
            position,
            self.magnitude(&format!("{:>5}", row.magnitude_label), row.color()),
            location,
            row.date_label,
            self.dim(&row.time_label),
            width = LOCATION_WIDTH,
        )
    }

    /// Formats notes about the outcome: failures and cut-short feeds.
    ///
    /// Returns `None` for a complete feed.
    pub fn format_status(&self, outcome: &FeedOutcome) -> Option<String> {
        if let Some(failure) = outcome.failure() {
            return Some(self.red(&format!("Feed unavailable: {failure}")));
        }
        outcome
            .parse_issue()
            .map(|issue| self.yellow(&format!("Feed cut short ({issue})")))
    }

    /// Formats settings as key/value lines.
    pub fn format_settings(&self, settings: &Settings) -> String {
        settings
            .entries()
            .into_iter()
            .map(|(key, value)| format!("{:<24}{}", format!("{key}:"), value))
            .collect::<Vec<_>>()
            .join("\n")
    }

    // ========================================================================
    // Color helpers
    // ========================================================================

    fn magnitude(&self, text: &str, color: MagnitudeColor) -> String {
        if self.use_colors {
            format!(
                "{BOLD}\x1b[38;2;{};{};{}m{text}{RESET}",
                color.red, color.green, color.blue
            )
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}
