//! JSON output formatting.

use anyhow::Result;
use quakefeed_core::{
    DisplayRecord, FeedFailure, FeedOutcome, ParseIssue, QueryParameters, SeismicEvent,
};
use serde::Serialize;

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for one load.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedOutput {
    pub status: &'static str,
    pub query: QueryParameters,
    pub events: Vec<EventOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<ParseIssue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FeedFailure>,
}

/// One displayed row.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventOutput {
    pub magnitude: f64,
    pub magnitude_label: String,
    pub bucket: String,
    pub color: String,
    pub location_offset: String,
    pub primary_location: String,
    pub date: String,
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occurred_at: Option<String>,
    pub url: String,
}

/// Detail link of one row.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkOutput {
    pub row: usize,
    pub url: String,
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats a load outcome with the rows currently on display.
    ///
    /// `rows` pairs each displayed event with its presentation fields; an
    /// unavailable or empty outcome may still carry the previous rows.
    pub fn format_feed(
        &self,
        query: &QueryParameters,
        outcome: &FeedOutcome,
        rows: &[(SeismicEvent, DisplayRecord)],
    ) -> Result<String> {
        let output = FeedOutput {
            status: if outcome.is_loaded() { "loaded" } else { "unavailable" },
            query: query.clone(),
            events: rows
                .iter()
                .map(|(event, record)| Self::event_to_output(event, record))
                .collect(),
            issue: outcome.parse_issue().cloned(),
            failure: outcome.failure().cloned(),
        };
        self.format(&output)
    }

    /// Converts an event and its display record to output.
    fn event_to_output(event: &SeismicEvent, record: &DisplayRecord) -> EventOutput {
        EventOutput {
            magnitude: event.magnitude,
            magnitude_label: record.magnitude_label.clone(),
            bucket: record.color_bucket.label().to_string(),
            color: record.color().hex(),
            location_offset: record.location_offset_phrase.clone(),
            primary_location: record.primary_location.clone(),
            date: record.date_label.clone(),
            time: record.time_label.clone(),
            occurred_at: event.occurred_at().map(|dt| dt.to_rfc3339()),
            url: event.detail_url.clone(),
        }
    }
}
