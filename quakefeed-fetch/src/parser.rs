//! GeoJSON feed parser.
//!
//! Converts a feature collection into [`SeismicEvent`]s, reading
//! `features[*].properties.{mag, place, time, url}`. Parsing is fail-soft:
//! the first malformed feature ends the feed, and everything before it is
//! kept.

use quakefeed_core::{ParseIssue, ParsedFeed, SeismicEvent};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Properties {
    mag: f64,
    place: String,
    time: i64,
    url: String,
}

impl From<Properties> for SeismicEvent {
    fn from(props: Properties) -> Self {
        SeismicEvent::new(props.mag, props.place, props.time, props.url)
    }
}

// ============================================================================
// Parser
// ============================================================================

/// Parses feed text into events.
///
/// Returns `None` when there is no text to parse (absent, empty, or only
/// whitespace). Otherwise returns the events parsed in feed order; if a
/// feature is malformed, the result holds only the features before it and
/// records the position in [`ParsedFeed::issue`].
pub fn parse_feed(text: Option<&str>) -> Option<ParsedFeed> {
    let text = text?.trim();
    if text.is_empty() {
        debug!("No feed text to parse");
        return None;
    }

    let collection: FeatureCollection = match serde_json::from_str(text) {
        Ok(collection) => collection,
        Err(e) => {
            warn!(error = %e, "Feed document is not a feature collection");
            return Some(ParsedFeed::stopped(
                Vec::new(),
                ParseIssue::Document {
                    reason: e.to_string(),
                },
            ));
        }
    };

    let total = collection.features.len();
    let mut events = Vec::with_capacity(total);

    for (index, raw) in collection.features.into_iter().enumerate() {
        match serde_json::from_value::<Feature>(raw) {
            Ok(feature) => events.push(feature.properties.into()),
            Err(e) => {
                warn!(
                    index,
                    total,
                    kept = events.len(),
                    error = %e,
                    "Malformed feature, stopping"
                );
                return Some(ParsedFeed::stopped(
                    events,
                    ParseIssue::Feature {
                        index,
                        reason: e.to_string(),
                    },
                ));
            }
        }
    }

    debug!(count = events.len(), "Parsed feed");
    Some(ParsedFeed::complete(events))
}

// ============================================================================
// Tests
// ============================================================================
