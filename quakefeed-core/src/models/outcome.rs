//! Parser output and typed load outcomes.
//!
//! A load either produced feed text that was parsed ([`FeedOutcome::Loaded`])
//! or it did not ([`FeedOutcome::Unavailable`]). Parsing degrades
//! gracefully: a malformed feature ends the feed at that position, and the
//! stop is recorded in [`ParsedFeed::issue`] so that "the feed has zero
//! events" and "parsing stopped at the first feature" stay distinguishable.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::event::SeismicEvent;

// ============================================================================
// Parse Issue
// ============================================================================

/// Why parsing stopped before the end of the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseIssue {
    /// The document itself was unusable (not JSON, not an object, no
    /// `features` array). No events were produced.
    Document {
        /// Parser error text.
        reason: String,
    },
    /// The feature at `index` was malformed; events before it were kept.
    Feature {
        /// Zero-based position of the malformed feature.
        index: usize,
        /// Parser error text.
        reason: String,
    },
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document { reason } => write!(f, "unusable feed document: {reason}"),
            Self::Feature { index, reason } => {
                write!(f, "malformed feature at position {index}: {reason}")
            }
        }
    }
}

// ============================================================================
// Parsed Feed
// ============================================================================

/// Events parsed from one feed document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParsedFeed {
    /// Successfully parsed events, in feed order.
    pub events: Vec<SeismicEvent>,
    /// Set when parsing stopped early.
    pub issue: Option<ParseIssue>,
}

impl ParsedFeed {
    /// A feed that was parsed to the end.
    pub fn complete(events: Vec<SeismicEvent>) -> Self {
        Self {
            events,
            issue: None,
        }
    }

    /// A feed cut short by `issue`; `events` is the prefix parsed before it.
    pub fn stopped(events: Vec<SeismicEvent>, issue: ParseIssue) -> Self {
        Self {
            events,
            issue: Some(issue),
        }
    }

    /// Returns true if every feature in the document was parsed.
    pub fn is_complete(&self) -> bool {
        self.issue.is_none()
    }

    /// Number of parsed events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if no events were parsed.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

// ============================================================================
// Feed Failure
// ============================================================================

/// Why a load produced no feed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedFailure {
    /// The request URL could not be built or parsed.
    MalformedRequest {
        /// Details.
        detail: String,
    },
    /// Connection error, timeout, or body read failure.
    Network {
        /// Details.
        detail: String,
    },
    /// The provider answered with a status other than 200.
    HttpStatus {
        /// Status code received.
        status: u16,
    },
    /// The provider answered 200 with an empty body.
    EmptyBody,
}

impl FeedFailure {
    /// Returns a short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::MalformedRequest { .. } => "Malformed request",
            Self::Network { .. } => "Network failure",
            Self::HttpStatus { .. } => "Unexpected response",
            Self::EmptyBody => "Empty response",
        }
    }
}

impl fmt::Display for FeedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedRequest { detail } | Self::Network { detail } => {
                write!(f, "{}: {detail}", self.label())
            }
            Self::HttpStatus { status } => write!(f, "{}: HTTP {status}", self.label()),
            Self::EmptyBody => write!(f, "{}", self.label()),
        }
    }
}

// ============================================================================
// Feed Outcome
// ============================================================================

/// Typed result of one fetch + parse operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum FeedOutcome {
    /// Feed text was obtained and parsed (possibly partially, possibly empty).
    Loaded(ParsedFeed),
    /// No feed text was obtained.
    Unavailable(FeedFailure),
}

impl FeedOutcome {
    /// Returns the parsed events, or an empty slice when unavailable.
    pub fn events(&self) -> &[SeismicEvent] {
        match self {
            Self::Loaded(feed) => &feed.events,
            Self::Unavailable(_) => &[],
        }
    }

    /// Returns true if feed text was obtained.
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// Returns true if at least one event is available for display.
    pub fn has_events(&self) -> bool {
        !self.events().is_empty()
    }

    /// Returns the failure reason, if the load produced no text.
    pub fn failure(&self) -> Option<&FeedFailure> {
        match self {
            Self::Loaded(_) => None,
            Self::Unavailable(failure) => Some(failure),
        }
    }

    /// Returns the parse issue, if the feed was cut short.
    pub fn parse_issue(&self) -> Option<&ParseIssue> {
        match self {
            Self::Loaded(feed) => feed.issue.as_ref(),
            Self::Unavailable(_) => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
