//! Seismic event records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One reported earthquake, as delivered by the feed.
///
/// Values are copied verbatim from the feed: no unit conversion and no
/// rounding. The magnitude may be zero or negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeismicEvent {
    /// Reported magnitude.
    pub magnitude: f64,
    /// Location text as reported (e.g. `"5km SW of Example City"`).
    pub raw_location: String,
    /// Origin time in milliseconds since the Unix epoch.
    pub occurred_at_epoch_millis: i64,
    /// Link to the provider's detail page for this event.
    pub detail_url: String,
}

impl SeismicEvent {
    /// Creates a new event.
    pub fn new(
        magnitude: f64,
        raw_location: impl Into<String>,
        occurred_at_epoch_millis: i64,
        detail_url: impl Into<String>,
    ) -> Self {
        Self {
            magnitude,
            raw_location: raw_location.into(),
            occurred_at_epoch_millis,
            detail_url: detail_url.into(),
        }
    }

    /// Returns the origin time as a UTC timestamp.
    ///
    /// `None` when the millisecond value is outside chrono's range.
    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.occurred_at_epoch_millis)
    }
}

/// The full ordered set of events currently on display, feed order preserved.
pub type FeedSnapshot = Vec<SeismicEvent>;
