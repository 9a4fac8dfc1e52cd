//! Domain models for `QuakeFeed`.
//!
//! ## Submodules
//!
//! - [`event`] - Seismic events and the feed snapshot
//! - [`query`] - Query parameters and feed ordering
//! - [`outcome`] - Parser output and typed load outcomes

mod event;
mod outcome;
mod query;

// Re-export everything at the models level
pub use event::{FeedSnapshot, SeismicEvent};
pub use outcome::{FeedFailure, FeedOutcome, ParseIssue, ParsedFeed};
pub use query::{
    DEFAULT_MAX_MAGNITUDE, DEFAULT_MIN_MAGNITUDE, FEED_FORMAT, FEED_LIMIT, OrderBy,
    QueryParameters, USGS_QUERY_ENDPOINT,
};
