// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `QuakeFeed` Core
//!
//! Core types, models, and presentation logic for the `QuakeFeed` workspace.
//!
//! This crate provides the foundational abstractions used across all other
//! `QuakeFeed` crates, including:
//!
//! - Domain models (seismic events, query parameters, load outcomes)
//! - Error types
//! - The opaque key-value configuration seam
//! - The pure presenter that turns an event into display fields
//!
//! ## Key Types
//!
//! ### Events
//! - [`SeismicEvent`] - One reported earthquake
//! - [`FeedSnapshot`] - Ordered events currently on display
//!
//! ### Queries
//! - [`QueryParameters`] - Values the request URL is built from
//! - [`OrderBy`] - Feed ordering
//!
//! ### Outcomes
//! - [`FeedOutcome`] - Typed result of one load
//! - [`ParsedFeed`] - Parser output with its early-stop issue, if any
//! - [`FeedFailure`] - Why no feed text was obtained
//!
//! ### Presentation
//! - [`DisplayRecord`] - Derived, per-render display fields
//! - [`MagnitudeBucket`] - Magnitude color category

pub mod config;
pub mod error;
pub mod models;
pub mod presenter;

// Re-export error types
pub use error::CoreError;

// Re-export configuration seam
pub use config::ConfigSource;

// Re-export all model types
pub use models::{
    // Events
    FeedSnapshot,
    SeismicEvent,
    // Queries
    DEFAULT_MAX_MAGNITUDE,
    DEFAULT_MIN_MAGNITUDE,
    FEED_FORMAT,
    FEED_LIMIT,
    OrderBy,
    QueryParameters,
    USGS_QUERY_ENDPOINT,
    // Outcomes
    FeedFailure,
    FeedOutcome,
    ParseIssue,
    ParsedFeed,
};

// Re-export presenter
pub use presenter::{DisplayRecord, MagnitudeBucket, MagnitudeColor, present, present_in};
