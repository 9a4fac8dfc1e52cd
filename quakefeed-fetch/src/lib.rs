// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # QuakeFeed Fetch
//!
//! Query building, HTTP retrieval and GeoJSON parsing for the seismic event
//! feed.
//!
//! ## Host APIs
//!
//! - [`host::http`] - HTTP client with fixed connect/read timeouts
//!
//! ## Feed Pipeline
//!
//! - [`query::build_query_url`] - Request URL from query parameters
//! - [`source::FeedSource`] - Trait for raw feed retrieval
//! - [`parser::parse_feed`] - Fail-soft feature collection parser
//! - [`pipeline::FeedPipeline`] - Build, fetch and parse in one run
//!
//! ## Example
//!
//! ```ignore
//! use quakefeed_core::QueryParameters;
//! use quakefeed_fetch::FeedPipeline;
//!
//! let pipeline = FeedPipeline::http(quakefeed_core::USGS_QUERY_ENDPOINT)?;
//! let outcome = pipeline.load(&QueryParameters::default()).await;
//! ```

pub mod error;
pub mod host;
pub mod parser;
pub mod pipeline;
pub mod query;
pub mod source;

// Re-export key types at crate root

pub use error::FetchError;
pub use host::{HttpClient, HttpClientBuilder};
pub use parser::parse_feed;
pub use pipeline::{FeedPipeline, FeedRun};
pub use query::build_query_url;
pub use source::FeedSource;
