//! Feed pipeline: query building, retrieval and parsing.
//!
//! One pipeline run builds the request URL, fetches the text through a
//! [`FeedSource`], and parses it. Every run ends in a [`FeedOutcome`]; no
//! failure escapes as an error.

use quakefeed_core::{FeedFailure, FeedOutcome, QueryParameters, USGS_QUERY_ENDPOINT};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::error::FetchError;
use crate::host::http::HttpClient;
use crate::parser::parse_feed;
use crate::query::build_query_url;
use crate::source::FeedSource;

// ============================================================================
// Feed Run
// ============================================================================

/// Record of one pipeline run.
#[derive(Debug, Clone)]
pub struct FeedRun {
    /// The request URL, if it could be built.
    pub url: Option<Url>,
    /// The typed outcome.
    pub outcome: FeedOutcome,
    /// How long the run took.
    pub duration: Duration,
}

impl FeedRun {
    /// Returns true if at least one event was loaded.
    pub fn has_events(&self) -> bool {
        self.outcome.has_events()
    }
}

// ============================================================================
// Feed Pipeline
// ============================================================================

/// Builds, fetches and parses the event feed.
#[derive(Clone)]
pub struct FeedPipeline {
    source: Arc<dyn FeedSource>,
    endpoint: String,
}

impl FeedPipeline {
    /// Creates a pipeline over `source` using the USGS endpoint.
    pub fn new(source: Arc<dyn FeedSource>) -> Self {
        Self::with_endpoint(source, USGS_QUERY_ENDPOINT)
    }

    /// Creates a pipeline over `source` using a custom base endpoint.
    pub fn with_endpoint(source: Arc<dyn FeedSource>, endpoint: impl Into<String>) -> Self {
        Self {
            source,
            endpoint: endpoint.into(),
        }
    }

    /// Creates a pipeline backed by a default [`HttpClient`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn http(endpoint: impl Into<String>) -> Result<Self, FetchError> {
        Ok(Self::with_endpoint(Arc::new(HttpClient::new()?), endpoint))
    }

    /// Returns the base endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Runs the pipeline and returns only the outcome.
    pub async fn load(&self, params: &QueryParameters) -> FeedOutcome {
        self.run(params).await.outcome
    }

    /// Runs the pipeline once.
    #[instrument(skip(self, params), fields(source = self.source.id(), order_by = %params.order_by))]
    pub async fn run(&self, params: &QueryParameters) -> FeedRun {
        let start = Instant::now();

        let url = match build_query_url(&self.endpoint, params) {
            Ok(url) => url,
            Err(error) => {
                warn!(error = %error, endpoint = %self.endpoint, "Cannot build request");
                return FeedRun {
                    url: None,
                    outcome: FeedOutcome::Unavailable(error.to_failure()),
                    duration: start.elapsed(),
                };
            }
        };

        let outcome = match self.source.fetch_text(&url).await {
            Ok(text) => match parse_feed(Some(&text)) {
                Some(feed) => {
                    info!(
                        events = feed.len(),
                        complete = feed.is_complete(),
                        "Feed loaded"
                    );
                    FeedOutcome::Loaded(feed)
                }
                None => {
                    warn!("Feed response was empty");
                    FeedOutcome::Unavailable(FeedFailure::EmptyBody)
                }
            },
            Err(error) => {
                warn!(error = %error, "Feed unavailable");
                FeedOutcome::Unavailable(error.to_failure())
            }
        };

        let duration = start.elapsed();
        debug!(duration = ?duration, "Pipeline finished");

        FeedRun {
            url: Some(url),
            outcome,
            duration,
        }
    }
}

impl std::fmt::Debug for FeedPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedPipeline")
            .field("source", &self.source.id())
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
