//! HTTP client for the feed provider.
//!
//! Wraps a `reqwest` client with the fixed connect and read timeouts and
//! request tracing. Every exit path drops the response, which releases the
//! connection and body stream.

use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::FetchError;

/// Connection establishment timeout.
pub const CONNECT_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Timeout for reading the response.
pub const READ_TIMEOUT: Duration = Duration::from_millis(10_000);

/// User agent string for QuakeFeed.
const USER_AGENT: &str = concat!("QuakeFeed/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client wrapper with fixed timeouts and tracing.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    /// Creates a client with the default timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self, FetchError> {
        Self::builder().build()
    }

    /// Returns a builder for custom timeouts.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Performs one GET and returns the body as text.
    ///
    /// Only status 200 yields a body. Invalid UTF-8 sequences are replaced
    /// rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::HttpStatus`] for any other status and
    /// [`FetchError::Http`] for connection, timeout, or read failures.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get_text(&self, url: &Url) -> Result<String, FetchError> {
        debug!("GET request");

        let response = self.inner.get(url.clone()).send().await.map_err(|e| {
            warn!(error = %e, "Request failed");
            FetchError::Http(e)
        })?;

        let status = response.status();
        debug!(status = %status, "Response received");

        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "Unexpected response status");
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let bytes = response.bytes().await.map_err(|e| {
            warn!(error = %e, "Failed to read response body");
            FetchError::Http(e)
        })?;

        debug!(bytes = bytes.len(), "Body read");
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`HttpClient`].
#[derive(Debug, Clone)]
pub struct HttpClientBuilder {
    connect_timeout: Duration,
    read_timeout: Duration,
    use_system_proxy: bool,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            connect_timeout: CONNECT_TIMEOUT,
            read_timeout: READ_TIMEOUT,
            use_system_proxy: true,
        }
    }
}

impl HttpClientBuilder {
    /// Sets the connect timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the read timeout.
    #[must_use]
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Ignores proxy environment variables.
    #[must_use]
    pub fn no_proxy(mut self) -> Self {
        self.use_system_proxy = false;
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn build(self) -> Result<HttpClient, FetchError> {
        let mut builder = Client::builder()
            .connect_timeout(self.connect_timeout)
            .read_timeout(self.read_timeout)
            .user_agent(USER_AGENT);

        if !self.use_system_proxy {
            builder = builder.no_proxy();
        }

        Ok(HttpClient {
            inner: builder.build()?,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeouts() {
        let builder = HttpClientBuilder::default();
        assert_eq!(builder.connect_timeout, Duration::from_secs(15));
        assert_eq!(builder.read_timeout, Duration::from_secs(10));
        assert!(builder.use_system_proxy);
    }

    #[test]
    fn test_builder_overrides() {
        let builder = HttpClient::builder()
            .connect_timeout(Duration::from_millis(50))
            .read_timeout(Duration::from_millis(75))
            .no_proxy();
        assert_eq!(builder.connect_timeout, Duration::from_millis(50));
        assert_eq!(builder.read_timeout, Duration::from_millis(75));
        assert!(!builder.use_system_proxy);
    }

    #[test]
    fn test_client_builds() {
        assert!(HttpClient::new().is_ok());
    }
}
