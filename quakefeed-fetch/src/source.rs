//! Feed source trait.
//!
//! A feed source turns a request URL into raw feed text. The HTTP client is
//! the production source; tests substitute scripted or counting sources.

use async_trait::async_trait;
use url::Url;

use crate::error::FetchError;
use crate::host::http::HttpClient;

/// Retrieves raw feed text for a request URL.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Short identifier used in logs.
    fn id(&self) -> &str;

    /// Fetches the feed text at `url`.
    async fn fetch_text(&self, url: &Url) -> Result<String, FetchError>;
}

#[async_trait]
impl FeedSource for HttpClient {
    fn id(&self) -> &str {
        "http"
    }

    async fn fetch_text(&self, url: &Url) -> Result<String, FetchError> {
        self.get_text(url).await
    }
}
