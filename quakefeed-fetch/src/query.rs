//! Feed request URL construction.

use quakefeed_core::QueryParameters;
use tracing::debug;
use url::Url;

use crate::error::FetchError;

/// Builds the feed request URL from a base endpoint and query parameters.
///
/// Parameters are appended in the fixed order `format`, `limit`,
/// `maxmagnitude`, `minmagnitude`, `orderby`. Values are form-encoded but
/// otherwise forwarded as configured.
///
/// # Errors
///
/// Returns [`FetchError::MalformedRequest`] if `base` is not an absolute
/// URL.
pub fn build_query_url(base: &str, params: &QueryParameters) -> Result<Url, FetchError> {
    let mut url =
        Url::parse(base).map_err(|e| FetchError::MalformedRequest(format!("{base}: {e}")))?;

    if url.cannot_be_a_base() {
        return Err(FetchError::MalformedRequest(format!(
            "{base}: not a hierarchical URL"
        )));
    }

    url.query_pairs_mut().extend_pairs(params.query_pairs());

    debug!(url = %url, "Built feed query URL");
    Ok(url)
}
