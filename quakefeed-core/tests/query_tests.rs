//! Integration tests for the query values exposed at the crate root.

use quakefeed_core::{
    DEFAULT_MAX_MAGNITUDE, DEFAULT_MIN_MAGNITUDE, FEED_FORMAT, FEED_LIMIT, OrderBy,
    QueryParameters, USGS_QUERY_ENDPOINT,
};

#[test]
fn test_default_query_uses_root_constants() {
    let params = QueryParameters::default();
    assert_eq!(params.order_by, OrderBy::Magnitude);
    assert_eq!(params.min_magnitude, DEFAULT_MIN_MAGNITUDE);
    assert_eq!(params.max_magnitude, DEFAULT_MAX_MAGNITUDE);

    let pairs = params.query_pairs();
    assert_eq!(pairs[0], ("format", FEED_FORMAT.to_string()));
    assert_eq!(pairs[1], ("limit", FEED_LIMIT.to_string()));
}

#[test]
fn test_endpoint_is_usgs_query() {
    assert!(USGS_QUERY_ENDPOINT.starts_with("https://"));
    assert!(USGS_QUERY_ENDPOINT.ends_with("/query"));
}
