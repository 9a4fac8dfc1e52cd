//! Query parameters for the event feed.
//!
//! Magnitude bounds stay text-encoded on purpose: whatever the configuration
//! holds is forwarded to the provider unchanged, with no range checks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::{ConfigSource, MAX_MAGNITUDE_KEY, MIN_MAGNITUDE_KEY, ORDER_BY_KEY};
use crate::error::CoreError;

// ============================================================================
// Constants
// ============================================================================

/// USGS FDSN event query endpoint.
pub const USGS_QUERY_ENDPOINT: &str = "https://earthquake.usgs.gov/fdsnws/event/1/query";

/// Response format requested from the provider.
pub const FEED_FORMAT: &str = "geojson";

/// Maximum number of events requested per load.
pub const FEED_LIMIT: u32 = 10;

/// Default minimum magnitude.
pub const DEFAULT_MIN_MAGNITUDE: &str = "6";

/// Default maximum magnitude.
pub const DEFAULT_MAX_MAGNITUDE: &str = "10";

// ============================================================================
// Order By
// ============================================================================

/// Feed ordering requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderBy {
    /// Most recent first.
    Time,
    /// Largest magnitude first.
    #[default]
    Magnitude,
}

impl OrderBy {
    /// Returns the value sent in the `orderby` query parameter.
    pub fn as_query_value(&self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Magnitude => "magnitude",
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_query_value())
    }
}

impl FromStr for OrderBy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "time" => Ok(Self::Time),
            "magnitude" => Ok(Self::Magnitude),
            other => Err(CoreError::InvalidConfig(format!(
                "unknown order_by value '{other}' (expected 'time' or 'magnitude')"
            ))),
        }
    }
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Values the feed request URL is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParameters {
    /// Feed ordering.
    pub order_by: OrderBy,
    /// Minimum magnitude, passed through verbatim.
    pub min_magnitude: String,
    /// Maximum magnitude, passed through verbatim.
    pub max_magnitude: String,
}

impl QueryParameters {
    /// Creates query parameters from explicit values.
    pub fn new(
        order_by: OrderBy,
        min_magnitude: impl Into<String>,
        max_magnitude: impl Into<String>,
    ) -> Self {
        Self {
            order_by,
            min_magnitude: min_magnitude.into(),
            max_magnitude: max_magnitude.into(),
        }
    }

    /// Reads query parameters from a key-value configuration source.
    ///
    /// Missing keys fall back to the defaults. An unrecognised ordering also
    /// falls back to the default rather than failing the load.
    pub fn from_config(config: &dyn ConfigSource) -> Self {
        let order_by = config
            .get(ORDER_BY_KEY)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();

        Self {
            order_by,
            min_magnitude: config.get_or(MIN_MAGNITUDE_KEY, DEFAULT_MIN_MAGNITUDE),
            max_magnitude: config.get_or(MAX_MAGNITUDE_KEY, DEFAULT_MAX_MAGNITUDE),
        }
    }

    /// Returns the query pairs in the order they are appended to the URL.
    pub fn query_pairs(&self) -> [(&'static str, String); 5] {
        [
            ("format", FEED_FORMAT.to_string()),
            ("limit", FEED_LIMIT.to_string()),
            ("maxmagnitude", self.max_magnitude.clone()),
            ("minmagnitude", self.min_magnitude.clone()),
            ("orderby", self.order_by.as_query_value().to_string()),
        ]
    }
}

impl Default for QueryParameters {
    fn default() -> Self {
        Self {
            order_by: OrderBy::default(),
            min_magnitude: DEFAULT_MIN_MAGNITUDE.to_string(),
            max_magnitude: DEFAULT_MAX_MAGNITUDE.to_string(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_order_by_parse() {
        assert_eq!("time".parse::<OrderBy>().unwrap(), OrderBy::Time);
        assert_eq!(" Magnitude ".parse::<OrderBy>().unwrap(), OrderBy::Magnitude);
        assert!("depth".parse::<OrderBy>().is_err());
    }

    #[test]
    fn test_order_by_display() {
        assert_eq!(OrderBy::Time.to_string(), "time");
        assert_eq!(OrderBy::default(), OrderBy::Magnitude);
    }

    #[test]
    fn test_from_config_defaults() {
        let config: HashMap<String, String> = HashMap::new();
        let params = QueryParameters::from_config(&config);
        assert_eq!(params, QueryParameters::default());
        assert_eq!(params.min_magnitude, "6");
        assert_eq!(params.max_magnitude, "10");
    }

    #[test]
    fn test_from_config_values_verbatim() {
        let mut config = HashMap::new();
        config.insert("order_by".to_string(), "time".to_string());
        config.insert("min_magnitude".to_string(), "2.5".to_string());
        config.insert("max_magnitude".to_string(), "not-a-number".to_string());

        let params = QueryParameters::from_config(&config);
        assert_eq!(params.order_by, OrderBy::Time);
        assert_eq!(params.min_magnitude, "2.5");
        assert_eq!(params.max_magnitude, "not-a-number");
    }

    #[test]
    fn test_from_config_bad_order_falls_back() {
        let mut config = HashMap::new();
        config.insert("order_by".to_string(), "depth".to_string());
        let params = QueryParameters::from_config(&config);
        assert_eq!(params.order_by, OrderBy::Magnitude);
    }

    #[test]
    fn test_query_pairs_order() {
        let params = QueryParameters::new(OrderBy::Time, "2.5", "9");
        let keys: Vec<&str> = params.query_pairs().iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            vec!["format", "limit", "maxmagnitude", "minmagnitude", "orderby"]
        );
        let pairs = params.query_pairs();
        assert_eq!(pairs[0].1, "geojson");
        assert_eq!(pairs[1].1, "10");
        assert_eq!(pairs[2].1, "9");
        assert_eq!(pairs[3].1, "2.5");
        assert_eq!(pairs[4].1, "time");
    }
}
