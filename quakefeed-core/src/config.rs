//! Opaque key-value configuration seam.
//!
//! The core never knows where settings live. Anything that can answer
//! "what is the value for this key" can drive query construction.

use std::collections::{BTreeMap, HashMap};

/// Key for the feed ordering (`time` or `magnitude`).
pub const ORDER_BY_KEY: &str = "order_by";

/// Key for the minimum magnitude, as text.
pub const MIN_MAGNITUDE_KEY: &str = "min_magnitude";

/// Key for the maximum magnitude, as text.
pub const MAX_MAGNITUDE_KEY: &str = "max_magnitude";

/// Key for the base query endpoint.
pub const ENDPOINT_KEY: &str = "endpoint";

/// A read-only key-value configuration source.
pub trait ConfigSource {
    /// Returns the raw text value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Returns the value under `key`, or `default` when absent.
    fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl ConfigSource for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        BTreeMap::get(self, key).cloned()
    }
}

impl<C: ConfigSource + ?Sized> ConfigSource for &C {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}
