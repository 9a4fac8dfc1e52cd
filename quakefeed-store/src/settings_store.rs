//! User preferences store.
//!
//! Holds the feed query values and host preferences, persists them as JSON,
//! and notifies subscribers when they change. [`Settings`] is also the
//! key-value [`ConfigSource`] the query builder reads from.

use quakefeed_core::config::{ENDPOINT_KEY, MAX_MAGNITUDE_KEY, MIN_MAGNITUDE_KEY, ORDER_BY_KEY};
use quakefeed_core::{
    ConfigSource, DEFAULT_MAX_MAGNITUDE, DEFAULT_MIN_MAGNITUDE, OrderBy, QueryParameters,
    USGS_QUERY_ENDPOINT,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::persistence::{default_settings_path, load_json_or_default, save_json};

/// Settings key for the watch interval.
pub const REFRESH_INTERVAL_KEY: &str = "refresh_interval_secs";

/// Settings key for the log level.
pub const LOG_LEVEL_KEY: &str = "log_level";

/// Default watch interval in seconds.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;

// ============================================================================
// Settings Types
// ============================================================================

/// User preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Feed ordering.
    pub order_by: OrderBy,

    /// Minimum magnitude, forwarded verbatim.
    pub min_magnitude: String,

    /// Maximum magnitude, forwarded verbatim.
    pub max_magnitude: String,

    /// Feed query endpoint.
    pub endpoint: String,

    /// Seconds between reloads in watch mode.
    pub refresh_interval_secs: u64,

    /// Log level when no verbosity flag is given.
    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            order_by: OrderBy::default(),
            min_magnitude: DEFAULT_MIN_MAGNITUDE.to_string(),
            max_magnitude: DEFAULT_MAX_MAGNITUDE.to_string(),
            endpoint: USGS_QUERY_ENDPOINT.to_string(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            log_level: LogLevel::default(),
        }
    }
}

impl Settings {
    /// All keys accepted by [`Settings::set_value`].
    pub const KEYS: [&'static str; 6] = [
        ORDER_BY_KEY,
        MIN_MAGNITUDE_KEY,
        MAX_MAGNITUDE_KEY,
        ENDPOINT_KEY,
        REFRESH_INTERVAL_KEY,
        LOG_LEVEL_KEY,
    ];

    /// Returns the query parameters described by these settings.
    pub fn query_parameters(&self) -> QueryParameters {
        QueryParameters::from_config(self)
    }

    /// Returns the watch interval.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Sets one value by key, validating where the key has a fixed domain.
    ///
    /// Magnitude bounds are stored verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownKey`] or [`StoreError::InvalidValue`].
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let invalid = |reason: String| StoreError::InvalidValue {
            key: key.to_string(),
            reason,
        };

        match key {
            ORDER_BY_KEY => {
                self.order_by = value
                    .parse::<OrderBy>()
                    .map_err(|e| invalid(e.to_string()))?;
            }
            MIN_MAGNITUDE_KEY => self.min_magnitude = value.to_string(),
            MAX_MAGNITUDE_KEY => self.max_magnitude = value.to_string(),
            ENDPOINT_KEY => self.endpoint = value.to_string(),
            REFRESH_INTERVAL_KEY => {
                let secs = value
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| invalid(e.to_string()))?;
                if secs == 0 {
                    return Err(invalid("must be at least 1 second".to_string()));
                }
                self.refresh_interval_secs = secs;
            }
            LOG_LEVEL_KEY => self.log_level = value.parse::<LogLevel>()?,
            other => return Err(StoreError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// Returns every setting as a key/value pair, in [`Settings::KEYS`] order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        Self::KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }
}

impl ConfigSource for Settings {
    fn get(&self, key: &str) -> Option<String> {
        match key {
            ORDER_BY_KEY => Some(self.order_by.to_string()),
            MIN_MAGNITUDE_KEY => Some(self.min_magnitude.clone()),
            MAX_MAGNITUDE_KEY => Some(self.max_magnitude.clone()),
            ENDPOINT_KEY => Some(self.endpoint.clone()),
            REFRESH_INTERVAL_KEY => Some(self.refresh_interval_secs.to_string()),
            LOG_LEVEL_KEY => Some(self.log_level.to_string()),
            _ => None,
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Error level logging.
    Error,
    /// Warning level logging.
    #[default]
    Warn,
    /// Info level logging.
    Info,
    /// Debug level logging.
    Debug,
    /// Trace level logging.
    Trace,
}

impl LogLevel {
    /// Returns the filter directive name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(StoreError::InvalidValue {
                key: LOG_LEVEL_KEY.to_string(),
                reason: format!("unknown level '{other}'"),
            }),
        }
    }
}

// ============================================================================
// Settings Store
// ============================================================================

/// Persistent settings store with change notifications.
pub struct SettingsStore {
    settings: Arc<RwLock<Settings>>,
    path: PathBuf,
    notify: watch::Sender<u64>,
}

impl SettingsStore {
    /// Creates a store holding default settings.
    pub fn new(path: PathBuf) -> Self {
        Self::with_settings(path, Settings::default())
    }

    fn with_settings(path: PathBuf, settings: Settings) -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            settings: Arc::new(RwLock::new(settings)),
            path,
            notify,
        }
    }

    /// Loads settings from the default path.
    pub async fn load_default() -> Self {
        Self::load(default_settings_path()).await
    }

    /// Loads settings from a path, using defaults if the file is missing or
    /// unreadable.
    pub async fn load(path: PathBuf) -> Self {
        let settings: Settings = load_json_or_default(&path).await;
        info!(path = %path.display(), "Settings loaded");
        Self::with_settings(path, settings)
    }

    /// Returns the settings file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Returns the query parameters for the current settings.
    pub async fn query_parameters(&self) -> QueryParameters {
        self.settings.read().await.query_parameters()
    }

    /// Updates settings and notifies subscribers.
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        {
            let mut settings = self.settings.write().await;
            f(&mut settings);
        }
        self.notify_change();
    }

    /// Sets one value by key and notifies subscribers.
    ///
    /// # Errors
    ///
    /// Returns an error if the key or value is rejected; settings are left
    /// unchanged in that case.
    pub async fn set_value(&self, key: &str, value: &str) -> Result<(), StoreError> {
        {
            let mut settings = self.settings.write().await;
            let mut updated = settings.clone();
            updated.set_value(key, value)?;
            *settings = updated;
        }
        debug!(key, value, "Setting changed");
        self.notify_change();
        Ok(())
    }

    /// Restores defaults and notifies subscribers.
    pub async fn reset(&self) {
        self.update(|s| *s = Settings::default()).await;
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let settings = self.settings.read().await;
        save_json(&self.path, &*settings).await?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    /// Re-reads the settings file and notifies subscribers if it differs
    /// from the settings held in memory.
    ///
    /// A missing or unreadable file reads as defaults. Returns true if the
    /// settings changed.
    pub async fn reload(&self) -> bool {
        let on_disk: Settings = load_json_or_default(&self.path).await;
        {
            let mut settings = self.settings.write().await;
            if *settings == on_disk {
                return false;
            }
            *settings = on_disk;
        }
        info!(path = %self.path.display(), "Settings changed on disk");
        self.notify_change();
        true
    }

    /// Subscribes to settings changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    fn notify_change(&self) {
        self.notify.send_modify(|version| *version += 1);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.order_by, OrderBy::Magnitude);
        assert_eq!(settings.min_magnitude, "6");
        assert_eq!(settings.max_magnitude, "10");
        assert_eq!(settings.endpoint, USGS_QUERY_ENDPOINT);
        assert_eq!(settings.refresh_interval(), Duration::from_secs(300));
        assert_eq!(settings.query_parameters(), QueryParameters::default());
    }

    #[test]
    fn test_set_value() {
        let mut settings = Settings::default();
        settings.set_value("order_by", "time").unwrap();
        settings.set_value("min_magnitude", "2.5").unwrap();
        settings.set_value("refresh_interval_secs", "60").unwrap();
        settings.set_value("log_level", "DEBUG").unwrap();

        assert_eq!(settings.order_by, OrderBy::Time);
        assert_eq!(settings.min_magnitude, "2.5");
        assert_eq!(settings.refresh_interval_secs, 60);
        assert_eq!(settings.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_set_value_rejections() {
        let mut settings = Settings::default();
        assert!(matches!(
            settings.set_value("colour", "red"),
            Err(StoreError::UnknownKey(_))
        ));
        assert!(matches!(
            settings.set_value("order_by", "depth"),
            Err(StoreError::InvalidValue { .. })
        ));
        assert!(settings.set_value("refresh_interval_secs", "0").is_err());
        assert!(settings.set_value("refresh_interval_secs", "soon").is_err());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_config_source() {
        let mut settings = Settings::default();
        settings.max_magnitude = "9".to_string();
        assert_eq!(settings.get("max_magnitude").as_deref(), Some("9"));
        assert_eq!(settings.get("order_by").as_deref(), Some("magnitude"));
        assert_eq!(settings.get("nope"), None);
        assert_eq!(settings.entries().len(), Settings::KEYS.len());
    }

    #[tokio::test]
    async fn test_store_notifies() {
        let store = SettingsStore::new(PathBuf::from("unused.json"));
        let rx = store.subscribe();

        store.set_value("order_by", "time").await.unwrap();
        assert_eq!(*rx.borrow(), 1);
        assert_eq!(store.query_parameters().await.order_by, OrderBy::Time);

        assert!(store.set_value("order_by", "depth").await.is_err());
        assert_eq!(*rx.borrow(), 1);

        store.reset().await;
        assert_eq!(*rx.borrow(), 2);
        assert_eq!(store.get().await, Settings::default());
    }

    #[tokio::test]
    async fn test_reload_picks_up_file_edits() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        let store = SettingsStore::load(path.clone()).await;
        let mut rx = store.subscribe();

        assert!(!store.reload().await);
        assert!(!rx.has_changed().unwrap());

        let editor = SettingsStore::load(path.clone()).await;
        editor.set_value("min_magnitude", "4.5").await.unwrap();
        editor.set_value("refresh_interval_secs", "60").await.unwrap();
        editor.save().await.unwrap();

        assert!(store.reload().await);
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();
        let settings = store.get().await;
        assert_eq!(settings.min_magnitude, "4.5");
        assert_eq!(settings.refresh_interval(), Duration::from_secs(60));

        assert!(!store.reload().await);
        assert!(!rx.has_changed().unwrap());

        tokio::fs::remove_file(&path).await.unwrap();
        assert!(store.reload().await);
        assert_eq!(store.get().await, Settings::default());
    }
}
