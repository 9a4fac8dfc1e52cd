// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # QuakeFeed Store
//!
//! State management for QuakeFeed.
//!
//! This crate provides:
//!
//! - **Loader**: single-flight async cache keyed by load id
//! - **ListStore**: the displayed event snapshot with change observers
//! - **SettingsStore**: user preferences with persistence
//! - **Persistence**: file I/O helpers for JSON data
//!
//! ## Usage
//!
//! ```ignore
//! use quakefeed_store::{ChannelListener, FeedLoader, ListStore, LoaderEvent, FEED_LOADER_ID};
//!
//! let loader = FeedLoader::new();
//! let (listener, mut rx) = ChannelListener::channel();
//! loader.subscribe(FEED_LOADER_ID, listener);
//! quakefeed_store::start_feed_load(&loader, &pipeline, params);
//!
//! let mut list = ListStore::new();
//! while let Some(LoaderEvent::Finished(outcome)) = rx.recv().await {
//!     list.apply(&outcome);
//! }
//! ```

pub mod error;
pub mod feed;
pub mod list_store;
pub mod loader;
pub mod persistence;
pub mod settings_store;

pub use error::StoreError;
pub use feed::{
    ChannelListener, FEED_LOADER_ID, FeedLoader, LoadId, LoaderEvent, restart_feed_load,
    start_feed_load,
};
pub use list_store::{ListChange, ListStore};
pub use loader::{ListenerId, LoadListener, LoadState, LoadWaiter, Loader, LoaderError};
pub use persistence::{default_config_dir, default_settings_path, load_json, load_json_or_default, save_json};
pub use settings_store::{LogLevel, Settings, SettingsStore};
