//! Feed loading on top of the generic loader.
//!
//! Binds a [`FeedPipeline`] to a [`Loader`] under a fixed id and forwards
//! loader callbacks onto a channel, so the task that owns the
//! [`ListStore`](crate::ListStore) is the only one mutating it.

use quakefeed_core::{FeedOutcome, QueryParameters};
use quakefeed_fetch::FeedPipeline;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

use crate::loader::{LoadListener, LoadWaiter, Loader};

/// Loader id type.
pub type LoadId = u32;

/// Id under which the event feed is loaded.
pub const FEED_LOADER_ID: LoadId = 0;

/// Loader caching feed outcomes.
pub type FeedLoader = Loader<LoadId, FeedOutcome>;

/// Starts (or joins) the feed load.
pub fn start_feed_load(
    loader: &FeedLoader,
    pipeline: &FeedPipeline,
    params: QueryParameters,
) -> LoadWaiter<FeedOutcome> {
    let pipeline = pipeline.clone();
    loader.start(FEED_LOADER_ID, move || async move { pipeline.load(&params).await })
}

/// Discards the cached feed and loads it again.
pub fn restart_feed_load(
    loader: &FeedLoader,
    pipeline: &FeedPipeline,
    params: QueryParameters,
) -> LoadWaiter<FeedOutcome> {
    loader.reset(&FEED_LOADER_ID);
    start_feed_load(loader, pipeline, params)
}

// ============================================================================
// Channel Listener
// ============================================================================

/// A loader callback, as delivered over a channel.
#[derive(Debug)]
pub enum LoaderEvent<T> {
    /// A result was delivered.
    Finished(Arc<T>),
    /// The cached result was discarded.
    Reset,
}

/// Listener that forwards callbacks to an unbounded channel.
#[derive(Debug)]
pub struct ChannelListener<T> {
    tx: mpsc::UnboundedSender<LoaderEvent<T>>,
}

impl<T> ChannelListener<T> {
    /// Creates a listener and the receiving end of its channel.
    pub fn channel() -> (Arc<Self>, mpsc::UnboundedReceiver<LoaderEvent<T>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }
}

impl<T: Send + Sync> LoadListener<T> for ChannelListener<T> {
    fn on_load_finished(&self, result: Arc<T>) {
        if self.tx.send(LoaderEvent::Finished(result)).is_err() {
            debug!("Listener channel closed, dropping result");
        }
    }

    fn on_loader_reset(&self) {
        let _ = self.tx.send(LoaderEvent::Reset);
    }
}
