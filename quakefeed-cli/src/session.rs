//! Feed session: the task that owns the list store.
//!
//! Loader deliveries arrive over a channel and are applied here, so the list
//! store is only ever mutated by the task running the command.

use anyhow::Result;
use quakefeed_core::{FeedOutcome, QueryParameters};
use quakefeed_fetch::FeedPipeline;
use quakefeed_store::{
    ChannelListener, FEED_LOADER_ID, FeedLoader, ListStore, LoadWaiter, LoaderEvent,
    restart_feed_load, start_feed_load,
};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

/// One subscribed view of the feed.
pub struct FeedSession {
    loader: FeedLoader,
    pipeline: FeedPipeline,
    params: QueryParameters,
    list: ListStore,
    events: UnboundedReceiver<LoaderEvent<FeedOutcome>>,
}

impl FeedSession {
    /// Creates a session and subscribes it to the feed loader.
    pub fn new(pipeline: FeedPipeline, params: QueryParameters) -> Self {
        let loader = FeedLoader::new();
        let (listener, events) = ChannelListener::channel();
        loader.subscribe(FEED_LOADER_ID, listener);

        Self {
            loader,
            pipeline,
            params,
            list: ListStore::new(),
            events,
        }
    }

    /// The query this session loads.
    pub fn params(&self) -> &QueryParameters {
        &self.params
    }

    /// The displayed rows.
    pub fn list(&self) -> &ListStore {
        &self.list
    }

    /// Mutable access to the displayed rows.
    pub fn list_mut(&mut self) -> &mut ListStore {
        &mut self.list
    }

    /// Loads the feed, reusing a cached outcome.
    pub async fn load(&mut self) -> Result<Arc<FeedOutcome>> {
        let waiter = start_feed_load(&self.loader, &self.pipeline, self.params.clone());
        self.settle(waiter).await
    }

    /// Drops the cached outcome and loads the feed again.
    pub async fn reload(&mut self) -> Result<Arc<FeedOutcome>> {
        let waiter = restart_feed_load(&self.loader, &self.pipeline, self.params.clone());
        self.settle(waiter).await
    }

    async fn settle(&mut self, waiter: LoadWaiter<FeedOutcome>) -> Result<Arc<FeedOutcome>> {
        let outcome = waiter.wait().await?;
        // Listeners run before waiters, so the delivery is already queued.
        self.drain();
        Ok(outcome)
    }

    fn drain(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                LoaderEvent::Finished(outcome) => {
                    let replaced = self.list.apply(&outcome);
                    debug!(replaced, rows = self.list.len(), "Applied feed delivery");
                }
                LoaderEvent::Reset => self.list.clear(),
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use quakefeed_fetch::{FeedSource, FetchError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use url::Url;

    const FEED: &str = r#"{"features": [
        {"properties": {"mag": 6.1, "place": "10km N of Example", "time": 0, "url": "https://e/1"}},
        {"properties": {"mag": 7.4, "place": "Example Trench", "time": 0, "url": "https://e/2"}}
    ]}"#;

    struct CountingSource {
        body: &'static str,
        fetches: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl FeedSource for CountingSource {
        fn id(&self) -> &str {
            "counting"
        }

        async fn fetch_text(&self, _url: &Url) -> Result<String, FetchError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.body.to_string())
        }
    }

    fn session(body: &'static str) -> (FeedSession, Arc<CountingSource>) {
        let source = Arc::new(CountingSource {
            body,
            fetches: AtomicUsize::new(0),
        });
        let pipeline = FeedPipeline::new(source.clone());
        (FeedSession::new(pipeline, QueryParameters::default()), source)
    }

    #[tokio::test]
    async fn test_load_fills_list() {
        let (mut session, source) = session(FEED);

        let outcome = session.load().await.unwrap();
        assert_eq!(outcome.events().len(), 2);
        assert_eq!(session.list().len(), 2);

        // Second load is served from the cache.
        session.load().await.unwrap();
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_reload_fetches_again() {
        let (mut session, source) = session(FEED);

        session.load().await.unwrap();
        session.reload().await.unwrap();
        assert_eq!(session.list().len(), 2);
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_feed_leaves_list_empty() {
        let (mut session, _) = session(r#"{"features": []}"#);

        let outcome = session.load().await.unwrap();
        assert!(outcome.is_loaded());
        assert!(session.list().is_empty());
    }
}
