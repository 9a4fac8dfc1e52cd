//! Single-flight async loader with a result cache.
//!
//! A [`Loader`] runs at most one operation per id at a time and keeps the
//! result until the id is reset. Callers that start a load while one is in
//! flight join it instead of starting another, and listeners registered
//! after completion receive the cached result immediately.
//!
//! Each id moves through three states:
//!
//! ```text
//!   Idle --start--> Loading --complete--> Cached
//!    ^                 |                    |
//!    +-----reset-------+--------reset-------+
//! ```
//!
//! Listener callbacks run after the state lock is released, against a
//! snapshot of the listener set taken under the lock. Deliveries and resets
//! are serialized by a second lock, so a listener never sees a result after
//! the reset that discarded it. Callbacks must not call back into the
//! loader.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

// ============================================================================
// Public Types
// ============================================================================

/// Why a waiter did not receive a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoaderError {
    /// The id was reset while the operation was in flight.
    #[error("load was reset before it completed")]
    Reset,

    /// The operation panicked or its task was cancelled.
    #[error("load operation aborted")]
    Aborted,
}

/// Observable state of one loader id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// No operation has run since creation or the last reset.
    Idle,
    /// An operation is in flight.
    Loading,
    /// A result is cached.
    Cached,
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Loading => write!(f, "loading"),
            Self::Cached => write!(f, "cached"),
        }
    }
}

/// Handle returned by [`Loader::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Receives results and resets for one loader id.
pub trait LoadListener<T>: Send + Sync {
    /// Called with each completed result, and with the cached result on
    /// subscribe.
    fn on_load_finished(&self, result: Arc<T>);

    /// Called when the id is reset and its result discarded.
    fn on_loader_reset(&self) {}
}

/// Resolves once the load started by [`Loader::start`] completes.
#[derive(Debug)]
pub struct LoadWaiter<T> {
    rx: oneshot::Receiver<Result<Arc<T>, LoaderError>>,
}

impl<T> LoadWaiter<T> {
    /// Waits for the result.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::Reset`] if the id was reset first, or
    /// [`LoaderError::Aborted`] if the operation panicked.
    pub async fn wait(self) -> Result<Arc<T>, LoaderError> {
        self.rx.await.unwrap_or(Err(LoaderError::Aborted))
    }
}

// ============================================================================
// Inner State
// ============================================================================

type Waiter<T> = oneshot::Sender<Result<Arc<T>, LoaderError>>;
type SharedListener<T> = Arc<dyn LoadListener<T>>;

enum Slot<T> {
    Idle,
    Loading {
        generation: u64,
        waiters: Vec<Waiter<T>>,
    },
    Cached(Arc<T>),
}

struct Entry<T> {
    slot: Slot<T>,
    generation: u64,
    listeners: Vec<(ListenerId, SharedListener<T>)>,
}

impl<T> Default for Entry<T> {
    fn default() -> Self {
        Self {
            slot: Slot::Idle,
            generation: 0,
            listeners: Vec::new(),
        }
    }
}

impl<T> Entry<T> {
    fn state(&self) -> LoadState {
        match self.slot {
            Slot::Idle => LoadState::Idle,
            Slot::Loading { .. } => LoadState::Loading,
            Slot::Cached(_) => LoadState::Cached,
        }
    }

    fn listener_snapshot(&self) -> Vec<SharedListener<T>> {
        self.listeners.iter().map(|(_, l)| Arc::clone(l)).collect()
    }
}

struct LoaderInner<K, T> {
    entries: HashMap<K, Entry<T>>,
    next_listener: u64,
}

// ============================================================================
// Loader
// ============================================================================

/// Id-keyed, single-flight async operation cache.
///
/// Cloning yields another handle to the same cache.
pub struct Loader<K, T> {
    inner: Arc<Mutex<LoaderInner<K, T>>>,
    // Taken before `inner` by every path that notifies listeners.
    delivery: Arc<Mutex<()>>,
}

impl<K, T> Clone for Loader<K, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            delivery: Arc::clone(&self.delivery),
        }
    }
}

impl<K, T> Default for Loader<K, T>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + 'static,
    T: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, T> Loader<K, T>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + 'static,
    T: Send + Sync + 'static,
{
    /// Creates an empty loader.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(LoaderInner {
                entries: HashMap::new(),
                next_listener: 0,
            })),
            delivery: Arc::new(Mutex::new(())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LoaderInner<K, T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_delivery(&self) -> MutexGuard<'_, ()> {
        self.delivery.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the state of `id`.
    pub fn state(&self, id: &K) -> LoadState {
        self.lock()
            .entries
            .get(id)
            .map_or(LoadState::Idle, Entry::state)
    }

    /// Returns the cached result for `id`, if any.
    pub fn cached(&self, id: &K) -> Option<Arc<T>> {
        match self.lock().entries.get(id).map(|e| &e.slot) {
            Some(Slot::Cached(value)) => Some(Arc::clone(value)),
            _ => None,
        }
    }

    /// Starts a load for `id`, or joins the one already running.
    ///
    /// - Cached: `op` is not called; the waiter resolves with the cached
    ///   result.
    /// - Loading: `op` is not called; the waiter resolves with the in-flight
    ///   result.
    /// - Idle: `op` is called once on a tokio task and its future runs
    ///   there. A panic in `op` or its future returns the id to Idle.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F, Fut>(&self, id: K, op: F) -> LoadWaiter<T>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let mut inner = self.lock();
        let entry = inner.entries.entry(id.clone()).or_default();

        match &mut entry.slot {
            Slot::Cached(value) => {
                debug!(id = ?id, "Load served from cache");
                let _ = tx.send(Ok(Arc::clone(value)));
            }
            Slot::Loading { waiters, .. } => {
                debug!(id = ?id, waiters = waiters.len() + 1, "Joined in-flight load");
                waiters.push(tx);
            }
            Slot::Idle => {
                entry.generation += 1;
                let generation = entry.generation;
                entry.slot = Slot::Loading {
                    generation,
                    waiters: vec![tx],
                };
                drop(inner);

                info!(id = ?id, generation, "Starting load");
                let task = tokio::spawn(async move { op().await });
                let loader = self.clone();
                tokio::spawn(async move {
                    let result = match task.await {
                        Ok(value) => Some(value),
                        Err(e) => {
                            warn!(id = ?id, error = %e, "Load operation aborted");
                            None
                        }
                    };
                    loader.complete(&id, generation, result);
                });
            }
        }

        LoadWaiter { rx }
    }

    /// Resets `id` then starts a fresh load.
    pub fn restart<F, Fut>(&self, id: K, op: F) -> LoadWaiter<T>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        self.reset(&id);
        self.start(id, op)
    }

    fn complete(&self, id: &K, generation: u64, result: Option<T>) {
        let _delivery = self.lock_delivery();
        let (waiters, listeners, value) = {
            let mut inner = self.lock();
            let Some(entry) = inner.entries.get_mut(id) else {
                return;
            };

            let waiters = match std::mem::replace(&mut entry.slot, Slot::Idle) {
                Slot::Loading {
                    generation: current,
                    waiters,
                } if current == generation => waiters,
                other => {
                    entry.slot = other;
                    debug!(id = ?id, generation, "Dropping result of a reset load");
                    return;
                }
            };

            match result {
                Some(value) => {
                    let value = Arc::new(value);
                    entry.slot = Slot::Cached(Arc::clone(&value));
                    (waiters, entry.listener_snapshot(), Some(value))
                }
                None => (waiters, Vec::new(), None),
            }
        };

        match value {
            Some(value) => {
                info!(
                    id = ?id,
                    waiters = waiters.len(),
                    listeners = listeners.len(),
                    "Load finished"
                );
                for listener in listeners {
                    listener.on_load_finished(Arc::clone(&value));
                }
                for waiter in waiters {
                    let _ = waiter.send(Ok(Arc::clone(&value)));
                }
            }
            None => {
                for waiter in waiters {
                    let _ = waiter.send(Err(LoaderError::Aborted));
                }
            }
        }
    }

    /// Registers a listener for `id`.
    ///
    /// If a result is already cached, the listener receives it before this
    /// call returns.
    pub fn subscribe(&self, id: K, listener: Arc<dyn LoadListener<T>>) -> ListenerId {
        let _delivery = self.lock_delivery();
        let (listener_id, cached) = {
            let mut inner = self.lock();
            inner.next_listener += 1;
            let listener_id = ListenerId(inner.next_listener);

            let entry = inner.entries.entry(id.clone()).or_default();
            entry.listeners.push((listener_id, Arc::clone(&listener)));
            let cached = match &entry.slot {
                Slot::Cached(value) => Some(Arc::clone(value)),
                _ => None,
            };
            (listener_id, cached)
        };

        debug!(id = ?id, listener = listener_id.0, "Listener subscribed");
        if let Some(value) = cached {
            listener.on_load_finished(value);
        }
        listener_id
    }

    /// Removes a listener. An in-flight load keeps running and its result
    /// is still cached.
    ///
    /// Returns false if the listener was not registered for `id`.
    pub fn unsubscribe(&self, id: &K, listener_id: ListenerId) -> bool {
        let mut inner = self.lock();
        let Some(entry) = inner.entries.get_mut(id) else {
            return false;
        };
        let before = entry.listeners.len();
        entry.listeners.retain(|(lid, _)| *lid != listener_id);
        let removed = entry.listeners.len() != before;
        if removed {
            debug!(id = ?id, listener = listener_id.0, "Listener unsubscribed");
        }
        removed
    }

    /// Discards the cached or in-flight result for `id` and returns it to
    /// Idle.
    ///
    /// Pending waiters resolve with [`LoaderError::Reset`]; an in-flight
    /// operation may still finish but its result is dropped. Listeners are
    /// told through [`LoadListener::on_loader_reset`]. Returns the state
    /// before the reset.
    ///
    /// A delivery already under way finishes before the reset takes effect.
    pub fn reset(&self, id: &K) -> LoadState {
        let _delivery = self.lock_delivery();
        let (previous, waiters, listeners) = {
            let mut inner = self.lock();
            let Some(entry) = inner.entries.get_mut(id) else {
                return LoadState::Idle;
            };
            let previous = entry.state();
            let waiters = match std::mem::replace(&mut entry.slot, Slot::Idle) {
                Slot::Loading { waiters, .. } => waiters,
                Slot::Idle | Slot::Cached(_) => Vec::new(),
            };
            let listeners = if previous == LoadState::Idle {
                Vec::new()
            } else {
                entry.listener_snapshot()
            };
            (previous, waiters, listeners)
        };

        if previous != LoadState::Idle {
            info!(id = ?id, previous = %previous, "Loader reset");
        }
        for waiter in waiters {
            let _ = waiter.send(Err(LoaderError::Reset));
        }
        for listener in listeners {
            listener.on_loader_reset();
        }
        previous
    }
}

impl<K, T> fmt::Debug for Loader<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids = self
            .inner
            .lock()
            .map_or(0, |inner| inner.entries.len());
        f.debug_struct("Loader").field("ids", &ids).finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
