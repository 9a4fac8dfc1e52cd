//! Displayed event list.
//!
//! The list store owns the current [`FeedSnapshot`] and replaces it
//! wholesale. It lives on one task: observers and the activation callback
//! are plain closures and are never shared across threads.

use chrono::TimeZone;
use quakefeed_core::{DisplayRecord, FeedOutcome, FeedSnapshot, SeismicEvent, present, present_in};
use std::fmt::Display;
use tracing::debug;

/// A change to the list, as reported to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChange {
    /// The whole content was replaced.
    ContentChanged,
    /// `count` rows starting at `start` were removed.
    RangeRemoved {
        /// First removed position.
        start: usize,
        /// Number of rows removed.
        count: usize,
    },
}

type Observer = Box<dyn FnMut(&ListChange)>;
type ActivateCallback = Box<dyn FnMut(&SeismicEvent)>;

/// Holds the displayed snapshot and notifies observers of changes.
#[derive(Default)]
pub struct ListStore {
    events: FeedSnapshot,
    observers: Vec<Observer>,
    on_activate: Option<ActivateCallback>,
}

impl ListStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The current snapshot.
    pub fn events(&self) -> &[SeismicEvent] {
        &self.events
    }

    /// The event at `index`.
    pub fn get(&self, index: usize) -> Option<&SeismicEvent> {
        self.events.get(index)
    }

    /// Registers an observer.
    pub fn add_observer(&mut self, observer: impl FnMut(&ListChange) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Sets the callback invoked by [`ListStore::activate`], replacing any
    /// previous one.
    pub fn set_on_activate(&mut self, callback: impl FnMut(&SeismicEvent) + 'static) {
        self.on_activate = Some(Box::new(callback));
    }

    /// Replaces the whole snapshot.
    pub fn swap(&mut self, events: FeedSnapshot) {
        debug!(old = self.events.len(), new = events.len(), "Swapping list content");
        self.events = events;
        self.emit(ListChange::ContentChanged);
    }

    /// Removes every row. Does nothing if the list is already empty.
    pub fn clear(&mut self) {
        let count = self.events.len();
        if count == 0 {
            return;
        }
        self.events.clear();
        debug!(count, "List cleared");
        self.emit(ListChange::RangeRemoved { start: 0, count });
    }

    /// Applies a load outcome.
    ///
    /// Only a loaded feed with at least one event replaces the snapshot;
    /// anything else leaves the current rows in place. Returns true if the
    /// snapshot was replaced.
    pub fn apply(&mut self, outcome: &FeedOutcome) -> bool {
        if outcome.has_events() {
            self.swap(outcome.events().to_vec());
            true
        } else {
            debug!(loaded = outcome.is_loaded(), "Outcome has no rows, keeping list");
            false
        }
    }

    /// Activates the row at `index`: invokes the activation callback with
    /// its event and returns the event's detail link.
    pub fn activate(&mut self, index: usize) -> Option<String> {
        let event = self.events.get(index)?;
        if let Some(callback) = self.on_activate.as_mut() {
            callback(event);
        }
        Some(event.detail_url.clone())
    }

    /// Presentation fields for the row at `index`, in the local time zone.
    pub fn display_record(&self, index: usize) -> Option<DisplayRecord> {
        self.events.get(index).map(present)
    }

    /// Presentation fields for every row, in order.
    pub fn display_records(&self) -> Vec<DisplayRecord> {
        self.events.iter().map(present).collect()
    }

    /// Presentation fields for every row, rendered in `tz`.
    pub fn display_records_in<Tz>(&self, tz: &Tz) -> Vec<DisplayRecord>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        self.events.iter().map(|event| present_in(event, tz)).collect()
    }

    fn emit(&mut self, change: ListChange) {
        for observer in &mut self.observers {
            observer(&change);
        }
    }
}

impl std::fmt::Debug for ListStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListStore")
            .field("events", &self.events.len())
            .field("observers", &self.observers.len())
            .field("on_activate", &self.on_activate.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use quakefeed_core::{FeedFailure, MagnitudeBucket, ParseIssue, ParsedFeed};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn event(mag: f64, place: &str) -> SeismicEvent {
        SeismicEvent::new(mag, place, 0, format!("https://e/{place}"))
    }

    fn recording(store: &mut ListStore) -> Rc<RefCell<Vec<ListChange>>> {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        store.add_observer(move |change| sink.borrow_mut().push(*change));
        changes
    }

    #[test]
    fn test_swap_then_clear() {
        let mut store = ListStore::new();
        let changes = recording(&mut store);
        assert_eq!(store.len(), 0);

        store.swap(vec![event(1.0, "a"), event(2.0, "b"), event(3.0, "c")]);
        assert_eq!(store.len(), 3);

        store.clear();
        assert_eq!(store.len(), 0);
        assert_eq!(
            *changes.borrow(),
            vec![
                ListChange::ContentChanged,
                ListChange::RangeRemoved { start: 0, count: 3 },
            ]
        );
    }

    #[test]
    fn test_clear_empty_emits_nothing() {
        let mut store = ListStore::new();
        let changes = recording(&mut store);
        store.clear();
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn test_apply_is_all_or_nothing() {
        let mut store = ListStore::new();
        store.swap(vec![event(5.0, "kept")]);

        let failed = FeedOutcome::Unavailable(FeedFailure::EmptyBody);
        assert!(!store.apply(&failed));

        let empty = FeedOutcome::Loaded(ParsedFeed::complete(Vec::new()));
        assert!(!store.apply(&empty));
        assert_eq!(store.events()[0].raw_location, "kept");

        let partial = FeedOutcome::Loaded(ParsedFeed::stopped(
            vec![event(6.0, "new")],
            ParseIssue::Feature {
                index: 1,
                reason: "missing field `url`".to_string(),
            },
        ));
        assert!(store.apply(&partial));
        assert_eq!(store.len(), 1);
        assert_eq!(store.events()[0].raw_location, "new");
    }

    #[test]
    fn test_activate_uses_instance_callback() {
        let mut first = ListStore::new();
        let mut second = ListStore::new();
        first.swap(vec![event(1.0, "a"), event(2.0, "b")]);
        second.swap(vec![event(3.0, "c")]);

        let activated = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&activated);
        first.set_on_activate(move |e| sink.borrow_mut().push(e.raw_location.clone()));

        assert_eq!(first.activate(1).as_deref(), Some("https://e/b"));
        assert_eq!(second.activate(0).as_deref(), Some("https://e/c"));
        assert_eq!(first.activate(9), None);
        assert_eq!(*activated.borrow(), vec!["b".to_string()]);
    }

    #[test]
    fn test_display_records() {
        let mut store = ListStore::new();
        store.swap(vec![event(7.2, "88km N of Yelizovo, Russia"), event(0.5, "Offshore")]);

        let rows = store.display_records_in(&Utc);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].color_bucket, MagnitudeBucket::Seven);
        assert_eq!(rows[0].location_offset_phrase, "88km N of");
        assert_eq!(rows[1].color_bucket, MagnitudeBucket::One);
        assert_eq!(rows[1].location_offset_phrase, "near the");

        assert!(store.display_record(1).is_some());
        assert!(store.display_record(2).is_none());
    }
}
