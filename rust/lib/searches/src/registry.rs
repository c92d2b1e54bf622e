//! The observable saved-search container.
//!
//! Holds the authoritative client-side view of saved searches, applies
//! transitions through named operations only, and synchronously
//! broadcasts the new snapshot to every subscriber after each one.
//! Single writer via the API, many readers via subscription.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::debug;

use crate::event::{EventError, SearchEvent};
use crate::model::{SavedSearch, SearchType};
use crate::state::SearchesState;

/// Callback type for state change notifications.
pub type ChangeHandler = Arc<dyn Fn(&SearchesState) + Send + Sync>;

/// Unique handle for a subscription, returned by
/// [`SavedSearchRegistry::subscribe`]. Use it to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

/// In-memory registry of saved searches for the current organization.
///
/// - the named operations (`start_fetch`, `pin`, …) are the only way to
///   mutate state; each one notifies subscribers before returning
/// - `get()` reads the current snapshot on demand
/// - `subscribe(handler)` registers a change handler, called
///   synchronously in registration order on every operation
///
/// Operations never fail and never perform I/O; network requests and
/// their error handling belong to the surrounding action-creator layer,
/// which dispatches these operations as requests settle. There is no
/// rollback for an optimistic pin whose confirmation never arrives;
/// such state persists until the next fetch or reset.
///
/// Intended to be constructed once per session and shared by reference;
/// `Send + Sync`, so an `Arc<SavedSearchRegistry>` works across threads.
pub struct SavedSearchRegistry {
    state: RwLock<SearchesState>,
    subscribers: RwLock<Vec<SubscriberEntry>>,
    /// Monotonic counter for subscription IDs.
    next_id: AtomicU64,
}

struct SubscriberEntry {
    id: SubscriptionId,
    handler: ChangeHandler,
}

impl SavedSearchRegistry {
    /// Create a registry in the initial state: empty, loading, no error.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(SearchesState::new()),
            subscribers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    // ====================================================================
    // Read
    // ====================================================================

    /// Snapshot of the current state.
    pub fn get(&self) -> SearchesState {
        self.state.read().unwrap().clone()
    }

    // ====================================================================
    // Subscriptions
    // ====================================================================

    /// Subscribe to state changes.
    ///
    /// The handler is called synchronously, on the thread that applied
    /// the operation, after the state lock is released, so a handler
    /// may re-enter the registry (`get()`, or dispatch a follow-up
    /// operation). Handlers run in registration order.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&SearchesState) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.write().unwrap().push(SubscriberEntry {
            id,
            handler: Arc::new(handler),
        });
        id
    }

    /// Remove a handler by its subscription ID. Unknown IDs are a no-op.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.write().unwrap().retain(|e| e.id != id);
    }

    // ====================================================================
    // Operations
    // ====================================================================

    /// A bulk fetch went out. Existing data stays visible meanwhile.
    pub fn start_fetch(&self) {
        self.apply("start-fetch", |s| s.start_fetch());
    }

    /// A bulk fetch came back; `data` is the raw response body. Replaces
    /// the collection wholesale; a non-array body coerces to empty.
    pub fn fetch_succeeded(&self, data: Value) {
        self.apply("fetch-success", move |s| s.fetch_succeeded(data));
    }

    /// A bulk fetch failed. Wipes the collection and flags the error.
    pub fn fetch_failed(&self) {
        self.apply("fetch-error", |s| s.fetch_failed());
    }

    /// Restore the initial state. Used when the scoping context changes.
    pub fn reset(&self) {
        self.apply("reset", |s| s.reset());
    }

    /// A search was created server-side; append it.
    pub fn create_succeeded(&self, search: SavedSearch) {
        self.apply("create-success", move |s| s.create_succeeded(search));
    }

    /// A search was deleted server-side; remove it by id.
    pub fn delete_succeeded(&self, search: &SavedSearch) {
        self.apply("delete-success", |s| s.delete_succeeded(search));
    }

    /// Optimistically pin `query` within `search_type`.
    pub fn pin(&self, search_type: SearchType, query: &str) {
        self.apply("pin", |s| s.pin(search_type, query));
    }

    /// The server confirmed a pin; merge the confirmed record in place.
    pub fn pin_succeeded(&self, server_record: SavedSearch) {
        self.apply("pin-success", move |s| s.pin_succeeded(server_record));
    }

    /// Unpin within `search_type`.
    pub fn unpin(&self, search_type: SearchType) {
        self.apply("unpin", |s| s.unpin(search_type));
    }

    // ====================================================================
    // Dispatch
    // ====================================================================

    /// Apply a typed inbound event.
    pub fn dispatch(&self, event: SearchEvent) {
        match event {
            SearchEvent::StartFetch => self.start_fetch(),
            SearchEvent::FetchSucceeded(data) => self.fetch_succeeded(data),
            SearchEvent::FetchFailed => self.fetch_failed(),
            SearchEvent::CreateSucceeded(search) => self.create_succeeded(search),
            SearchEvent::DeleteSucceeded(search) => self.delete_succeeded(&search),
            SearchEvent::Pin { search_type, query } => self.pin(search_type, &query),
            SearchEvent::PinSucceeded(search) => self.pin_succeeded(search),
            SearchEvent::Unpin { search_type } => self.unpin(search_type),
            SearchEvent::Reset => self.reset(),
        }
    }

    /// Decode a `(path, payload)` pair and apply it.
    pub fn dispatch_json(&self, event_path: &str, payload: Value) -> Result<(), EventError> {
        let event = SearchEvent::from_json(event_path, payload)?;
        self.dispatch(event);
        Ok(())
    }

    // ====================================================================
    // Internal
    // ====================================================================

    /// Apply one transition under the write lock, then notify with the
    /// new snapshot. The lock is released before handlers run.
    fn apply<F>(&self, op: &str, transition: F)
    where
        F: FnOnce(&mut SearchesState),
    {
        let snapshot = {
            let mut state = self.state.write().unwrap();
            transition(&mut state);
            state.clone()
        };
        debug!(
            "searches: {} applied, {} records",
            op,
            snapshot.saved_searches.len()
        );
        self.notify(&snapshot);
    }

    fn notify(&self, snapshot: &SearchesState) {
        // Collect handlers out of the lock so one may subscribe or
        // unsubscribe reentrantly without deadlocking.
        let handlers: Vec<ChangeHandler> = self
            .subscribers
            .read()
            .unwrap()
            .iter()
            .map(|e| Arc::clone(&e.handler))
            .collect();
        for handler in handlers {
            handler(snapshot);
        }
    }
}

impl Default for SavedSearchRegistry {
    fn default() -> Self {
        Self::new()
    }
}
