//! Saved-search state engine for the faultline frontend.
//!
//! An in-memory, observable registry of saved-search records for the
//! current user/organization. Rust owns the state and the transition
//! logic; the rendering layer only subscribes and draws.
//!
//! # Three Primitives
//!
//! - `get()` — read the current `{savedSearches, isLoading, hasError}`
//!   snapshot
//! - `dispatch(event)` — apply one of the named action events (the
//!   action-creator layer calls this as its HTTP requests settle)
//! - `subscribe(handler)` — observe every state change, synchronously,
//!   in registration order
//!
//! # The Pin Invariant
//!
//! Each search type has at most one pinned search at any time. The
//! registry enforces this across optimistic pins (applied before the
//! server confirms) and server confirmations: superseded locally-owned
//! pins are dropped outright, org-custom and global searches are only
//! ever demoted to unpinned.
//!
//! # Example
//!
//! ```
//! use faultline_searches::{SavedSearchRegistry, SearchType};
//! use serde_json::json;
//!
//! let registry = SavedSearchRegistry::new();
//!
//! registry.subscribe(|state| {
//!     println!("{} searches", state.saved_searches.len());
//! });
//!
//! registry.start_fetch();
//! registry.fetch_succeeded(json!([
//!     {"id": "1", "name": "Unresolved", "type": "issue",
//!      "query": "is:unresolved", "isGlobal": true},
//! ]));
//!
//! registry.pin(SearchType::Issue, "browser:chrome");
//! assert!(registry.get().pinned(SearchType::Issue).is_some());
//! ```

pub mod event;
pub mod model;
pub mod registry;
pub mod state;

// Re-export primary types at crate root.
pub use event::{EventError, SearchEvent};
pub use model::{SavedSearch, SearchType};
pub use registry::{ChangeHandler, SavedSearchRegistry, SubscriptionId};
pub use state::SearchesState;
