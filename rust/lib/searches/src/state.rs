//! Aggregate saved-search state and its transitions.
//!
//! Every transition is a synchronous, in-memory step that cannot fail:
//! a malformed bulk-fetch payload is coerced to empty rather than
//! rejected, and pin/unpin rebuild the collection so the per-type
//! pin-uniqueness invariant holds after every step.
//!
//! Transitions are crate-private; all mutation goes through the named
//! operations on [`SavedSearchRegistry`](crate::registry::SavedSearchRegistry),
//! which notifies subscribers after each one.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::model::{SavedSearch, SearchType};

/// The full snapshot observers receive on every change.
///
/// Serializes as `{"savedSearches": [...], "isLoading": ..., "hasError": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchesState {
    /// Insertion-ordered collection; order is preserved for display.
    pub saved_searches: Vec<SavedSearch>,
    /// True while an initial or refresh fetch is outstanding.
    pub is_loading: bool,
    /// True if the last bulk fetch failed. Cleared only by reset.
    pub has_error: bool,
}

impl Default for SearchesState {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchesState {
    /// Initial state: empty, loading, no error.
    pub fn new() -> Self {
        Self {
            saved_searches: Vec::new(),
            is_loading: true,
            has_error: false,
        }
    }

    /// The single pinned search of a type, if any.
    pub fn pinned(&self, search_type: SearchType) -> Option<&SavedSearch> {
        self.saved_searches
            .iter()
            .find(|s| s.search_type == search_type && s.is_pinned)
    }

    /// First record whose query exactly equals `query`.
    ///
    /// Linear scan, first occurrence, case-sensitive, no normalization:
    /// a query differing only by whitespace is a distinct search.
    pub fn find_by_query(&self, query: &str) -> Option<&SavedSearch> {
        self.saved_searches.iter().find(|s| s.query == query)
    }

    // ====================================================================
    // Transitions
    // ====================================================================

    /// A fetch went out. Previously loaded searches stay visible while
    /// the refresh is in flight.
    pub(crate) fn start_fetch(&mut self) {
        self.is_loading = true;
    }

    /// A fetch came back. Replaces the collection wholesale.
    pub(crate) fn fetch_succeeded(&mut self, data: Value) {
        self.saved_searches = parse_records(data);
        self.is_loading = false;
    }

    /// A fetch failed. Discards previously loaded data.
    pub(crate) fn fetch_failed(&mut self) {
        self.saved_searches.clear();
        self.is_loading = false;
        self.has_error = true;
    }

    /// Back to the initial state. Used when the scoping context (the
    /// current organization) changes, so stale cross-context data is
    /// never shown.
    pub(crate) fn reset(&mut self) {
        *self = Self::new();
    }

    /// A search was created server-side. Appended as-is; a freshly
    /// created search is assumed unpinned, so no uniqueness check.
    pub(crate) fn create_succeeded(&mut self, search: SavedSearch) {
        self.saved_searches.push(search);
    }

    /// A search was deleted server-side. Removes by id.
    pub(crate) fn delete_succeeded(&mut self, search: &SavedSearch) {
        self.saved_searches.retain(|s| s.id != search.id);
    }

    /// Optimistically pin `query` within `search_type`, before the server
    /// confirms.
    ///
    /// The first record matching `query` becomes the pin; if none exists
    /// a transient record is synthesized. Either way the pinned record
    /// moves to the front, superseded local pins of the type are dropped
    /// outright, and every other record of the type is demoted to
    /// unpinned (org-custom and global records are demoted, not deleted).
    pub(crate) fn pin(&mut self, search_type: SearchType, query: &str) {
        let existing = self.saved_searches.iter().position(|s| s.query == query);
        let pinned = match existing {
            Some(idx) => {
                let mut s = self.saved_searches[idx].clone();
                s.is_pinned = true;
                s
            }
            None => SavedSearch::transient_pin(search_type, query),
        };
        // The just-pinned record's id shields it from the supersede
        // filter: an org-custom or global record being re-pinned must not
        // be swept up by its own pass.
        let shield = existing.map(|idx| self.saved_searches[idx].id.clone());

        let previous = std::mem::take(&mut self.saved_searches);
        let mut rebuilt = Vec::with_capacity(previous.len() + 1);
        rebuilt.push(pinned);
        for (idx, mut s) in previous.into_iter().enumerate() {
            if existing == Some(idx) {
                continue; // moved to the front
            }
            if s.search_type == search_type
                && s.is_local_pin()
                && shield.as_ref() != Some(&s.id)
            {
                debug!("dropping superseded local pin: {}", s.query);
                continue;
            }
            if s.search_type == search_type {
                s.is_pinned = false;
            }
            rebuilt.push(s);
        }
        self.saved_searches = rebuilt;
    }

    /// The server confirmed a pin. Merges the server record into the
    /// first record matching its query, in place: the server-assigned
    /// id replaces the transient `None`, position is preserved. No
    /// uniqueness re-enforcement: the optimistic step already did it.
    pub(crate) fn pin_succeeded(&mut self, server_record: SavedSearch) {
        match self
            .saved_searches
            .iter_mut()
            .find(|s| s.query == server_record.query)
        {
            Some(s) => *s = server_record,
            None => warn!(
                "pin confirmation for unknown query, ignoring: {}",
                server_record.query
            ),
        }
    }

    /// Unpin within `search_type`: every locally-owned simple pin of the
    /// type is dropped outright, every remaining record of the type is
    /// demoted to unpinned. Idempotent.
    pub(crate) fn unpin(&mut self, search_type: SearchType) {
        self.saved_searches
            .retain(|s| !(s.search_type == search_type && s.is_local_pin()));
        for s in &mut self.saved_searches {
            if s.search_type == search_type {
                s.is_pinned = false;
            }
        }
    }
}

/// Coerce a bulk-fetch payload into records.
///
/// A non-array payload yields the empty collection: a malformed server
/// response must not crash the registry. Array elements that fail to
/// parse are skipped; the valid remainder is kept.
fn parse_records(data: Value) -> Vec<SavedSearch> {
    let Value::Array(items) = data else {
        warn!("saved-search fetch payload is not an array, coercing to empty");
        return Vec::new();
    };
    let total = items.len();
    let records: Vec<SavedSearch> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<SavedSearch>(item) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!("skipping malformed saved-search record: {}", err);
                None
            }
        })
        .collect();
    debug!("parsed {} of {} saved-search records", records.len(), total);
    records
}
