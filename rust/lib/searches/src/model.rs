//! Saved-search records — the camelCase wire shape the backend serves.

use serde::{Deserialize, Serialize};

/// Scope category for a saved search.
///
/// Pin-uniqueness is enforced per type: each type has at most one pinned
/// search at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchType {
    Issue,
    Event,
    Session,
}

/// A saved search as the backend serializes it.
///
/// `id: None` marks a transient pinned record: a pin the server has not
/// yet been asked to persist as a distinct entity. Booleans and the id
/// take defaults on deserialize so a sparse server record still parses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSearch {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub search_type: SearchType,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub is_org_custom: bool,
    #[serde(default)]
    pub is_global: bool,
}

impl SavedSearch {
    /// Display name given to a locally synthesized pinned record.
    pub const PINNED_NAME: &'static str = "My Pinned Search";

    /// Build the transient pinned record for a query the user pinned
    /// before any saved search with that query exists server-side.
    pub fn transient_pin(search_type: SearchType, query: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Self::PINNED_NAME.to_string(),
            search_type,
            query: query.into(),
            is_pinned: true,
            is_org_custom: false,
            is_global: false,
        }
    }

    /// A locally-owned simple pin: pinned, neither org-custom nor global.
    ///
    /// The server does not persist these as independent entities; they
    /// exist only as the single allowed per-type pin, and are dropped
    /// outright when superseded or explicitly unpinned. Org-custom and
    /// global records have their own lifecycle and are only ever demoted.
    pub fn is_local_pin(&self) -> bool {
        self.is_pinned && !self.is_org_custom && !self.is_global
    }
}
