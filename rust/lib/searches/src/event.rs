//! Inbound action events.
//!
//! The registry consumes a fixed set of named events; the surrounding
//! action-creator layer (which owns HTTP requests, retries, and error
//! toasts) dispatches one of these after each request settles. Each
//! event has a stable path name so dispatchers that speak JSON can
//! address it: [`SearchEvent::from_json`] decodes a `(path, payload)`
//! pair into a typed event.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::model::{SavedSearch, SearchType};

/// Stable path names, one per event.
pub mod path {
    pub const FETCH_START: &str = "searches/fetch/start";
    pub const FETCH_SUCCESS: &str = "searches/fetch/success";
    pub const FETCH_ERROR: &str = "searches/fetch/error";
    pub const CREATE_SUCCESS: &str = "searches/create/success";
    pub const DELETE_SUCCESS: &str = "searches/delete/success";
    pub const PIN: &str = "searches/pin";
    pub const PIN_SUCCESS: &str = "searches/pin/success";
    pub const UNPIN: &str = "searches/unpin";
    pub const RESET: &str = "searches/reset";
}

#[derive(Error, Debug)]
pub enum EventError {
    #[error("unknown event path: {0}")]
    UnknownPath(String),

    #[error("bad payload for {path}: {source}")]
    Payload {
        path: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// One inbound action event.
///
/// `FetchSucceeded` carries the raw JSON payload: coercing a malformed
/// body is the transition's job, never a decode error.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    StartFetch,
    FetchSucceeded(Value),
    FetchFailed,
    CreateSucceeded(SavedSearch),
    DeleteSucceeded(SavedSearch),
    Pin {
        search_type: SearchType,
        query: String,
    },
    PinSucceeded(SavedSearch),
    Unpin {
        search_type: SearchType,
    },
    Reset,
}

#[derive(Deserialize)]
struct PinPayload {
    #[serde(rename = "type")]
    search_type: SearchType,
    query: String,
}

#[derive(Deserialize)]
struct UnpinPayload {
    #[serde(rename = "type")]
    search_type: SearchType,
}

impl SearchEvent {
    /// The stable path name of this event.
    pub fn path(&self) -> &'static str {
        match self {
            SearchEvent::StartFetch => path::FETCH_START,
            SearchEvent::FetchSucceeded(_) => path::FETCH_SUCCESS,
            SearchEvent::FetchFailed => path::FETCH_ERROR,
            SearchEvent::CreateSucceeded(_) => path::CREATE_SUCCESS,
            SearchEvent::DeleteSucceeded(_) => path::DELETE_SUCCESS,
            SearchEvent::Pin { .. } => path::PIN,
            SearchEvent::PinSucceeded(_) => path::PIN_SUCCESS,
            SearchEvent::Unpin { .. } => path::UNPIN,
            SearchEvent::Reset => path::RESET,
        }
    }

    /// Decode a path + JSON payload into a typed event.
    ///
    /// Payload-free events ignore whatever payload they are given.
    pub fn from_json(event_path: &str, payload: Value) -> Result<Self, EventError> {
        match event_path {
            path::FETCH_START => Ok(SearchEvent::StartFetch),
            path::FETCH_SUCCESS => Ok(SearchEvent::FetchSucceeded(payload)),
            path::FETCH_ERROR => Ok(SearchEvent::FetchFailed),
            path::CREATE_SUCCESS => {
                decode(path::CREATE_SUCCESS, payload).map(SearchEvent::CreateSucceeded)
            }
            path::DELETE_SUCCESS => {
                decode(path::DELETE_SUCCESS, payload).map(SearchEvent::DeleteSucceeded)
            }
            path::PIN => decode::<PinPayload>(path::PIN, payload).map(|p| SearchEvent::Pin {
                search_type: p.search_type,
                query: p.query,
            }),
            path::PIN_SUCCESS => {
                decode(path::PIN_SUCCESS, payload).map(SearchEvent::PinSucceeded)
            }
            path::UNPIN => decode::<UnpinPayload>(path::UNPIN, payload).map(|p| {
                SearchEvent::Unpin {
                    search_type: p.search_type,
                }
            }),
            path::RESET => Ok(SearchEvent::Reset),
            other => Err(EventError::UnknownPath(other.to_string())),
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(
    event_path: &'static str,
    payload: Value,
) -> Result<T, EventError> {
    serde_json::from_value(payload).map_err(|source| EventError::Payload {
        path: event_path,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ========================================================================
    // Decode — payload-free events
    // ========================================================================

    #[test]
    fn decode_fetch_start() {
        let event = SearchEvent::from_json(path::FETCH_START, json!(null)).unwrap();
        assert_eq!(event, SearchEvent::StartFetch);
    }

    #[test]
    fn decode_fetch_error_ignores_payload() {
        let event =
            SearchEvent::from_json(path::FETCH_ERROR, json!({"detail": "500"})).unwrap();
        assert_eq!(event, SearchEvent::FetchFailed);
    }

    #[test]
    fn decode_reset() {
        let event = SearchEvent::from_json(path::RESET, json!(null)).unwrap();
        assert_eq!(event, SearchEvent::Reset);
    }

    // ========================================================================
    // Decode — record payloads
    // ========================================================================

    #[test]
    fn decode_create_success() {
        let event = SearchEvent::from_json(
            path::CREATE_SUCCESS,
            json!({"id": "1", "type": "issue", "query": "a"}),
        )
        .unwrap();

        match event {
            SearchEvent::CreateSucceeded(search) => {
                assert_eq!(search.id.as_deref(), Some("1"));
                assert_eq!(search.query, "a");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn decode_delete_success() {
        let event = SearchEvent::from_json(
            path::DELETE_SUCCESS,
            json!({"id": "7", "type": "issue"}),
        )
        .unwrap();
        assert!(matches!(event, SearchEvent::DeleteSucceeded(s) if s.id.as_deref() == Some("7")));
    }

    #[test]
    fn decode_pin_success() {
        let event = SearchEvent::from_json(
            path::PIN_SUCCESS,
            json!({"id": "42", "type": "issue", "query": "q", "isPinned": true}),
        )
        .unwrap();
        assert!(matches!(event, SearchEvent::PinSucceeded(s) if s.is_pinned));
    }

    // ========================================================================
    // Decode — pin / unpin
    // ========================================================================

    #[test]
    fn decode_pin() {
        let event = SearchEvent::from_json(
            path::PIN,
            json!({"type": "issue", "query": "is:unresolved"}),
        )
        .unwrap();
        assert_eq!(
            event,
            SearchEvent::Pin {
                search_type: SearchType::Issue,
                query: "is:unresolved".into(),
            }
        );
    }

    #[test]
    fn decode_unpin() {
        let event = SearchEvent::from_json(path::UNPIN, json!({"type": "event"})).unwrap();
        assert_eq!(
            event,
            SearchEvent::Unpin {
                search_type: SearchType::Event,
            }
        );
    }

    // ========================================================================
    // Decode — fetch success passes payload through raw
    // ========================================================================

    #[test]
    fn fetch_success_is_never_a_decode_error() {
        for payload in [json!(null), json!("oops"), json!({"a": 1}), json!([1, 2])] {
            let event = SearchEvent::from_json(path::FETCH_SUCCESS, payload.clone()).unwrap();
            assert_eq!(event, SearchEvent::FetchSucceeded(payload));
        }
    }

    // ========================================================================
    // Decode — errors
    // ========================================================================

    #[test]
    fn unknown_path_is_an_error() {
        let err = SearchEvent::from_json("searches/pinn", json!(null)).unwrap_err();
        assert!(matches!(err, EventError::UnknownPath(p) if p == "searches/pinn"));
    }

    #[test]
    fn pin_without_query_is_a_payload_error() {
        let err = SearchEvent::from_json(path::PIN, json!({"type": "issue"})).unwrap_err();
        match err {
            EventError::Payload { path: p, .. } => assert_eq!(p, path::PIN),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn create_with_malformed_record_is_a_payload_error() {
        let err =
            SearchEvent::from_json(path::CREATE_SUCCESS, json!({"query": "no type"})).unwrap_err();
        assert!(matches!(err, EventError::Payload { .. }));
    }

    #[test]
    fn error_display() {
        let err = SearchEvent::from_json("nope", json!(null)).unwrap_err();
        assert_eq!(err.to_string(), "unknown event path: nope");

        let err = SearchEvent::from_json(path::UNPIN, json!(null)).unwrap_err();
        assert!(err.to_string().starts_with("bad payload for searches/unpin"));
    }

    // ========================================================================
    // path() round trip
    // ========================================================================

    #[test]
    fn path_round_trips_through_from_json() {
        let record = json!({"id": "1", "type": "issue", "query": "q"});
        let events = vec![
            (SearchEvent::StartFetch, json!(null)),
            (SearchEvent::FetchSucceeded(json!([])), json!([])),
            (SearchEvent::FetchFailed, json!(null)),
            (
                SearchEvent::CreateSucceeded(serde_json::from_value(record.clone()).unwrap()),
                record.clone(),
            ),
            (
                SearchEvent::DeleteSucceeded(serde_json::from_value(record.clone()).unwrap()),
                record.clone(),
            ),
            (
                SearchEvent::Pin {
                    search_type: SearchType::Issue,
                    query: "q".into(),
                },
                json!({"type": "issue", "query": "q"}),
            ),
            (
                SearchEvent::PinSucceeded(serde_json::from_value(record.clone()).unwrap()),
                record,
            ),
            (
                SearchEvent::Unpin {
                    search_type: SearchType::Issue,
                },
                json!({"type": "issue"}),
            ),
            (SearchEvent::Reset, json!(null)),
        ];

        for (event, payload) in events {
            let decoded = SearchEvent::from_json(event.path(), payload).unwrap();
            assert_eq!(decoded, event);
        }
    }
}
