//! Search API client.
//!
//! This module defines the [`PaperApi`] trait the rest of the crate talks to,
//! the [`SearchError`] taxonomy, and the HTTP implementation [`SearchClient`].
//! [`MockApi`] is a scripted implementation for tests and offline demos.
//!
//! # Request format
//!
//! Every search is a single GET:
//!
//! ```text
//! {base_url}?query=<percent-encoded text>&source=<source id>
//! ```
//!
//! and the API answers with `{"results": [...]}`. Nothing is retried or
//! cached; each call is exactly one network exchange.

mod http;
pub mod mock;
mod search;

pub use http::{HttpClient, DEFAULT_USER_AGENT};
pub use mock::MockApi;
pub use search::{SearchClient, DEFAULT_PROBE_QUERY};

use crate::models::{PaperResult, SearchQuery};
use async_trait::async_trait;

/// The interface the search session uses to reach a search backend.
#[async_trait]
pub trait PaperApi: Send + Sync + std::fmt::Debug {
    /// Short identifier used in logs
    fn id(&self) -> &str;

    /// Where requests go, for diagnostics
    fn endpoint(&self) -> &str;

    /// Run one search. Zero results is reported as [`SearchError::NoResults`].
    async fn search(&self, query: &SearchQuery) -> Result<Vec<PaperResult>, SearchError>;

    /// Check that the backend is reachable
    async fn probe(&self) -> Result<(), SearchError> {
        Ok(())
    }
}

/// Errors that can end a search attempt.
///
/// None of them are fatal to the client: after any of these the session
/// accepts the next submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Input rejected before any request was made
    #[error("{0}")]
    Validation(String),

    /// The API answered with a non-2xx status
    #[error("Network response was not ok ({status})")]
    Network { status: u16 },

    /// The request never produced a usable response (DNS, refused
    /// connection, timeout, unreadable body)
    #[error("{0}")]
    Transport(String),

    /// The API answered successfully but found nothing
    #[error("No results found for \"{query}\"")]
    NoResults { query: String },

    /// The configured base URL is not a usable HTTP endpoint
    #[error("Invalid search endpoint: {0}")]
    InvalidEndpoint(String),
}

impl SearchError {
    /// Text shown to the user for this error
    pub fn user_message(&self) -> String {
        if self.is_fetch_failure() {
            format!("Error fetching results: {}", self)
        } else {
            self.to_string()
        }
    }

    /// Whether the error came from talking to the backend
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            SearchError::Network { .. } | SearchError::Transport(_)
        )
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        SearchError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::Transport(format!("Invalid response body: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert_eq!(
            SearchError::Validation("Please enter a search term".into()).user_message(),
            "Please enter a search term"
        );
        assert_eq!(
            SearchError::Network { status: 503 }.user_message(),
            "Error fetching results: Network response was not ok (503)"
        );
        assert_eq!(
            SearchError::Transport("connection refused".into()).user_message(),
            "Error fetching results: connection refused"
        );
        assert_eq!(
            SearchError::NoResults {
                query: "dark matter".into()
            }
            .user_message(),
            "No results found for \"dark matter\""
        );
    }

    #[test]
    fn test_fetch_failure_classification() {
        assert!(SearchError::Network { status: 404 }.is_fetch_failure());
        assert!(SearchError::Transport("timeout".into()).is_fetch_failure());
        assert!(!SearchError::NoResults { query: "x".into() }.is_fetch_failure());
        assert!(!SearchError::Validation("x".into()).is_fetch_failure());
    }

    #[test]
    fn test_json_error_maps_to_transport() {
        let err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        match SearchError::from(err) {
            SearchError::Transport(msg) => assert!(msg.starts_with("Invalid response body")),
            other => panic!("unexpected {:?}", other),
        }
    }
}
