//! What the screen shows.
//!
//! [`UiState`] is a closed set of modes, so the spinner, the error message
//! and the result list can never be visible together.

use std::time::Duration;

use super::render::{render_results, Card};
use crate::client::SearchError;
use crate::models::PaperResult;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UiState {
    /// Nothing submitted yet
    #[default]
    Idle,

    /// A request is in flight
    Loading { query: String },

    /// The last search returned results
    Results {
        query: String,
        results: Vec<PaperResult>,
        cards: Vec<Card>,
    },

    /// The last submission failed or found nothing
    Error { error: SearchError },
}

/// Which of the mutually exclusive elements are on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub spinner: bool,
    pub error: bool,
    pub results: bool,
}

impl UiState {
    /// State entered on submit; prior results and errors are dropped
    pub fn loading(query: impl Into<String>) -> Self {
        UiState::Loading {
            query: query.into(),
        }
    }

    /// State for a submission rejected before any request
    pub fn rejected(error: SearchError) -> Self {
        UiState::Error { error }
    }

    /// State after a request completes
    pub fn from_outcome(
        query: impl Into<String>,
        outcome: Result<Vec<PaperResult>, SearchError>,
        stagger: Duration,
    ) -> Self {
        match outcome {
            Ok(results) if results.is_empty() => UiState::Error {
                error: SearchError::NoResults {
                    query: query.into(),
                },
            },
            Ok(results) => UiState::Results {
                query: query.into(),
                cards: render_results(&results, stagger),
                results,
            },
            Err(error) => UiState::Error { error },
        }
    }

    pub fn visibility(&self) -> Visibility {
        Visibility {
            spinner: matches!(self, UiState::Loading { .. }),
            error: matches!(self, UiState::Error { .. }),
            results: matches!(self, UiState::Results { .. }),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading { .. })
    }

    /// Cards on screen; empty unless results are shown
    pub fn cards(&self) -> &[Card] {
        match self {
            UiState::Results { cards, .. } => cards,
            _ => &[],
        }
    }

    /// The error being shown, if any
    pub fn error(&self) -> Option<&SearchError> {
        match self {
            UiState::Error { error } => Some(error),
            _ => None,
        }
    }

    /// User-facing text of the error being shown, if any
    pub fn error_message(&self) -> Option<String> {
        self.error().map(SearchError::user_message)
    }
}
