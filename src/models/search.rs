//! Search request and response models.

use serde::{Deserialize, Serialize};

use super::{PaperResult, SourceId};
use crate::client::SearchError;

/// Message shown when the query text is empty after trimming
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a search term";

/// A validated search request: non-empty text plus the selected source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Trimmed query text, never empty
    text: String,

    /// Selected source
    source: SourceId,
}

impl SearchQuery {
    /// Build a query from raw user input.
    ///
    /// The text is trimmed; whitespace-only input is rejected before any
    /// request can be issued.
    pub fn new(text: &str, source: SourceId) -> Result<Self, SearchError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SearchError::Validation(EMPTY_QUERY_MESSAGE.to_string()));
        }

        Ok(Self {
            text: text.to_string(),
            source,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> &SourceId {
        &self.source
    }
}

/// Body returned by the search API.
///
/// A missing `results` key is not a decode error; it means nothing was found.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Option<Vec<PaperResult>>,
}

impl SearchResponse {
    /// The results, or `None` when the response carries none
    pub fn into_results(self) -> Option<Vec<PaperResult>> {
        self.results.filter(|r| !r.is_empty())
    }
}
