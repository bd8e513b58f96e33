//! Core data models for search queries and paper results.

mod paper;
mod search;
mod source;

pub use paper::PaperResult;
pub use search::{SearchQuery, SearchResponse, EMPTY_QUERY_MESSAGE};
pub use source::{default_source_options, SourceCatalog, SourceId, SourceOption};
