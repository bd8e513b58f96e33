//! # research-hub
//!
//! A terminal client for a paper search API: type a query, pick a source,
//! read the results.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (PaperResult, SearchQuery, SourceCatalog)
//! - [`client`]: The [`PaperApi`] trait, its HTTP implementation and the error taxonomy
//! - [`session`]: Submission pipeline where the newest request always wins
//! - [`ui`]: Pure rendering, the UI state machine and the terminal presenter
//! - [`config`]: Configuration management

pub mod client;
pub mod config;
pub mod models;
pub mod session;
pub mod ui;

// Re-export commonly used types
pub use client::{PaperApi, SearchClient, SearchError};
pub use models::{PaperResult, SearchQuery};
pub use session::SearchSession;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
