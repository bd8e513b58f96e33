//! Source identifiers and the configured source catalog.

use serde::{Deserialize, Serialize};

use crate::client::SearchError;

/// Identifier of a repository the search API can query (e.g. `arxiv`).
///
/// The valid set is not fixed at compile time; it is whatever the
/// [`SourceCatalog`] was configured with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One selectable source, as offered to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceOption {
    /// Value sent in the `source` query parameter
    pub id: SourceId,

    /// Human-readable name
    pub label: String,
}

impl SourceOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: SourceId::new(id),
            label: label.into(),
        }
    }
}

/// The sources a user may pick from, plus the one selected by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCatalog {
    options: Vec<SourceOption>,
    default: SourceId,
}

impl SourceCatalog {
    /// Build a catalog. Falls back to the first option when `default` is not
    /// one of `options`; an empty option list is rejected.
    pub fn new(options: Vec<SourceOption>, default: SourceId) -> Result<Self, SearchError> {
        let first = options
            .first()
            .map(|o| o.id.clone())
            .ok_or_else(|| SearchError::Validation("No sources configured".to_string()))?;

        let default = if options.iter().any(|o| o.id == default) {
            default
        } else {
            tracing::warn!(
                "Default source '{}' is not in the catalog, using '{}'",
                default,
                first
            );
            first
        };

        Ok(Self { options, default })
    }

    /// All configured options in display order
    pub fn options(&self) -> &[SourceOption] {
        &self.options
    }

    /// The source selected when the user has not picked one
    pub fn default_source(&self) -> &SourceId {
        &self.default
    }

    /// Look up an option by id
    pub fn get(&self, id: &str) -> Option<&SourceOption> {
        self.options.iter().find(|o| o.id.as_str() == id)
    }

    /// Resolve a user-supplied id, rejecting ids the catalog does not offer
    pub fn resolve(&self, id: &str) -> Result<SourceId, SearchError> {
        let id = id.trim();
        self.get(id)
            .map(|o| o.id.clone())
            .ok_or_else(|| SearchError::Validation(format!("Unknown source \"{}\"", id)))
    }
}

impl Default for SourceCatalog {
    fn default() -> Self {
        Self {
            options: default_source_options(),
            default: SourceId::new("arxiv"),
        }
    }
}

/// Sources served by the reference search backend
pub fn default_source_options() -> Vec<SourceOption> {
    vec![
        SourceOption::new("arxiv", "arXiv"),
        SourceOption::new("biorxiv", "bioRxiv"),
    ]
}
