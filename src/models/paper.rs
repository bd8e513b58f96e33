//! Paper model representing one search hit returned by the search API.

use serde::{Deserialize, Deserializer, Serialize};

/// A paper returned by the search API.
///
/// Results are passed through verbatim: the client never edits, sorts or
/// deduplicates them. Optional fields that the backend sends as `null` are
/// treated the same as missing ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperResult {
    /// Paper title
    pub title: String,

    /// Paper page URL
    pub link: String,

    /// Author names in the order the source lists them
    #[serde(default, deserialize_with = "null_as_empty")]
    pub authors: Vec<String>,

    /// Publication date as sent by the source (not parsed)
    #[serde(default)]
    pub published: Option<String>,

    /// Abstract or snippet
    #[serde(default)]
    pub summary: Option<String>,

    /// Display name of the repository the paper came from
    pub source: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl PaperResult {
    /// Create a result with the required fields
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            authors: Vec::new(),
            published: None,
            summary: None,
            source: source.into(),
        }
    }

    /// Set the author list
    pub fn with_authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    /// Set the publication date
    pub fn with_published(mut self, published: impl Into<String>) -> Self {
        self.published = Some(published.into());
        self
    }

    /// Set the summary
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }
}
