//! Mock search API for testing purposes.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::{PaperApi, SearchError};
use crate::models::{PaperResult, SearchQuery};

type Scripted = (Result<Vec<PaperResult>, SearchError>, Duration);

/// A mock API that replays scripted responses in order.
///
/// Each response may carry a delay, which makes it possible to stage
/// overlapping searches. When the script runs dry every search answers with
/// [`SearchError::NoResults`].
#[derive(Debug, Default)]
pub struct MockApi {
    script: Mutex<VecDeque<Scripted>>,
    queries: Mutex<Vec<SearchQuery>>,
    calls: AtomicUsize,
    probe_error: Mutex<Option<SearchError>>,
}

impl MockApi {
    /// Create a new mock API.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response that is returned immediately.
    pub fn push_response(&self, response: Result<Vec<PaperResult>, SearchError>) {
        self.push_delayed(response, Duration::ZERO);
    }

    /// Queue a response that is returned after `delay`.
    pub fn push_delayed(&self, response: Result<Vec<PaperResult>, SearchError>, delay: Duration) {
        lock(&self.script).push_back((response, delay));
    }

    /// Make [`PaperApi::probe`] fail with `error`.
    pub fn fail_probe(&self, error: SearchError) {
        *lock(&self.probe_error) = Some(error);
    }

    /// Number of searches issued so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Queries received, in call order.
    pub fn queries(&self) -> Vec<SearchQuery> {
        lock(&self.queries).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl PaperApi for MockApi {
    fn id(&self) -> &str {
        "mock"
    }

    fn endpoint(&self) -> &str {
        "mock://search"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<PaperResult>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.queries).push(query.clone());

        let next = lock(&self.script).pop_front();
        match next {
            Some((response, delay)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                response
            }
            None => Err(SearchError::NoResults {
                query: query.text().to_string(),
            }),
        }
    }

    async fn probe(&self) -> Result<(), SearchError> {
        let probe_error = lock(&self.probe_error).clone();
        match probe_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Helper function to create a mock paper for testing.
pub fn make_paper(title: &str, authors: &[&str]) -> PaperResult {
    let slug = title.to_lowercase().replace(' ', "-");
    PaperResult::new(title, format!("http://example.com/{}", slug), "arXiv")
        .with_authors(authors.iter().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceId;

    #[tokio::test]
    async fn test_replays_script_in_order() {
        let api = MockApi::new();
        api.push_response(Ok(vec![make_paper("One", &[])]));
        api.push_response(Err(SearchError::Network { status: 502 }));

        let query = SearchQuery::new("q", SourceId::new("arxiv")).unwrap();
        assert_eq!(api.search(&query).await.unwrap()[0].title, "One");
        assert_eq!(
            api.search(&query).await.unwrap_err(),
            SearchError::Network { status: 502 }
        );
        assert!(matches!(
            api.search(&query).await,
            Err(SearchError::NoResults { .. })
        ));
        assert_eq!(api.calls(), 3);
        assert_eq!(api.queries().len(), 3);
    }

    #[tokio::test]
    async fn test_probe_failure() {
        let api = MockApi::new();
        assert!(api.probe().await.is_ok());

        api.fail_probe(SearchError::Transport("connection refused".into()));
        assert!(api.probe().await.is_err());
    }

    #[test]
    fn test_make_paper() {
        let paper = make_paper("Deep Learning", &["LeCun", "Bengio"]);
        assert_eq!(paper.link, "http://example.com/deep-learning");
        assert_eq!(paper.authors, vec!["LeCun", "Bengio"]);
    }
}
