//! The search session: submit pipeline and UI state publication.
//!
//! A session owns the API handle and the current [`UiState`]. Frontends
//! subscribe to state changes through a [`tokio::sync::watch`] channel and
//! call [`SearchSession::submit`] for every user submission.
//!
//! # Overlapping submissions
//!
//! Each submission starts a new generation and gets its own
//! [`CancellationToken`]. Starting a generation cancels the previous token,
//! so an older request stops waiting as soon as a newer one is submitted, and
//! an outcome is only published if its generation is still the newest. The
//! newest request always wins, whatever order the responses arrive in.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::client::{PaperApi, SearchError};
use crate::models::{SearchQuery, SourceId};
use crate::ui::UiState;

/// How a submission ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The submission's final state was published
    Applied(UiState),

    /// A newer submission started first; this one's outcome was discarded
    Superseded,
}

impl Completion {
    pub fn state(&self) -> Option<&UiState> {
        match self {
            Completion::Applied(state) => Some(state),
            Completion::Superseded => None,
        }
    }
}

/// Outcome of the connectivity probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub endpoint: String,
    pub result: Result<(), SearchError>,
}

impl ProbeReport {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Diagnostic line for the user
    pub fn message(&self) -> String {
        match &self.result {
            Ok(()) => format!("Connected to search service at {}", self.endpoint),
            Err(e) => format!(
                "Cannot connect to the search service at {} ({}). Make sure it is running.",
                self.endpoint, e
            ),
        }
    }
}

#[derive(Debug, Default)]
struct InFlight {
    generation: u64,
    token: Option<CancellationToken>,
}

/// A search session bound to one backend
#[derive(Debug)]
pub struct SearchSession {
    api: Arc<dyn PaperApi>,
    stagger: Duration,
    state: watch::Sender<UiState>,
    in_flight: Mutex<InFlight>,
}

impl SearchSession {
    /// Create a session. `stagger` is the delay between consecutive cards.
    pub fn new(api: Arc<dyn PaperApi>, stagger: Duration) -> Self {
        let (state, _) = watch::channel(UiState::Idle);

        Self {
            api,
            stagger,
            state,
            in_flight: Mutex::new(InFlight::default()),
        }
    }

    /// Receive every published state change
    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.state.subscribe()
    }

    /// The state currently on screen
    pub fn state(&self) -> UiState {
        self.state.borrow().clone()
    }

    /// Handle one user submission.
    ///
    /// Whitespace-only text is rejected without contacting the API. Any
    /// submission, including a rejected one, supersedes the request before it.
    pub async fn submit(&self, text: &str, source: SourceId) -> Completion {
        let (generation, token) = self.begin();

        let query = match SearchQuery::new(text, source) {
            Ok(query) => query,
            Err(e) => {
                tracing::debug!("Rejected submission: {}", e);
                return self.finish(generation, UiState::rejected(e));
            }
        };

        if !self.publish(generation, UiState::loading(query.text()), false) {
            return Completion::Superseded;
        }

        tracing::debug!(
            "Search #{} started: \"{}\" on {} via {}",
            generation,
            query.text(),
            query.source(),
            self.api.id()
        );

        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::debug!("Search #{} cancelled by a newer submission", generation);
                return Completion::Superseded;
            }
            outcome = self.api.search(&query) => outcome,
        };

        if let Err(e) = &outcome {
            tracing::info!("Search #{} failed: {}", generation, e);
        }

        let state = UiState::from_outcome(query.text(), outcome, self.stagger);
        self.finish(generation, state)
    }

    /// Run the connectivity probe. Never changes the UI state.
    pub async fn probe(&self) -> ProbeReport {
        let result = self.api.probe().await;
        match &result {
            Ok(()) => tracing::info!("Search service reachable at {}", self.api.endpoint()),
            Err(e) => tracing::warn!(
                "Search service connection check failed for {}: {}",
                self.api.endpoint(),
                e
            ),
        }

        ProbeReport {
            endpoint: self.api.endpoint().to_string(),
            result,
        }
    }

    /// Start a new generation, cancelling whatever was in flight
    fn begin(&self) -> (u64, CancellationToken) {
        let mut in_flight = self.lock();
        if let Some(previous) = in_flight.token.take() {
            previous.cancel();
        }

        let token = CancellationToken::new();
        in_flight.generation += 1;
        in_flight.token = Some(token.clone());

        (in_flight.generation, token)
    }

    fn finish(&self, generation: u64, state: UiState) -> Completion {
        if self.publish(generation, state.clone(), true) {
            Completion::Applied(state)
        } else {
            tracing::debug!("Discarding stale response for search #{}", generation);
            Completion::Superseded
        }
    }

    /// Publish `state` if `generation` is still the newest
    fn publish(&self, generation: u64, state: UiState, done: bool) -> bool {
        let mut in_flight = self.lock();
        if in_flight.generation != generation {
            return false;
        }

        if done {
            in_flight.token = None;
        }
        self.state.send_replace(state);
        true
    }

    fn lock(&self) -> MutexGuard<'_, InFlight> {
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::make_paper;
    use crate::client::MockApi;

    fn session(api: &Arc<MockApi>) -> Arc<SearchSession> {
        Arc::new(SearchSession::new(api.clone(), Duration::from_millis(100)))
    }

    fn arxiv() -> SourceId {
        SourceId::new("arxiv")
    }

    #[tokio::test]
    async fn test_whitespace_never_reaches_api() {
        let api = Arc::new(MockApi::new());
        let session = session(&api);

        for text in ["", "   ", "\t\n"] {
            let completion = session.submit(text, arxiv()).await;
            let state = completion.state().unwrap();
            assert_eq!(
                state.error_message().as_deref(),
                Some("Please enter a search term")
            );
        }

        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_results_published() {
        let api = Arc::new(MockApi::new());
        api.push_response(Ok(vec![
            make_paper("First", &["A", "B", "C", "D", "E"]),
            make_paper("Second", &[]),
        ]));
        let session = session(&api);
        let rx = session.subscribe();

        session.submit("  quantum computing ", arxiv()).await;

        let state = rx.borrow().clone();
        assert_eq!(state.cards().len(), 2);
        assert_eq!(state.cards()[0].authors, "A, B, C, et al.");
        assert_eq!(state.cards()[1].authors, "Unknown authors");
        assert_eq!(api.queries()[0].text(), "quantum computing");
    }

    #[tokio::test]
    async fn test_error_replaces_results() {
        let api = Arc::new(MockApi::new());
        api.push_response(Ok(vec![make_paper("Kept", &[])]));
        api.push_response(Err(SearchError::Network { status: 500 }));
        let session = session(&api);

        session.submit("one", arxiv()).await;
        assert_eq!(session.state().cards().len(), 1);

        session.submit("two", arxiv()).await;
        let state = session.state();
        assert!(state.cards().is_empty());
        assert!(state.error_message().unwrap().contains("500"));
    }

    #[tokio::test]
    async fn test_newest_request_wins() {
        let api = Arc::new(MockApi::new());
        api.push_delayed(
            Ok(vec![make_paper("Slow and stale", &[])]),
            Duration::from_millis(300),
        );
        api.push_delayed(
            Ok(vec![make_paper("Fresh", &[])]),
            Duration::from_millis(10),
        );
        let session = session(&api);

        let first = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.submit("old query", arxiv()).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(session.state().is_loading());

        let second = session.submit("new query", arxiv()).await;
        assert_eq!(second.state().unwrap().cards()[0].title, "Fresh");
        assert_eq!(first.await.unwrap(), Completion::Superseded);

        tokio::time::sleep(Duration::from_millis(350)).await;
        assert_eq!(session.state().cards()[0].title, "Fresh");
        assert_eq!(api.calls(), 2);
    }

    #[tokio::test]
    async fn test_rejected_submission_supersedes_in_flight_search() {
        let api = Arc::new(MockApi::new());
        api.push_delayed(
            Ok(vec![make_paper("Late", &[])]),
            Duration::from_millis(200),
        );
        let session = session(&api);

        let first = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.submit("real", arxiv()).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        session.submit("   ", arxiv()).await;
        assert_eq!(first.await.unwrap(), Completion::Superseded);
        assert!(session.state().error().is_some());
    }

    #[tokio::test]
    async fn test_probe_report() {
        let api = Arc::new(MockApi::new());
        let session = session(&api);

        let report = session.probe().await;
        assert!(report.is_ok());
        assert!(report.message().starts_with("Connected"));

        api.fail_probe(SearchError::Transport("connection refused".into()));
        let report = session.probe().await;
        assert!(!report.is_ok());
        assert!(report.message().contains("mock://search"));
        assert_eq!(session.state(), UiState::Idle);
    }
}
