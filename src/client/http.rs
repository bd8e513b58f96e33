//! HTTP client utilities.

use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use super::SearchError;

/// Default user agent, `research-hub/<version>`
pub const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client.
///
/// No request timeout is set unless one is asked for; the transport's own
/// defaults apply otherwise.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, SearchError> {
        Self::with_settings(DEFAULT_USER_AGENT, None)
    }

    /// Create a new HTTP client with a custom user agent and optional timeout
    pub fn with_settings(user_agent: &str, timeout: Option<Duration>) -> Result<Self, SearchError> {
        let mut builder = Client::builder()
            .user_agent(user_agent)
            .pool_idle_timeout(Duration::from_secs(90));

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| SearchError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Start a GET request
    pub fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.get(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_user_agent() {
        assert!(DEFAULT_USER_AGENT.starts_with("research-hub/"));
    }

    #[test]
    fn test_build_with_timeout() {
        assert!(HttpClient::with_settings("test-agent", Some(Duration::from_secs(5))).is_ok());
    }
}
