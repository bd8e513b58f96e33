//! HTTP implementation of [`PaperApi`].

use async_trait::async_trait;
use std::time::Duration;

use super::{HttpClient, PaperApi, SearchError, DEFAULT_USER_AGENT};
use crate::config::Config;
use crate::models::{PaperResult, SearchQuery, SearchResponse, SourceId};

/// Query text used by the startup connectivity probe
pub const DEFAULT_PROBE_QUERY: &str = "test";

/// Client for the remote search endpoint
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: HttpClient,
    base_url: String,
    probe_query: String,
    probe_source: SourceId,
}

impl SearchClient {
    /// Create a client for `base_url` with default HTTP settings
    pub fn new(base_url: &str) -> Result<Self, SearchError> {
        Self::with_http_client(base_url, HttpClient::new()?)
    }

    /// Create with a custom HTTP client (for testing)
    pub fn with_http_client(base_url: &str, http: HttpClient) -> Result<Self, SearchError> {
        let base_url = validate_base_url(base_url)?;

        Ok(Self {
            http,
            base_url,
            probe_query: DEFAULT_PROBE_QUERY.to_string(),
            probe_source: SourceId::new("arxiv"),
        })
    }

    /// Create a client from the loaded configuration.
    ///
    /// The probe targets the catalog's default source, so a `default_source`
    /// missing from `[[sources]]` falls back the same way searches do.
    pub fn from_config(config: &Config) -> Result<Self, SearchError> {
        let user_agent = config
            .api
            .user_agent
            .as_deref()
            .unwrap_or(DEFAULT_USER_AGENT);
        let timeout = config.api.timeout_seconds.map(Duration::from_secs);
        let http = HttpClient::with_settings(user_agent, timeout)?;

        let catalog = config.catalog()?;

        Ok(Self::with_http_client(&config.api.base_url, http)?
            .with_probe(&config.probe.query, catalog.default_source().clone()))
    }

    /// Set the query and source used by [`PaperApi::probe`]
    pub fn with_probe(mut self, query: &str, source: SourceId) -> Self {
        self.probe_query = query.to_string();
        self.probe_source = source;
        self
    }

    /// The configured search endpoint
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the GET URL for a query.
    ///
    /// Text is percent-encoded the way browsers encode URI components, so a
    /// space becomes `%20` rather than `+`.
    pub fn request_url(&self, query: &SearchQuery) -> String {
        self.url_for(query.text(), query.source())
    }

    fn url_for(&self, text: &str, source: &SourceId) -> String {
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{}query={}&source={}",
            self.base_url,
            separator,
            urlencoding::encode(text),
            urlencoding::encode(source.as_str())
        )
    }

    /// Issue one search request and wait for it to complete
    pub async fn submit_search(&self, query: &SearchQuery) -> Result<Vec<PaperResult>, SearchError> {
        let url = self.request_url(query);
        tracing::debug!("Sending request to: {}", url);

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Search API returned status: {}", status);
            return Err(SearchError::Network {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        let body: SearchResponse = serde_json::from_slice(&bytes)?;

        match body.into_results() {
            Some(results) => {
                tracing::info!(
                    "Received {} results for \"{}\" from {}",
                    results.len(),
                    query.text(),
                    query.source()
                );
                Ok(results)
            }
            None => Err(SearchError::NoResults {
                query: query.text().to_string(),
            }),
        }
    }
}

fn validate_base_url(base_url: &str) -> Result<String, SearchError> {
    let base_url = base_url.trim();
    let parsed = url::Url::parse(base_url)
        .map_err(|e| SearchError::InvalidEndpoint(format!("{}: {}", base_url, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(base_url.to_string()),
        scheme => Err(SearchError::InvalidEndpoint(format!(
            "{}: unsupported scheme '{}'",
            base_url, scheme
        ))),
    }
}

#[async_trait]
impl PaperApi for SearchClient {
    fn id(&self) -> &str {
        "http"
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<PaperResult>, SearchError> {
        self.submit_search(query).await
    }

    async fn probe(&self) -> Result<(), SearchError> {
        let url = self.url_for(&self.probe_query, &self.probe_source);
        tracing::debug!("Checking connection to search service: {}", url);

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(SearchError::Network {
                status: response.status().as_u16(),
            });
        }

        Ok(())
    }
}
