//! URL fetching for `url` submissions

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Default timeout for page fetches (seconds)
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!("satya-verify/", env!("CARGO_PKG_VERSION"));

/// Errors raised while fetching a page
#[derive(Error, Debug)]
pub enum FetchError {
    /// Network failure, timeout, or unreadable body
    #[error("Request failed: {0}")]
    Request(String),

    /// Non-success HTTP status
    #[error("HTTP {0}")]
    Status(u16),

    /// Client could not be constructed
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A fetched page, before markup stripping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// `Content-Type` header, if the server sent one
    pub content_type: Option<String>,
    /// Response body
    pub body: String,
}

/// Source of page content for `url` submissions
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch `url`; non-success statuses are errors
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// reqwest-backed fetcher
pub struct WebFetcher {
    client: reqwest::Client,
}

impl WebFetcher {
    /// Create a fetcher with the default timeout
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS))
    }

    /// Create a fetcher with an explicit timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ContentFetcher for WebFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        debug!(url, "Fetching page");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Request(format!("Failed to read body: {}", e)))?;

        debug!(url, bytes = body.len(), "Fetched page");
        Ok(FetchedPage { content_type, body })
    }
}
