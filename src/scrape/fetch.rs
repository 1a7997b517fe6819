// Page fetching.
//
// The pipeline only ever needs one GET of one page, so the abstraction is a
// single-method trait. HttpPageSource does the real request; StaticPageSource
// hands back canned HTML so the rest of the pipeline can run offline.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{PipelineError, Result};

const USER_AGENT: &str = "headline-topics/0.1 (topic-modeling)";

/// Trait for anything that can produce a page body for a URL.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the body at `url`. One attempt, no retries.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Fetches pages over HTTP(S) with reqwest.
pub struct HttpPageSource {
    client: reqwest::Client,
}

impl HttpPageSource {
    /// Create a client. `timeout` of None leaves the transport's defaults.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| PipelineError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!(url = url, "GET page");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PipelineError::Network(format!("request to {url} failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(PipelineError::Network(format!("{url} returned {status}")));
        }

        let body = response.text().await?;
        debug!(url = url, bytes = body.len(), "Page fetched");
        Ok(body)
    }
}

/// Returns the same body for every URL. Used for tests and offline runs.
pub struct StaticPageSource {
    body: String,
}

impl StaticPageSource {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

#[async_trait]
impl PageSource for StaticPageSource {
    async fn fetch(&self, _url: &str) -> Result<String> {
        Ok(self.body.clone())
    }
}
