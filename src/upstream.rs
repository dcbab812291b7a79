// Upstream expense API client
//
// One outbound call per gateway operation. No retries, no fallback; every failure
// surfaces as an UpstreamError.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::GatewayConfig;
use crate::model::{Expense, ExpenseDraft};

/// Anything that went wrong talking to the upstream service
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection failure, timeout, or an unreadable response
    #[error("upstream request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The upstream answered with a non-2xx status
    #[error("upstream responded with {status}")]
    Status {
        status: StatusCode,
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not the expected JSON
    #[error("upstream returned an unexpected payload: {0}")]
    Decode(#[source] serde_json::Error),
}

impl UpstreamError {
    /// Status code of the upstream answer, if it answered at all
    pub fn upstream_status(&self) -> Option<StatusCode> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => UpstreamError::Status { status, source: err },
            None => UpstreamError::Request(err),
        }
    }
}

pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// HTTP client for the upstream expense collection
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> UpstreamResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(UpstreamError::Request)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &GatewayConfig) -> UpstreamResult<Self> {
        Self::new(config.upstream_url.clone(), config.upstream_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn record_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(id))
    }

    // ========================================================================
    // OPERATIONS
    // ========================================================================

    /// Full collection, exactly as the upstream sent it
    pub async fn list_raw(&self) -> UpstreamResult<Value> {
        self.send_json(self.client.get(&self.base_url)).await
    }

    /// Full collection, decoded for aggregation
    pub async fn list(&self) -> UpstreamResult<Vec<Expense>> {
        self.send_json(self.client.get(&self.base_url)).await
    }

    pub async fn get(&self, id: &str) -> UpstreamResult<Value> {
        self.send_json(self.client.get(self.record_url(id))).await
    }

    pub async fn create(&self, draft: &ExpenseDraft) -> UpstreamResult<Value> {
        self.send_json(self.client.post(&self.base_url).json(draft)).await
    }

    pub async fn replace(&self, id: &str, draft: &ExpenseDraft) -> UpstreamResult<Value> {
        self.send_json(self.client.put(self.record_url(id)).json(draft))
            .await
    }

    /// Delete a record; whatever body the upstream returns is discarded
    pub async fn delete(&self, id: &str) -> UpstreamResult<()> {
        self.send(self.client.delete(self.record_url(id))).await?;
        Ok(())
    }

    // ========================================================================
    // TRANSPORT
    // ========================================================================

    async fn send(&self, request: RequestBuilder) -> UpstreamResult<reqwest::Response> {
        let response = request.send().await?;
        debug!(status = %response.status(), url = %response.url(), "upstream responded");
        Ok(response.error_for_status()?)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> UpstreamResult<T> {
        let body = self.send(request).await?.bytes().await?;
        serde_json::from_slice(&body).map_err(UpstreamError::Decode)
    }
}

// ============================================================================
// TESTS
// ============================================================================
