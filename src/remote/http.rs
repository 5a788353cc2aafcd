//! HTTP client for the remote event store.
//!
//! ## Configuration
//!
//! All settings can be configured via environment variables:
//! - `CAUSAL_EVENTS_API_BASE`: API base URL (default: `http://localhost:8080/api`)
//! - `CAUSAL_EVENTS_TIMEOUT_SECS`: Request timeout (default: 10)

use async_trait::async_trait;
use std::time::Duration;

use crate::types::EventRecord;
use super::{RemoteStore, SubmitAck, TransportError};

/// Default API base of a locally running event service.
pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api";

/// Configuration for the HTTP remote store.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// API base URL; events live at `{api_base}/events`.
    pub api_base: String,
    /// Per-request timeout in seconds (default: 10).
    pub timeout_secs: u64,
}

impl RemoteConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        Self {
            api_base: std::env::var("CAUSAL_EVENTS_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            timeout_secs: std::env::var("CAUSAL_EVENTS_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        }
    }

    /// Configuration pointing at a specific API base.
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            ..Self::from_env()
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Remote event store reached over HTTP with JSON bodies.
#[derive(Debug, Clone)]
pub struct HttpRemoteStore {
    client: reqwest::Client,
    events_url: String,
}

impl HttpRemoteStore {
    /// Create a client with the given configuration.
    pub fn new(config: RemoteConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let events_url = format!("{}/events", config.api_base.trim_end_matches('/'));
        tracing::debug!(events_url = %events_url, timeout_secs = config.timeout_secs, "HTTP remote store configured");

        Ok(Self { client, events_url })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self, TransportError> {
        Self::new(RemoteConfig::from_env())
    }

    /// URL of the events collection.
    pub fn events_url(&self) -> &str {
        &self.events_url
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(TransportError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

fn network_error(e: reqwest::Error) -> TransportError {
    TransportError::Network(e.to_string())
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn fetch_all(&self) -> Result<Vec<EventRecord>, TransportError> {
        let response = self
            .client
            .get(&self.events_url)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(network_error)?;

        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await.map_err(network_error)?;
        let events: Vec<EventRecord> = serde_json::from_slice(&bytes)
            .map_err(|e| TransportError::Decode(e.to_string()))?;

        tracing::debug!(count = events.len(), "fetched events");
        Ok(events)
    }

    async fn submit(&self, record: &EventRecord) -> Result<SubmitAck, TransportError> {
        let response = self
            .client
            .post(&self.events_url)
            .json(record)
            .send()
            .await
            .map_err(network_error)?;

        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await.map_err(network_error)?;
        // The body is informational; an empty or foreign body still counts as success.
        let ack = serde_json::from_slice(&bytes).unwrap_or_default();

        tracing::debug!(event_id = %record.id(), "submitted event");
        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_url_trims_trailing_slash() {
        let store = HttpRemoteStore::new(RemoteConfig {
            api_base: "http://example.test/api/".to_string(),
            timeout_secs: 1,
        })
        .unwrap();
        assert_eq!(store.events_url(), "http://example.test/api/events");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let store = HttpRemoteStore::new(RemoteConfig {
            api_base: "http://127.0.0.1:9/api".to_string(),
            timeout_secs: 2,
        })
        .unwrap();

        let err = store.fetch_all().await.unwrap_err();
        assert!(matches!(err, TransportError::Network(_)), "got {err:?}");
    }
}
