//! Remote event store clients.
//!
//! The authoritative store is an external service exposing two operations:
//! list every event, and create one event. Clients hold no state of their
//! own and are shared freely across the process.

#[cfg(feature = "http")]
pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::EventRecord;

/// Failure talking to the remote store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Connection, timeout, or other network-level failure.
    #[error("Network error: {0}")]
    Network(String),
    /// The store answered with a non-success status.
    #[error("HTTP error! status: {status}")]
    Status {
        /// Response status code.
        status: u16,
        /// Response body, if any.
        body: String,
    },
    /// The response body was not a sequence of event records.
    #[error("Invalid response body: {0}")]
    Decode(String),
}

/// Acknowledgment returned by a successful submit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitAck {
    /// Human-readable confirmation from the store.
    #[serde(default)]
    pub message: String,
}

impl SubmitAck {
    /// Create an acknowledgment with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Trait for remote event store backends.
///
/// Implementations must return events in the store's insertion order.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch every event.
    async fn fetch_all(&self) -> Result<Vec<EventRecord>, TransportError>;

    /// Submit one event.
    async fn submit(&self, record: &EventRecord) -> Result<SubmitAck, TransportError>;
}

#[async_trait]
impl<R: RemoteStore + ?Sized> RemoteStore for std::sync::Arc<R> {
    async fn fetch_all(&self) -> Result<Vec<EventRecord>, TransportError> {
        (**self).fetch_all().await
    }

    async fn submit(&self, record: &EventRecord) -> Result<SubmitAck, TransportError> {
        (**self).submit(record).await
    }
}

#[cfg(feature = "http")]
pub use http::{HttpRemoteStore, RemoteConfig};
