//! Authoritative in-process event log.
//!
//! Append-only, insertion ordered. This is what the event service serves and
//! what in-process callers can use as a [`RemoteStore`] without a network hop.

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::remote::{RemoteStore, SubmitAck, TransportError};
use crate::types::{EventId, EventRecord};

/// Maximum number of parents one event may declare.
pub const MAX_PARENTS: usize = 8;

/// Maximum payload size in bytes.
pub const MAX_DATA_LEN: usize = 127;

/// Maximum number of events the log holds.
pub const MAX_EVENTS: usize = 1000;

/// Confirmation message for an accepted event.
pub const CREATED_MESSAGE: &str = "Event created successfully";

/// Error type for log appends.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogError {
    /// Id 0 is reserved.
    #[error("Invalid event ID")]
    InvalidEventId,
    /// Payload is empty.
    #[error("Event data cannot be empty")]
    EmptyData,
    /// Too many parents.
    #[error("Too many parents: {count} (max {})", MAX_PARENTS)]
    TooManyParents {
        /// Number of parents supplied.
        count: usize,
    },
    /// Payload too long.
    #[error("Event data too long: {len} bytes (max {})", MAX_DATA_LEN)]
    DataTooLong {
        /// Payload length in bytes.
        len: usize,
    },
    /// The log holds [`MAX_EVENTS`] events already.
    #[error("Event log full ({} events)", MAX_EVENTS)]
    Full,
}

impl LogError {
    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidEventId => "INVALID_EVENT_ID",
            Self::EmptyData => "EMPTY_DATA",
            Self::TooManyParents { .. } => "TOO_MANY_PARENTS",
            Self::DataTooLong { .. } => "DATA_TOO_LONG",
            Self::Full => "LOG_FULL",
        }
    }

    /// HTTP status reported for this rejection.
    pub fn status(&self) -> u16 {
        match self {
            Self::Full => 507,
            _ => 400,
        }
    }
}

/// In-memory append-only event log.
#[derive(Debug, Default)]
pub struct EventLog {
    events: RwLock<Vec<EventRecord>>,
}

impl EventLog {
    /// Create a new empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a log preloaded with records, skipping validation.
    pub fn with_events(events: Vec<EventRecord>) -> Self {
        Self {
            events: RwLock::new(events),
        }
    }

    /// Check a record against the log's limits.
    pub fn validate(record: &EventRecord) -> Result<(), LogError> {
        if record.id() == EventId::new(0) {
            return Err(LogError::InvalidEventId);
        }
        if record.data().is_empty() {
            return Err(LogError::EmptyData);
        }
        if record.parent_count() > MAX_PARENTS {
            return Err(LogError::TooManyParents {
                count: record.parent_count(),
            });
        }
        if record.data().len() > MAX_DATA_LEN {
            return Err(LogError::DataTooLong {
                len: record.data().len(),
            });
        }
        Ok(())
    }

    /// Validate and append a record.
    ///
    /// Duplicate ids are accepted; the log records history, not a keyed table.
    pub fn append(&self, record: EventRecord) -> Result<(), LogError> {
        Self::validate(&record)?;

        let mut events = self.events.write();
        if events.len() >= MAX_EVENTS {
            tracing::warn!(event_id = %record.id(), capacity = MAX_EVENTS, "event log full");
            return Err(LogError::Full);
        }
        tracing::info!(
            event_id = %record.id(),
            parent_count = record.parent_count(),
            position = events.len(),
            "event appended"
        );
        events.push(record);
        Ok(())
    }

    /// Copy of all records in insertion order.
    pub fn snapshot(&self) -> Vec<EventRecord> {
        self.events.read().clone()
    }

    /// First record with the given id.
    pub fn get(&self, id: EventId) -> Option<EventRecord> {
        self.events.read().iter().find(|e| e.id() == id).cloned()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

#[async_trait]
impl RemoteStore for EventLog {
    async fn fetch_all(&self) -> Result<Vec<EventRecord>, TransportError> {
        Ok(self.snapshot())
    }

    async fn submit(&self, record: &EventRecord) -> Result<SubmitAck, TransportError> {
        self.append(record.clone())
            .map_err(|e| TransportError::Status {
                status: e.status(),
                body: e.to_string(),
            })?;
        Ok(SubmitAck::new(CREATED_MESSAGE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u32, data: &str, parents: &[u32]) -> EventRecord {
        EventRecord::new(
            EventId::new(id),
            data,
            parents.iter().copied().map(EventId::new).collect(),
        )
    }

    #[test]
    fn test_append_preserves_order() {
        let log = EventLog::new();
        log.append(record(2, "b", &[])).unwrap();
        log.append(record(1, "a", &[2])).unwrap();

        let ids: Vec<_> = log.snapshot().iter().map(|e| e.id().get()).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_validation_rules() {
        let log = EventLog::new();
        assert_eq!(log.append(record(0, "a", &[])), Err(LogError::InvalidEventId));
        assert_eq!(log.append(record(1, "", &[])), Err(LogError::EmptyData));
        assert_eq!(
            log.append(record(1, "a", &[1, 2, 3, 4, 5, 6, 7, 8, 9])),
            Err(LogError::TooManyParents { count: 9 })
        );
        let long = "x".repeat(MAX_DATA_LEN + 1);
        assert_eq!(
            log.append(record(1, &long, &[])),
            Err(LogError::DataTooLong { len: MAX_DATA_LEN + 1 })
        );
        assert!(log.is_empty());
    }

    #[test]
    fn test_limits_are_inclusive() {
        let log = EventLog::new();
        let data = "x".repeat(MAX_DATA_LEN);
        log.append(record(1, &data, &[1, 2, 3, 4, 5, 6, 7, 8])).unwrap();
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_capacity() {
        let events = (1..=MAX_EVENTS as u32 - 1).map(|id| record(id, "e", &[])).collect();
        let log = EventLog::with_events(events);

        log.append(record(5000, "last", &[])).unwrap();
        assert_eq!(log.len(), MAX_EVENTS);

        let err = log.append(record(5001, "over", &[])).unwrap_err();
        assert_eq!(err, LogError::Full);
        assert_eq!(err.code(), "LOG_FULL");
        assert_eq!(err.status(), 507);
        assert_eq!(log.len(), MAX_EVENTS);
    }

    #[test]
    fn test_duplicate_ids_kept() {
        let log = EventLog::new();
        log.append(record(1, "first", &[])).unwrap();
        log.append(record(1, "second", &[])).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log.get(EventId::new(1)).unwrap().data(), "first");
    }

    #[tokio::test]
    async fn test_submit_maps_rejection_to_status() {
        let log = EventLog::new();
        let err = log.submit(&record(0, "a", &[])).await.unwrap_err();
        assert_eq!(
            err,
            TransportError::Status {
                status: 400,
                body: "Invalid event ID".to_string()
            }
        );

        let ack = log.submit(&record(3, "ok", &[1])).await.unwrap();
        assert_eq!(ack.message, CREATED_MESSAGE);
        assert_eq!(log.fetch_all().await.unwrap().len(), 1);
    }
}
