//! Event types for the causal graph.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for an event in the causal graph.
///
/// Serializes as a bare integer. Uniqueness is a property of the store,
/// not of the id itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(u32);

impl EventId {
    /// Create a new EventId.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw integer value.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for EventId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl FromStr for EventId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// One causal event.
///
/// `parent_count` is always derived from `parents`; no constructor or
/// deserialization path accepts it from outside. Fields serialize in
/// the order `id, data, parent_count, parents`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "EventRecordWire")]
pub struct EventRecord {
    id: EventId,
    data: String,
    parent_count: usize,
    parents: Vec<EventId>,
}

impl EventRecord {
    /// Create a new event record.
    pub fn new(id: EventId, data: impl Into<String>, parents: Vec<EventId>) -> Self {
        Self {
            id,
            data: data.into(),
            parent_count: parents.len(),
            parents,
        }
    }

    /// Create a root event (no parents).
    pub fn root(id: EventId, data: impl Into<String>) -> Self {
        Self::new(id, data, Vec::new())
    }

    /// Event identifier.
    pub fn id(&self) -> EventId {
        self.id
    }

    /// Opaque payload.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Parent ids in stored order. May reference events that are not loaded.
    pub fn parents(&self) -> &[EventId] {
        &self.parents
    }

    /// Number of parents. Always equal to `parents().len()`.
    pub fn parent_count(&self) -> usize {
        self.parent_count
    }

    /// Whether this event has no parents.
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}

/// Shape of a record as it arrives on the wire.
///
/// The incoming `parent_count` is only compared against `parents` for
/// diagnostics; the record keeps the recomputed value.
#[derive(Deserialize)]
struct EventRecordWire {
    id: EventId,
    data: String,
    #[serde(default)]
    parent_count: Option<usize>,
    #[serde(default)]
    parents: Vec<EventId>,
}

impl From<EventRecordWire> for EventRecord {
    fn from(wire: EventRecordWire) -> Self {
        if let Some(claimed) = wire.parent_count {
            if claimed != wire.parents.len() {
                tracing::warn!(
                    event_id = %wire.id,
                    claimed,
                    actual = wire.parents.len(),
                    "parent_count disagrees with parents; using parents length"
                );
            }
        }
        Self::new(wire.id, wire.data, wire.parents)
    }
}
