//! Edge types for the causal graph.

use serde::{Deserialize, Serialize};
use super::event::{EventId, EventRecord};

/// Edge in the causal graph.
///
/// Points from a child event to one of the events it depends on.
/// Implements `Ord` for deterministic ordering: (child, parent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CausalEdge {
    /// Dependent event.
    pub child: EventId,
    /// Event the child depends on.
    pub parent: EventId,
}

impl CausalEdge {
    /// Create a new edge.
    pub fn new(child: EventId, parent: EventId) -> Self {
        Self { child, parent }
    }

    /// All edges implied by one record, in stored parent order.
    pub fn from_record(record: &EventRecord) -> impl Iterator<Item = CausalEdge> + '_ {
        record
            .parents()
            .iter()
            .map(move |parent| CausalEdge::new(record.id(), *parent))
    }

    /// All edges implied by a collection, in display order.
    pub fn collect_all(events: &[EventRecord]) -> Vec<CausalEdge> {
        events.iter().flat_map(CausalEdge::from_record).collect()
    }
}

// Canonical ordering: child, then parent
impl PartialOrd for CausalEdge {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CausalEdge {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.child
            .cmp(&other.child)
            .then_with(|| self.parent.cmp(&other.parent))
    }
}

impl std::fmt::Display for CausalEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.child, self.parent)
    }
}
