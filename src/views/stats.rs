//! Aggregate statistics over an event collection.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::types::{EventId, EventRecord};

/// Counts derived from the current collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Number of events.
    pub total_events: usize,
    /// Sum of `parent_count` over all events.
    pub total_relationships: usize,
    /// Events with no parents.
    pub root_events: usize,
    /// Parent references to ids that are not in the collection.
    pub dangling_parents: usize,
}

impl GraphStats {
    /// Compute statistics for a collection. An empty collection yields zeros.
    pub fn compute(events: &[EventRecord]) -> Self {
        let known: HashSet<EventId> = events.iter().map(EventRecord::id).collect();

        let mut stats = Self {
            total_events: events.len(),
            ..Self::default()
        };
        for event in events {
            stats.total_relationships += event.parent_count();
            if event.is_root() {
                stats.root_events += 1;
            }
            stats.dangling_parents += event
                .parents()
                .iter()
                .filter(|parent| !known.contains(parent))
                .count();
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed_events;

    #[test]
    fn test_seed_stats() {
        let stats = GraphStats::compute(&seed_events());
        assert_eq!(stats.total_events, 5);
        assert_eq!(stats.total_relationships, 6);
        assert_eq!(stats.root_events, 1);
        assert_eq!(stats.dangling_parents, 0);
    }

    #[test]
    fn test_empty_collection() {
        assert_eq!(GraphStats::compute(&[]), GraphStats::default());
    }

    #[test]
    fn test_dangling_counted_per_reference() {
        let events = vec![
            EventRecord::new(EventId::new(1), "a", vec![EventId::new(50)]),
            EventRecord::new(EventId::new(2), "b", vec![EventId::new(50), EventId::new(1)]),
        ];
        let stats = GraphStats::compute(&events);
        assert_eq!(stats.total_relationships, 3);
        assert_eq!(stats.dangling_parents, 2);
        assert_eq!(stats.root_events, 0);
    }
}
