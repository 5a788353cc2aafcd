//! Structural verification of parent links.
//!
//! Ingestion accepts any parent list. This pass reports what a causal graph
//! should not contain: cycles, and parent references that point at events
//! outside the collection. It is read-only and never runs implicitly.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::collections::HashMap;

use crate::types::{CausalEdge, EventId, EventRecord};

/// Findings of a lineage check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LineageReport {
    /// Each cycle as the sorted ids of one strongly connected component.
    /// Self-references are reported as one-element cycles.
    pub cycles: Vec<Vec<EventId>>,
    /// Edges whose parent is not in the collection, sorted.
    pub dangling: Vec<CausalEdge>,
}

impl LineageReport {
    /// Whether the collection is a well-formed DAG with no dangling links.
    pub fn is_clean(&self) -> bool {
        self.cycles.is_empty() && self.dangling.is_empty()
    }

    /// Whether the collection is acyclic.
    pub fn is_acyclic(&self) -> bool {
        self.cycles.is_empty()
    }
}

/// Check a collection for cycles and dangling parent references.
pub fn verify_lineage(events: &[EventRecord]) -> LineageReport {
    let mut graph: DiGraph<EventId, ()> = DiGraph::new();
    let mut nodes: HashMap<EventId, NodeIndex> = HashMap::with_capacity(events.len());

    for event in events {
        nodes
            .entry(event.id())
            .or_insert_with(|| graph.add_node(event.id()));
    }

    let mut dangling = Vec::new();
    for edge in CausalEdge::collect_all(events) {
        match (nodes.get(&edge.child), nodes.get(&edge.parent)) {
            (Some(&child), Some(&parent)) => {
                graph.update_edge(child, parent, ());
            }
            _ => dangling.push(edge),
        }
    }
    dangling.sort();
    dangling.dedup();

    let mut cycles: Vec<Vec<EventId>> = tarjan_scc(&graph)
        .into_iter()
        .filter(|component| {
            component.len() > 1
                || component
                    .first()
                    .is_some_and(|node| graph.contains_edge(*node, *node))
        })
        .map(|component| {
            let mut ids: Vec<EventId> = component.into_iter().map(|idx| graph[idx]).collect();
            ids.sort_unstable();
            ids
        })
        .collect();
    cycles.sort_unstable();

    if !cycles.is_empty() || !dangling.is_empty() {
        tracing::debug!(
            cycles = cycles.len(),
            dangling = dangling.len(),
            "lineage check found issues"
        );
    }

    LineageReport { cycles, dangling }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed_events;

    fn record(id: u32, parents: &[u32]) -> EventRecord {
        EventRecord::new(
            EventId::new(id),
            format!("event {id}"),
            parents.iter().copied().map(EventId::new).collect(),
        )
    }

    #[test]
    fn test_seed_is_clean() {
        let report = verify_lineage(&seed_events());
        assert!(report.is_clean());
    }

    #[test]
    fn test_detects_cycle() {
        let events = vec![record(1, &[3]), record(2, &[1]), record(3, &[2]), record(4, &[1])];
        let report = verify_lineage(&events);
        assert_eq!(
            report.cycles,
            vec![vec![EventId::new(1), EventId::new(2), EventId::new(3)]]
        );
        assert!(!report.is_acyclic());
    }

    #[test]
    fn test_self_reference_is_cycle() {
        let report = verify_lineage(&[record(7, &[7])]);
        assert_eq!(report.cycles, vec![vec![EventId::new(7)]]);
    }

    #[test]
    fn test_reports_dangling() {
        let report = verify_lineage(&[record(1, &[]), record(2, &[1, 99])]);
        assert!(report.is_acyclic());
        assert_eq!(
            report.dangling,
            vec![CausalEdge::new(EventId::new(2), EventId::new(99))]
        );
    }

    #[test]
    fn test_empty_collection() {
        assert!(verify_lineage(&[]).is_clean());
    }
}
