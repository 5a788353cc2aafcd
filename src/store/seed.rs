//! Built-in sample graph used when the remote store is unreachable.

use crate::types::{EventId, EventRecord};

/// The five-event sample DAG.
///
/// Edges (child -> parents): 2 -> [1], 3 -> [1, 2], 4 -> [3], 5 -> [3, 4].
pub fn seed_events() -> Vec<EventRecord> {
    vec![
        EventRecord::root(EventId::new(1), "Project initialization"),
        EventRecord::new(EventId::new(2), "Database schema design", vec![EventId::new(1)]),
        EventRecord::new(
            EventId::new(3),
            "API endpoint implementation",
            vec![EventId::new(1), EventId::new(2)],
        ),
        EventRecord::new(EventId::new(4), "Frontend development", vec![EventId::new(3)]),
        EventRecord::new(
            EventId::new(5),
            "Testing and debugging",
            vec![EventId::new(3), EventId::new(4)],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_shape() {
        let seed = seed_events();
        let shape: Vec<(u32, Vec<u32>)> = seed
            .iter()
            .map(|e| (e.id().get(), e.parents().iter().map(|p| p.get()).collect()))
            .collect();

        assert_eq!(
            shape,
            vec![
                (1, vec![]),
                (2, vec![1]),
                (3, vec![1, 2]),
                (4, vec![3]),
                (5, vec![3, 4]),
            ]
        );
        assert_eq!(seed.iter().map(EventRecord::parent_count).sum::<usize>(), 6);
    }

    #[test]
    fn test_seed_is_deterministic() {
        assert_eq!(seed_events(), seed_events());
    }
}
