//! Service state management.

use std::sync::Arc;

use crate::log::EventLog;
use crate::store::seed_events;

/// Shared service state.
#[derive(Debug, Clone, Default)]
pub struct ServiceState {
    /// The authoritative event log.
    pub log: Arc<EventLog>,
}

impl ServiceState {
    /// Create service state around an existing log.
    pub fn new(log: EventLog) -> Self {
        Self { log: Arc::new(log) }
    }

    /// Create service state from environment variables.
    ///
    /// `SEED_EVENTS=true` preloads the sample graph.
    pub fn from_env() -> Self {
        let seed = std::env::var("SEED_EVENTS")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        if seed {
            tracing::info!("SEED_EVENTS set, preloading sample events");
            Self::new(EventLog::with_events(seed_events()))
        } else {
            Self::new(EventLog::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_log() {
        let state = ServiceState::default();
        let other = state.clone();
        assert!(Arc::ptr_eq(&state.log, &other.log));
    }

    #[test]
    fn test_new_wraps_log() {
        let state = ServiceState::new(EventLog::with_events(seed_events()));
        assert_eq!(state.log.len(), 5);
    }
}
