//! Flat textual projection of the causal graph.
//!
//! One entry per event, in collection order:
//!
//! ```text
//! 3: API endpoint implementation
//!     ⬑ from: 1, 2
//! ```
//!
//! Payloads longer than [`PREVIEW_CHARS`] characters are cut and suffixed
//! with [`TRUNCATION_MARKER`]. Events without parents have no second line.

use serde::Serialize;
use std::fmt;

use crate::types::{EventId, EventRecord};

/// Number of payload characters shown before truncation.
pub const PREVIEW_CHARS: usize = 50;

/// Suffix appended to a truncated preview.
pub const TRUNCATION_MARKER: &str = "...";

/// Display entry for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectedEvent {
    /// Event id.
    pub id: EventId,
    /// Payload preview, truncated if needed.
    pub preview: String,
    /// Comma separated parent ids in stored order, if any.
    pub parents: Option<String>,
}

impl ProjectedEvent {
    /// Project a single event.
    pub fn from_record(record: &EventRecord) -> Self {
        let parents = (!record.is_root()).then(|| {
            record
                .parents()
                .iter()
                .map(EventId::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        });

        Self {
            id: record.id(),
            preview: preview(record.data()),
            parents,
        }
    }

    /// Rendered lines: the summary, then the parent line if present.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!("{}: {}", self.id, self.preview)];
        if let Some(parents) = &self.parents {
            lines.push(format!("    ⬑ from: {parents}"));
        }
        lines
    }
}

impl fmt::Display for ProjectedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}

/// Truncate a payload to [`PREVIEW_CHARS`] characters.
pub fn preview(data: &str) -> String {
    match data.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}{}", &data[..cut], TRUNCATION_MARKER),
        None => data.to_string(),
    }
}

/// Stateless projector over an event collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphProjector;

impl GraphProjector {
    /// Lazily project every event, in order. Restartable: call again for a
    /// fresh pass.
    pub fn render(events: &[EventRecord]) -> impl Iterator<Item = ProjectedEvent> + '_ {
        events.iter().map(ProjectedEvent::from_record)
    }

    /// Render the whole collection as text, one line per row.
    pub fn render_text(events: &[EventRecord]) -> String {
        Self::render(events)
            .map(|entry| entry.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed_events;

    #[test]
    fn test_truncates_long_payload() {
        let data = "a".repeat(60);
        let record = EventRecord::root(EventId::new(1), data);
        let entry = ProjectedEvent::from_record(&record);
        assert_eq!(entry.preview, format!("{}...", "a".repeat(50)));
    }

    #[test]
    fn test_short_payload_untouched() {
        let exact = "b".repeat(50);
        assert_eq!(preview(&exact), exact);
        assert_eq!(preview("short"), "short");
        assert_eq!(preview(""), "");
    }

    #[test]
    fn test_truncation_counts_characters() {
        let data = "é".repeat(51);
        let cut = preview(&data);
        assert_eq!(cut.chars().count(), 50 + TRUNCATION_MARKER.len());
        assert!(cut.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_root_has_no_parent_line() {
        let entry = ProjectedEvent::from_record(&EventRecord::root(EventId::new(1), "init"));
        assert_eq!(entry.parents, None);
        assert_eq!(entry.to_string(), "1: init");
    }

    #[test]
    fn test_seed_rendering() {
        let text = GraphProjector::render_text(&seed_events());
        let expected = "\
1: Project initialization
2: Database schema design
    ⬑ from: 1
3: API endpoint implementation
    ⬑ from: 1, 2
4: Frontend development
    ⬑ from: 3
5: Testing and debugging
    ⬑ from: 3, 4";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_is_idempotent() {
        let events = seed_events();
        let first: Vec<_> = GraphProjector::render(&events).collect();
        let second: Vec<_> = GraphProjector::render(&events).collect();
        assert_eq!(first, second);
        assert_eq!(GraphProjector::render_text(&[]), "");
    }
}
