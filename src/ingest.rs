//! Parsing of user-supplied event input.
//!
//! The id must be an integer. Parent ids are parsed leniently: the text is
//! split on whitespace and tokens that are not integers are dropped, so
//! `"1 abc 3"` yields parents `[1, 3]`. The payload is carried through
//! untouched.

use crate::types::{EventId, EventRecord};

/// Error type for input parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestError {
    /// A field could not be parsed.
    #[error("Invalid {field}: {value:?}")]
    InvalidInput {
        /// Name of the offending field.
        field: &'static str,
        /// Raw value as supplied.
        value: String,
    },
}

/// Build an event record from raw form input.
///
/// Surrounding whitespace around the id is ignored. `parent_count` is
/// computed from the parsed parents.
pub fn parse_event(
    raw_id: &str,
    raw_data: &str,
    raw_parent_ids: &str,
) -> Result<EventRecord, IngestError> {
    let id = parse_id(raw_id)?;
    let parents = parse_parent_ids(raw_parent_ids);

    tracing::debug!(
        event_id = %id,
        parent_count = parents.len(),
        "parsed event input"
    );

    Ok(EventRecord::new(id, raw_data, parents))
}

/// Parse a single event id.
pub fn parse_id(raw_id: &str) -> Result<EventId, IngestError> {
    raw_id
        .trim()
        .parse::<EventId>()
        .map_err(|_| IngestError::InvalidInput {
            field: "id",
            value: raw_id.to_string(),
        })
}

/// Parse a whitespace separated list of parent ids, dropping malformed tokens.
pub fn parse_parent_ids(raw: &str) -> Vec<EventId> {
    raw.split_whitespace()
        .filter_map(|token| token.parse::<EventId>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_mixed_parent_tokens() {
        let record = parse_event("7", "hello", "1 x 3").unwrap();
        assert_eq!(record.id(), EventId::new(7));
        assert_eq!(record.data(), "hello");
        assert_eq!(record.parents(), &[EventId::new(1), EventId::new(3)]);
        assert_eq!(record.parent_count(), 2);
    }

    #[test]
    fn test_non_numeric_id_rejected() {
        let err = parse_event("abc", "hello", "").unwrap_err();
        assert_eq!(
            err,
            IngestError::InvalidInput {
                field: "id",
                value: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_empty_id_rejected() {
        assert!(parse_event("", "hello", "").is_err());
        assert!(parse_event("   ", "hello", "").is_err());
    }

    #[test]
    fn test_blank_parent_text() {
        assert!(parse_event("1", "a", "").unwrap().is_root());
        assert!(parse_event("1", "a", "  \t \n").unwrap().is_root());
    }

    #[test]
    fn test_id_whitespace_trimmed() {
        assert_eq!(parse_id(" 12 ").unwrap(), EventId::new(12));
    }

    #[test]
    fn test_data_carried_verbatim() {
        let data = "  spaced payload that is much longer than any preview would show  ";
        let record = parse_event("4", data, "1").unwrap();
        assert_eq!(record.data(), data);
    }

    #[test]
    fn test_partial_numeric_tokens_dropped() {
        let parents = parse_parent_ids("3abc 1.5 -2 4");
        assert_eq!(parents, vec![EventId::new(4)]);
    }

    #[test]
    fn test_parent_separators() {
        let parents = parse_parent_ids("1\t2\n  3");
        assert_eq!(parents, vec![EventId::new(1), EventId::new(2), EventId::new(3)]);
    }

    proptest! {
        #[test]
        fn prop_parent_count_matches_parents(text in "[0-9a-z \\t]{0,40}") {
            let record = parse_event("1", "data", &text).unwrap();
            prop_assert_eq!(record.parent_count(), record.parents().len());
        }

        #[test]
        fn prop_numeric_tokens_survive(ids in proptest::collection::vec(any::<u32>(), 0..10)) {
            let text = ids.iter().map(u32::to_string).collect::<Vec<_>>().join(" junk ");
            let parsed = parse_parent_ids(&text);
            let expected: Vec<EventId> = ids.into_iter().map(EventId::new).collect();
            prop_assert_eq!(parsed, expected);
        }
    }
}
