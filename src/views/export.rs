//! Portable snapshot of an event collection.
//!
//! The export is the collection itself as an indented JSON array (two-space
//! indentation), field order preserved, so it can be fed back through
//! [`import`].

use chrono::NaiveDate;

use crate::types::EventRecord;

/// Prefix of export file names.
pub const EXPORT_FILE_PREFIX: &str = "causal-events-export";

/// Serialize a collection to pretty JSON bytes.
pub fn export(events: &[EventRecord]) -> Vec<u8> {
    serde_json::to_vec_pretty(events).expect("Event serialization failed")
}

/// Parse an exported document back into records.
///
/// `parent_count` is recomputed from `parents` on the way in.
pub fn import(bytes: &[u8]) -> Result<Vec<EventRecord>, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// File name for an export taken on `date`: `causal-events-export-YYYY-MM-DD.json`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{}-{}.json", EXPORT_FILE_PREFIX, date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed_events;
    use crate::types::EventId;

    #[test]
    fn test_round_trip_preserves_order() {
        let mut events = seed_events();
        events.reverse();

        let bytes = export(&events);
        assert_eq!(import(&bytes).unwrap(), events);
    }

    #[test]
    fn test_pretty_layout() {
        let events = vec![EventRecord::new(EventId::new(2), "b", vec![EventId::new(1)])];
        let text = String::from_utf8(export(&events)).unwrap();
        let expected = r#"[
  {
    "id": 2,
    "data": "b",
    "parent_count": 1,
    "parents": [
      1
    ]
  }
]"#;
        assert_eq!(text, expected);
    }

    #[test]
    fn test_empty_export() {
        assert_eq!(export(&[]), b"[]".to_vec());
        assert!(import(b"[]").unwrap().is_empty());
    }

    #[test]
    fn test_import_rejects_garbage() {
        assert!(import(b"{\"id\": 1}").is_err());
    }

    #[test]
    fn test_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(export_file_name(date), "causal-events-export-2024-03-07.json");
    }
}
