//! Canonical serialization for collection fingerprints.
//!
//! ## Determinism Guarantees
//!
//! - Stable field order: Struct fields serialize in declaration order
//! - Stable Vec order: Vectors serialize in index order
//!
//! A fingerprint identifies the exact sequence of events a view was derived
//! from, including display order.

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Serialize a value to canonical JSON bytes for hashing.
pub fn to_canonical_bytes<T: Serialize + ?Sized>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).expect("Canonical serialization failed")
}

/// Compute canonical hash of a serializable value.
pub fn canonical_hash<T: Serialize + ?Sized>(value: &T) -> u64 {
    let bytes = to_canonical_bytes(value);
    xxh64(&bytes, 0)
}

/// Compute canonical hash and return as hex string.
pub fn canonical_hash_hex<T: Serialize + ?Sized>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EventId, EventRecord};

    #[test]
    fn test_determinism() {
        let events = vec![
            EventRecord::root(EventId::new(1), "init"),
            EventRecord::new(EventId::new(2), "next", vec![EventId::new(1)]),
        ];

        assert_eq!(canonical_hash(&events), canonical_hash(&events));
        assert_eq!(canonical_hash_hex(&events).len(), 16);
    }

    #[test]
    fn test_order_sensitive() {
        let a = EventRecord::root(EventId::new(1), "a");
        let b = EventRecord::root(EventId::new(2), "b");

        let forward = vec![a.clone(), b.clone()];
        let reverse = vec![b, a];
        assert_ne!(canonical_hash(&forward), canonical_hash(&reverse));
    }
}
