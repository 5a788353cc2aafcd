//! # causal-events
//!
//! In-memory manager for a causal event graph.
//!
//! Events carry an integer id, an opaque payload, and the ids of the events
//! they causally depend on. This crate ingests and validates events, keeps
//! the current collection, and derives every view of it from that single
//! source.
//!
//! ## Core Contract
//!
//! 1. `GraphStore::load` replaces the collection with whatever the remote
//!    store returns; if the remote is unreachable it falls back to a built-in
//!    five-event sample graph and reports the failure
//! 2. `GraphStore::add` submits through the remote store, then refreshes
//!    (full reload by default, optional optimistic merge)
//! 3. Stats, projection, export and lineage checks are pure reads of
//!    `GraphStore::all`
//!
//! ## Architecture
//!
//! ```text
//! raw input → ingest → EventRecord → RemoteStore (HTTP or EventLog)
//!                                          ↓
//!                                     GraphStore ← seed data on failure
//!                                          ↓
//!                      stats / projection / export / lineage
//! ```
//!
//! ## Invariants
//!
//! - `parent_count == parents.len()` for every record, on every path
//! - The collection is replaced wholesale, never patched in place
//! - The most recently issued `load`/`add` wins; stale completions are dropped

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod canonical;
pub mod ingest;
pub mod remote;
pub mod log;
pub mod store;
pub mod views;

#[cfg(feature = "service")]
pub mod service;

// Re-exports
pub use types::{EventId, EventRecord, CausalEdge};
pub use canonical::{to_canonical_bytes, canonical_hash, canonical_hash_hex};
pub use ingest::{parse_event, parse_id, parse_parent_ids, IngestError};
pub use remote::{RemoteStore, SubmitAck, TransportError};
#[cfg(feature = "http")]
pub use remote::{HttpRemoteStore, RemoteConfig};
pub use log::{EventLog, LogError};
pub use store::{
    GraphStore, StoreConfig, StoreError, WritePolicy, DuplicatePolicy, DataSource,
    Refresh, Lineage, ParentLink, seed_events,
};
pub use views::{
    GraphStats, GraphProjector, ProjectedEvent, LineageReport,
    export, import, export_file_name, verify_lineage,
};

// Service re-exports (when service feature is enabled)
#[cfg(feature = "service")]
pub use service::{create_router, ServiceState};
