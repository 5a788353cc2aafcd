//! Derived views over an event collection.
//!
//! Every view is a pure function of a slice of events in display order:
//!
//! ```text
//! GraphStore::all() → stats       → GraphStats
//!                   → projection  → ProjectedEvent lines
//!                   → export      → pretty JSON snapshot
//!                   → lineage     → LineageReport (cycles, dangling parents)
//! ```
//!
//! None of them mutate the store, and the same input always yields the same
//! output.

pub mod stats;
pub mod projection;
pub mod export;
pub mod lineage;

pub use stats::GraphStats;
pub use projection::{GraphProjector, ProjectedEvent, PREVIEW_CHARS, TRUNCATION_MARKER};
pub use export::{export, export_file_name, import, EXPORT_FILE_PREFIX};
pub use lineage::{verify_lineage, LineageReport};
