//! Core types for the causal event graph.

pub mod event;
pub mod edge;

pub use event::{EventId, EventRecord};
pub use edge::CausalEdge;
