//! Causal Event REST Service
//!
//! Serves an [`EventLog`](crate::log::EventLog) over HTTP. This is the remote
//! store that [`HttpRemoteStore`](crate::remote) talks to.
//!
//! ## Endpoints
//!
//! - `GET /api/events` - List all events in insertion order
//! - `POST /api/events` - Create one event
//! - `GET /api/events/:id` - Fetch one event
//! - `GET /api/stats` - Aggregate counts
//! - `GET /api/graph` - Text projection of the graph
//! - `GET /api/export` - Pretty JSON snapshot as an attachment
//! - `GET /health` - Detailed service health check
//! - `GET /health/live` - Liveness probe

pub mod middleware;
pub mod routes;
pub mod state;

pub use middleware::{record_event_created, request_middleware, REQUEST_ID_HEADER};
pub use routes::{create_router, AppState, ErrorResponse};
pub use state::ServiceState;
