//! Axum routes for the causal event service.

use axum::{
    extract::{rejection::JsonRejection, Json, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::canonical::canonical_hash_hex;
use crate::log::{LogError, CREATED_MESSAGE};
use crate::remote::SubmitAck;
use crate::types::{EventId, EventRecord};
use crate::views::{export, export_file_name, GraphProjector, GraphStats};

use super::middleware::record_event_created;
use super::state::ServiceState;

/// Type alias for the shared service state.
pub type AppState = ServiceState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Service health response (detailed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"healthy"` when the service answers.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Number of events in the log.
    pub event_count: usize,
    /// Canonical hash of the log, order included.
    pub fingerprint: String,
}

/// Simple liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    /// Always `"alive"`.
    pub status: String,
}

/// Structured error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Machine-readable error code.
    pub code: String,
    /// Additional error details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Create a new error response with code and message.
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            details: None,
        }
    }

    /// Add details to the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl From<LogError> for ErrorResponse {
    fn from(e: LogError) -> Self {
        Self::new(e.code(), e.to_string())
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

// ============================================================================
// Route Handlers
// ============================================================================

/// List every event in insertion order.
///
/// The `ETag` header carries the collection fingerprint.
async fn list_events_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let events = state.log.snapshot();
    let etag = format!("\"{}\"", canonical_hash_hex(&events));
    ([(header::ETAG, etag)], Json(events))
}

/// Create one event.
///
/// Bodies that are not a single event record answer 400 `INVALID_JSON`
/// with the parser message in `details`.
async fn create_event_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EventRecord>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitAck>), ApiError> {
    let Json(record) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "malformed event body");
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("INVALID_JSON", "Invalid JSON").with_details(rejection.body_text())),
        )
    })?;

    let event_id = record.id();
    let parent_count = record.parent_count();
    state.log.append(record).map_err(|e| {
        tracing::warn!(code = e.code(), error = %e, event_id = %event_id, "event rejected");
        let status = StatusCode::from_u16(e.status()).unwrap_or(StatusCode::BAD_REQUEST);
        let body = ErrorResponse::from(e).with_details(format!("event id {event_id}"));
        (status, Json(body))
    })?;

    record_event_created(parent_count, state.log.len());
    Ok((StatusCode::CREATED, Json(SubmitAck::new(CREATED_MESSAGE))))
}

/// Fetch one event by id.
async fn get_event_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<EventRecord>, ApiError> {
    let id = EventId::new(id);
    state.log.get(id).map(Json).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("NOT_FOUND", format!("Event not found: {id}"))),
        )
    })
}

/// Aggregate counts.
async fn stats_handler(State(state): State<Arc<AppState>>) -> Json<GraphStats> {
    Json(GraphStats::compute(&state.log.snapshot()))
}

/// Text projection of the graph.
async fn graph_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let text = GraphProjector::render_text(&state.log.snapshot());
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text)
}

/// Pretty JSON snapshot, named by today's date.
async fn export_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let body = export(&state.log.snapshot());
    let file_name = export_file_name(chrono::Local::now().date_naive());
    (
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
}

/// Health check endpoint (detailed).
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let events = state.log.snapshot();
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        event_count: events.len(),
        fingerprint: canonical_hash_hex(&events),
    })
}

/// Liveness probe endpoint.
async fn liveness_handler() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        status: "alive".to_string(),
    })
}

// ============================================================================
// Router Construction
// ============================================================================

/// Create the Axum router for the causal event service.
pub fn create_router(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/api/events", get(list_events_handler).post(create_event_handler))
        .route("/api/events/:id", get(get_event_handler))
        // Derived views
        .route("/api/stats", get(stats_handler))
        .route("/api/graph", get(graph_handler))
        .route("/api/export", get(export_handler))
        // Health checks
        .route("/health", get(health_handler))
        .route("/health/live", get(liveness_handler))
        .with_state(state)
}
