//! Service middleware for request tracking.
//!
//! Each request runs inside a `request` span carrying a correlation id taken
//! from `X-Request-Id` (or freshly generated) and is echoed back on the
//! response. Metrics are emitted as tracing events under the
//! `causal_events::metrics` target:
//!
//! - `request_metric` - one per request, with normalized path, method, status and latency
//! - `event_created_metric` - one per accepted event

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::{info, Instrument};

/// Header carrying the request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Tag the request with a correlation id and record its latency.
pub async fn request_middleware(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), str::to_string);
    let method = request.method().clone();
    let route = normalize_path(request.uri().path());

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        route = %route,
    );
    let mut response = next.run(request).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    info!(
        target: "causal_events::metrics",
        metric_type = "request",
        request_id = %request_id,
        route = %route,
        method = %method,
        status = response.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "request_metric"
    );

    response
}

/// Collapse numeric path segments (event ids) into `:id`.
fn normalize_path(path: &str) -> String {
    static ID_SEGMENT: OnceLock<regex_lite::Regex> = OnceLock::new();
    let regex = ID_SEGMENT.get_or_init(|| {
        regex_lite::Regex::new(r"/[0-9]+(/|$)").expect("static regex")
    });

    regex.replace_all(path, "/:id$1").into_owned()
}

/// Record an accepted event.
pub fn record_event_created(parent_count: usize, log_len: usize) {
    info!(
        target: "causal_events::metrics",
        metric_type = "event_created",
        parent_count,
        log_len,
        "event_created_metric"
    );
}
