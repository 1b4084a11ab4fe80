//! HTTP metrics middleware for capturing all request/response metrics.
//!
//! This middleware captures metrics for ALL HTTP responses including
//! framework-level errors that occur before handlers run:
//! - 415 Unsupported Media Type (wrong Content-Type)
//! - 400 Bad Request (JSON parse errors)
//! - 404 Not Found
//! - 405 Method Not Allowed

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::observability::metrics::record_http_request;

/// Middleware that records HTTP request metrics for all responses.
///
/// Applied as the outermost layer so every response is captured, including
/// those produced by the framework before any handler runs.
pub async fn http_metrics_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status_code = response.status().as_u16();
    record_http_request(&method, &path, status_code, duration);

    response
}
