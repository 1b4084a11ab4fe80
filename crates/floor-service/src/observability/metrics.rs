//! Metrics definitions for the floor service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `floor_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded:
//! - `method`: HTTP methods (7 values max)
//! - `endpoint`: parameterized paths (~10 values)
//! - `operation`: bounded by code (join, call, pass, seat, submit, balance)
//! - `result`: success / conflict / error
//! - `channel` / `status`: notification channels and dispatch outcomes

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize the Prometheus metrics recorder and return the handle for
/// serving exposition via HTTP.
///
/// Must be called before any metrics are recorded.
///
/// # Errors
///
/// Returns an error if the recorder fails to install (e.g., already
/// installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("floor_http_request".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.150, 0.200, 0.300, 0.500, 1.000, 2.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        .set_buckets_for_metric(
            Matcher::Prefix("floor_db_query".to_string()),
            &[
                0.001, 0.002, 0.005, 0.010, 0.020, 0.050, 0.100, 0.250, 0.500, 1.000,
            ],
        )
        .map_err(|e| format!("Failed to set DB query buckets: {e}"))?
        .set_buckets_for_metric(
            Matcher::Prefix("floor_notification".to_string()),
            &[0.010, 0.050, 0.100, 0.250, 0.500, 1.000, 2.500, 5.000],
        )
        .map_err(|e| format!("Failed to set notification buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion.
///
/// Metric: `floor_http_requests_total`, `floor_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status` / `status_code`
///
/// Applied from the outermost middleware layer, so framework-level errors
/// (404, 405, 415, JSON parse 400s) are captured too.
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    let normalized_endpoint = normalize_endpoint(endpoint);
    let status = categorize_status_code(status_code);

    histogram!("floor_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint.clone(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("floor_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Normalize endpoint path to prevent label cardinality explosion.
///
/// Replaces entry/venue/group ids with placeholders.
fn normalize_endpoint(path: &str) -> String {
    match path {
        "/" | "/health" | "/ready" | "/metrics" | "/api/v1/waitlist" => path.to_string(),
        _ => normalize_dynamic_endpoint(path),
    }
}

fn normalize_dynamic_endpoint(path: &str) -> String {
    let parts: Vec<&str> = path.split('/').collect();

    // /api/v1/waitlist/{id}/{action}
    if path.starts_with("/api/v1/waitlist/") && parts.len() == 6 {
        if let Some(action) = parts.get(5) {
            if matches!(*action, "call" | "pass" | "seat") {
                return format!("/api/v1/waitlist/{{id}}/{action}");
            }
        }
    }

    // /api/v1/venues/{venue_id}/{view}
    if path.starts_with("/api/v1/venues/") && parts.len() == 6 {
        if let Some(view) = parts.get(5) {
            if matches!(*view, "waitlist" | "balance") {
                return format!("/api/v1/venues/{{venue_id}}/{view}");
            }
        }
    }

    // /api/v1/squads/{id}/submit
    if path.starts_with("/api/v1/squads/") && parts.len() == 6 {
        return "/api/v1/squads/{id}/submit".to_string();
    }

    "/unknown".to_string()
}

// ============================================================================
// Floor Operation Metrics
// ============================================================================

/// Record a floor operation outcome.
///
/// Metric: `floor_operations_total`
/// Labels: `operation` (join, call, pass, seat, submit, balance),
/// `result` (success, conflict, error)
pub fn record_operation(operation: &'static str, result: &'static str) {
    counter!("floor_operations_total",
        "operation" => operation,
        "result" => result
    )
    .increment(1);
}

/// Record a database query.
///
/// Metric: `floor_db_queries_total`, `floor_db_query_duration_seconds`
/// Labels: `operation`, `status` (success, error)
pub fn record_db_query(operation: &'static str, success: bool, duration: Duration) {
    let status = if success { "success" } else { "error" };

    histogram!("floor_db_query_duration_seconds",
        "operation" => operation,
        "status" => status
    )
    .record(duration.as_secs_f64());

    counter!("floor_db_queries_total",
        "operation" => operation,
        "status" => status
    )
    .increment(1);
}

/// Record a notification dispatch attempt.
///
/// Metric: `floor_notifications_total`
/// Labels: `channel` (sms, push, in_app), `status` (sent, failed, skipped)
pub fn record_notification(channel: &'static str, status: &'static str) {
    counter!("floor_notifications_total",
        "channel" => channel,
        "status" => status
    )
    .increment(1);
}
