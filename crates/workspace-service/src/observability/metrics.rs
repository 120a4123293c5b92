//! Metrics definitions for the workspace service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `ws_` prefix for the workspace service
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded to prevent cardinality explosion:
//! - `method`: 7 values max (GET, POST, PATCH, DELETE, PUT, HEAD, OPTIONS)
//! - `endpoint`: parameterized paths, unknown paths collapse to `/other`
//! - `status`: 3 values (success, error, timeout)
//! - `outcome`: 2 values (accepted, rejected)
//! - `reason`: bounded by `RejectReason` and `AuthError` variants
//! - `operation`: bounded by code (select_project, insert_asset, etc.)

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize Prometheus metrics recorder and return the handle
/// for serving metrics via HTTP.
///
/// Must be called before any metrics are recorded.
///
/// # Errors
///
/// Returns error if Prometheus recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("ws_http_request".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.150, 0.200, 0.300, 0.500, 1.000, 2.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        .set_buckets_for_metric(
            Matcher::Prefix("ws_db_query".to_string()),
            &[
                0.001, 0.002, 0.005, 0.010, 0.020, 0.050, 0.100, 0.250, 0.500, 1.000,
            ],
        )
        .map_err(|e| format!("Failed to set DB query buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion
///
/// Metric: `ws_http_requests_total`, `ws_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status`
///
/// This captures ALL HTTP responses including framework-level errors like
/// 415 (wrong Content-Type), 404 and 405.
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    let normalized_endpoint = normalize_endpoint(endpoint);
    let status = categorize_status_code(status_code);

    histogram!("ws_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint.clone(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("ws_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

/// Categorize HTTP status code into success/error/timeout
fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Normalize endpoint path to prevent label cardinality explosion
///
/// Replaces identifiers with `{id}`.
fn normalize_endpoint(path: &str) -> String {
    match path {
        "/" | "/health" | "/ready" | "/metrics" | "/v1/me" | "/v1/projects" | "/v1/stems"
        | "/v1/admin/tokens" => path.to_string(),
        _ => normalize_dynamic_endpoint(path),
    }
}

/// Collection names that may be followed by an identifier segment.
const ID_COLLECTIONS: [&str; 4] = ["projects", "workspaces", "assets", "stems"];

/// Child collections reachable under `/{collection}/{id}/`.
const CHILD_COLLECTIONS: [(&str, &str); 2] = [("projects", "workspaces"), ("workspaces", "assets")];

fn normalize_dynamic_endpoint(path: &str) -> String {
    let parts: Vec<&str> = path.trim_start_matches('/').split('/').collect();

    match parts.as_slice() {
        ["v1", collection, _id] if ID_COLLECTIONS.contains(collection) => {
            format!("/v1/{collection}/{{id}}")
        }
        ["v1", parent, _id, child] if CHILD_COLLECTIONS.contains(&(*parent, *child)) => {
            format!("/v1/{parent}/{{id}}/{child}")
        }
        // Unknown paths normalized to "/other" to bound cardinality
        _ => "/other".to_string(),
    }
}

// ============================================================================
// Token Metrics
// ============================================================================

/// Record the outcome of a bearer token validation.
///
/// Metric: `ws_token_validations_total`
/// Labels: `outcome` (accepted, rejected), `reason`
///
/// `reason` is the internal reject code; it never reaches the client.
pub fn record_token_validation(outcome: &str, reason: &str) {
    counter!("ws_token_validations_total",
        "outcome" => outcome.to_string(),
        "reason" => reason.to_string()
    )
    .increment(1);
}

/// Record a token minted through the admin endpoint.
///
/// Metric: `ws_tokens_issued_total`
pub fn record_token_issued() {
    counter!("ws_tokens_issued_total").increment(1);
}

// ============================================================================
// Database Metrics
// ============================================================================

/// Record database query execution
///
/// Metric: `ws_db_query_duration_seconds`, `ws_db_queries_total`
/// Labels: `operation`, `status`
pub fn record_db_query(operation: &str, status: &str, duration: Duration) {
    histogram!("ws_db_query_duration_seconds",
        "operation" => operation.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("ws_db_queries_total",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}
