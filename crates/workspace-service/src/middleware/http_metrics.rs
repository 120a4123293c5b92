//! HTTP metrics middleware for capturing all request/response metrics
//!
//! Captures metrics for ALL HTTP responses including framework-level errors
//! that occur before handlers run (415, 400 on JSON parse errors, 404, 405).

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::observability::metrics::record_http_request;

/// Middleware that records HTTP request metrics for all responses.
///
/// Applied as the outermost layer so it sees responses produced by the
/// auth layer and the timeout layer too.
pub async fn http_metrics_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    record_http_request(&method, &path, response.status().as_u16(), start.elapsed());

    response
}
