//! Prometheus metrics endpoint.

use axum::extract::State;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::PrometheusHandle;

/// Render the Prometheus text exposition.
///
/// Unauthenticated; labels carry no identifiers or subjects.
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}
