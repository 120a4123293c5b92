//! Health check handlers.
//!
//! - `/health`: Liveness probe - returns OK if the process is running
//! - `/ready`: Readiness probe - runs the database status probe

use crate::db;
use crate::models::ReadinessResponse;
use crate::routes::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;

/// Liveness probe handler. Does NOT check any dependencies.
pub async fn health_check() -> &'static str {
    "OK"
}

/// Readiness probe handler.
///
/// Returns 200 if the database answers, 503 otherwise. The error message is
/// generic; the actual failure is logged.
#[tracing::instrument(skip_all, name = "ws.health.readiness")]
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match db::status_check(&state.pool, state.config.db_status_retries).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready",
                database: Some("healthy"),
                error: None,
            }),
        ),
        Err(e) => {
            tracing::warn!(target: "ws.health", error = %e, "Readiness check failed: database error");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse {
                    status: "not_ready",
                    database: Some("unhealthy"),
                    error: Some("Service dependencies unavailable".to_string()),
                }),
            )
        }
    }
}
