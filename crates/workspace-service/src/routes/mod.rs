//! HTTP routes for the workspace service.
//!
//! Defines the Axum router and application state.

use crate::config::Config;
use crate::handlers::{self, assets, projects, stems, tokens, workspaces};
use crate::middleware::{assign_request_scope, http_metrics_middleware, require_auth, AuthState};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use common::AuthenticationContext;
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: PgPool,

    /// Service configuration.
    pub config: Config,

    /// Token signer and verifier bound to the key store.
    pub auth: Arc<AuthenticationContext>,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/health` - Liveness probe (simple "OK") - public
/// - `/ready` - Database status probe - public
/// - `/metrics` - Prometheus metrics endpoint - public
/// - `/v1/...` - Project, workspace, asset and stem resources - authenticated
/// - `/v1/admin/tokens` - Token minting - authenticated, ADMIN only
/// - TraceLayer for request logging
/// - HTTP metrics middleware
/// - 30 second request timeout
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let auth_state = Arc::new(AuthState {
        auth: Arc::clone(&state.auth),
    });

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .with_state(state.clone());

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Protected routes (authentication required)
    let protected_routes = Router::new()
        .route("/v1/me", get(handlers::get_me))
        .route(
            "/v1/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route(
            "/v1/projects/:id",
            get(projects::get_project)
                .patch(projects::update_project)
                .delete(projects::delete_project),
        )
        .route(
            "/v1/projects/:id/workspaces",
            get(projects::list_project_workspaces).post(projects::create_project_workspace),
        )
        .route(
            "/v1/workspaces/:id",
            get(workspaces::get_workspace)
                .patch(workspaces::update_workspace)
                .delete(workspaces::delete_workspace),
        )
        .route(
            "/v1/workspaces/:id/assets",
            get(workspaces::list_workspace_assets).post(workspaces::create_workspace_asset),
        )
        .route(
            "/v1/assets/:id",
            get(assets::get_asset)
                .patch(assets::update_asset)
                .delete(assets::delete_asset),
        )
        .route("/v1/stems", get(stems::list_stems))
        .route("/v1/stems/:id", get(stems::get_stem))
        .route("/v1/admin/tokens", post(tokens::issue_token))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth))
        .with_state(state);

    // Layer order (bottom-to-top execution):
    // 1. assign_request_scope - every request gets a scope before auth runs
    // 2. TraceLayer - Log request details
    // 3. TimeoutLayer - Timeout the request
    // 4. http_metrics_middleware - Record ALL responses (outermost)
    public_routes
        .merge(metrics_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(assign_request_scope))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(middleware::from_fn(http_metrics_middleware))
}
