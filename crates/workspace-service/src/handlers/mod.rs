//! HTTP request handlers for the workspace service.
//!
//! Every protected handler starts the same way: authorize the request scope
//! against the route's roles, then parse identifiers and bodies.

pub mod assets;
pub mod health;
pub mod me;
pub mod metrics;
pub mod projects;
pub mod stems;
pub mod tokens;
pub mod workspaces;

pub use health::{health_check, readiness_check};
pub use me::get_me;
pub use metrics::metrics_handler;

use crate::errors::WsError;
use crate::models::{ListParams, Page};
use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use serde::de::DeserializeOwned;

/// Deserialize a JSON body manually so malformed input is a 400, not
/// axum's default 422.
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, WsError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(target: "ws.handlers", error = %e, "Invalid request body");
        WsError::BadRequest("Invalid request body".to_string())
    })
}

/// Resolve `?skip=&top=` into a validated page.
fn parse_page(query: Result<Query<ListParams>, QueryRejection>) -> Result<Page, WsError> {
    let Query(params) = query.map_err(|e| {
        tracing::debug!(target: "ws.handlers", error = %e, "Invalid query string");
        WsError::BadRequest("Invalid query string".to_string())
    })?;
    params.page().map_err(WsError::Validation)
}
