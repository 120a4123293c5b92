//! Middleware for the workspace service.
//!
//! # Components
//!
//! - `auth` - Request scope assignment and Bearer token authentication
//! - `http_metrics` - HTTP request metrics middleware

pub mod auth;
pub mod http_metrics;

pub use auth::{assign_request_scope, require_auth, AuthState};
pub use http_metrics::http_metrics_middleware;
