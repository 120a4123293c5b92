//! Workspace Service Library
//!
//! HTTP API over projects, workspaces, assets and stems, guarded by RS256
//! Bearer tokens verified with [`common::AuthenticationContext`].
//!
//! # Architecture
//!
//! The service follows the Handler -> Service -> Repository pattern:
//!
//! ```text
//! routes/mod.rs -> handlers/*.rs -> services/*.rs -> repositories/*.rs
//! ```
//!
//! # Modules
//!
//! - `auth` - Role allow-lists and the PEM directory key store
//! - `config` - Service configuration from environment
//! - `db` - Pool construction and the database status probe
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - Request scope and Bearer token verification
//! - `models` - Rows, request bodies and their validation
//! - `observability` - Prometheus metrics
//! - `repositories` - SQL access
//! - `routes` - Axum router setup
//! - `services` - Ownership, bounds and limit rules

pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;
