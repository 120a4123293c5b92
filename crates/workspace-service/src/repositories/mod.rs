//! Repository layer for the workspace service.
//!
//! Handler -> Service -> Repository. Repositories are stateless unit structs
//! whose functions take the pool explicitly. All queries are parameterized.

pub mod assets;
pub mod projects;
pub mod stems;
pub mod workspaces;

pub use assets::AssetsRepository;
pub use projects::ProjectsRepository;
pub use stems::StemsRepository;
pub use workspaces::WorkspacesRepository;

use crate::errors::WsError;
use crate::observability::metrics;
use std::time::Instant;

/// Postgres SQLSTATE for `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Record the query metric and convert the driver error.
fn observe<T>(
    operation: &'static str,
    start: Instant,
    result: Result<T, sqlx::Error>,
) -> Result<T, WsError> {
    let duration = start.elapsed();
    match result {
        Ok(value) => {
            metrics::record_db_query(operation, "success", duration);
            Ok(value)
        }
        Err(e) => {
            metrics::record_db_query(operation, "error", duration);
            Err(WsError::Database(e.to_string()))
        }
    }
}

/// Whether `err` is a foreign key violation.
fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == FOREIGN_KEY_VIOLATION)
}

/// Like [`observe`], but a foreign key violation becomes `on_missing_reference`.
fn observe_insert<T>(
    operation: &'static str,
    start: Instant,
    result: Result<T, sqlx::Error>,
    on_missing_reference: impl FnOnce() -> WsError,
) -> Result<T, WsError> {
    match result {
        Err(e) if is_foreign_key_violation(&e) => {
            metrics::record_db_query(operation, "error", start.elapsed());
            Err(on_missing_reference())
        }
        other => observe(operation, start, other),
    }
}
