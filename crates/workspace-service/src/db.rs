//! Database pool construction and the status probe.

use common::config::DatabaseConfig;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Connection;
use std::time::Duration;
use tracing::instrument;

/// Server-side `statement_timeout` applied to every connection.
pub const STATEMENT_TIMEOUT_SECONDS: u32 = 5;

/// Base delay between status probe attempts; attempt `n` waits `n` times this.
pub const STATUS_RETRY_PERIOD: Duration = Duration::from_millis(100);

/// Adds statement_timeout to the database URL.
/// This ensures queries don't hang indefinitely.
pub fn add_query_timeout(url: &str, timeout_secs: u32) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}options=-c%20statement_timeout%3D{timeout_secs}s")
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
}

/// Connect eagerly; fails if the database is unreachable.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    pool_options(config)
        .connect(&add_query_timeout(config.url(), STATEMENT_TIMEOUT_SECONDS))
        .await
}

/// Build a pool that opens connections on first use.
pub fn connect_lazy(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    pool_options(config).connect_lazy(&add_query_timeout(config.url(), STATEMENT_TIMEOUT_SECONDS))
}

/// Check that the database answers queries.
///
/// Pings up to `attempts` times, sleeping `attempt * STATUS_RETRY_PERIOD`
/// after each failure, then runs `SELECT true`.
#[instrument(skip_all, name = "ws.db.status_check")]
pub async fn status_check(pool: &PgPool, attempts: u32) -> Result<(), sqlx::Error> {
    let mut attempt = 1;
    loop {
        match ping(pool).await {
            Ok(()) => break,
            Err(e) if attempt >= attempts => return Err(e),
            Err(e) => {
                tracing::debug!(target: "ws.db", attempt, error = %e, "Database ping failed");
                tokio::time::sleep(STATUS_RETRY_PERIOD * attempt).await;
                attempt += 1;
            }
        }
    }

    let ok: bool = sqlx::query_scalar("SELECT true").fetch_one(pool).await?;
    if ok {
        Ok(())
    } else {
        Err(sqlx::Error::Protocol("status query returned false".to_string()))
    }
}

async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut conn = pool.acquire().await?;
    conn.ping().await
}
