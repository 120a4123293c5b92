//! Test server harness for E2E testing
//!
//! Provides `TestWorkspaceServer` for spawning real workspace service
//! instances in tests. Signing keys come from the fixture key store in
//! `common::testing`.

use chrono::Utc;
use common::testing::{key_store, PRIMARY_KEY_ID};
use common::{AuthenticationContext, Claims};
use metrics_exporter_prometheus::PrometheusBuilder;
use sqlx::PgPool;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use workspace_service::config::Config;
use workspace_service::db;
use workspace_service::observability::metrics::init_metrics_recorder;
use workspace_service::routes::{self, AppState};

/// URL that refuses connections immediately.
const UNREACHABLE_DATABASE_URL: &str = "postgresql://ws:ws@127.0.0.1:1/ws";

/// Test harness for spawning the workspace service in E2E tests.
///
/// # Example
/// ```rust,ignore
/// #[sqlx::test(migrations = "../../migrations")]
/// async fn test_create_project(pool: PgPool) -> anyhow::Result<()> {
///     let server = TestWorkspaceServer::spawn(pool).await?;
///     let token = server.token_for("alice", &["USER"]).await?;
///     // ...
///     Ok(())
/// }
/// ```
pub struct TestWorkspaceServer {
    addr: SocketAddr,
    pool: PgPool,
    config: Config,
    auth: Arc<AuthenticationContext>,
    _handle: JoinHandle<()>,
}

impl TestWorkspaceServer {
    /// Spawn a server on `pool` (typically from `#[sqlx::test]`).
    ///
    /// The server binds to 127.0.0.1:0 and runs in the background until the
    /// harness is dropped.
    pub async fn spawn(pool: PgPool) -> Result<Self, anyhow::Error> {
        Self::spawn_with_config(pool, test_config(UNREACHABLE_DATABASE_URL)?).await
    }

    /// Spawn a server whose pool never connects.
    ///
    /// Authentication, authorization and identifier parsing all happen before
    /// the first query, so those paths are testable without PostgreSQL.
    pub async fn spawn_without_database() -> Result<Self, anyhow::Error> {
        let config = test_config(UNREACHABLE_DATABASE_URL)?;
        let pool = db::connect_lazy(&config.database)
            .map_err(|e| anyhow::anyhow!("Failed to build lazy pool: {}", e))?;
        Self::spawn_with_config(pool, config).await
    }

    async fn spawn_with_config(pool: PgPool, config: Config) -> Result<Self, anyhow::Error> {
        let auth = AuthenticationContext::new(PRIMARY_KEY_ID, key_store())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create auth context: {}", e))?;
        let auth = Arc::new(auth);

        let state = Arc::new(AppState {
            pool: pool.clone(),
            config: config.clone(),
            auth: Arc::clone(&auth),
        });

        // Only one recorder can be installed per process; later servers get a
        // standalone one.
        let metrics_handle = match init_metrics_recorder() {
            Ok(handle) => handle,
            Err(_) => PrometheusBuilder::new().build_recorder().handle(),
        };

        let app = routes::build_routes(state, metrics_handle);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;
        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
            if let Err(e) = axum::serve(listener, make_service).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            pool,
            config,
            auth,
            _handle: handle,
        })
    }

    /// Get reference to the database pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Token for `subject` with `roles`, signed by the server's active key.
    pub async fn token_for(&self, subject: &str, roles: &[&str]) -> Result<String, anyhow::Error> {
        let claims = Claims::issue(
            subject,
            roles.iter().map(|r| r.to_string()).collect(),
            Utc::now(),
            chrono::Duration::minutes(10),
        );
        self.sign(&claims).await
    }

    /// Sign arbitrary claims with the server's active key.
    pub async fn sign(&self, claims: &Claims) -> Result<String, anyhow::Error> {
        self.auth
            .generate_token(claims)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to sign test token: {}", e))
    }
}

impl Drop for TestWorkspaceServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}

/// Configuration used by every harness instance.
fn test_config(database_url: &str) -> Result<Config, anyhow::Error> {
    let vars = HashMap::from([
        ("DATABASE_URL".to_string(), database_url.to_string()),
        ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
        ("KEYS_DIR".to_string(), "/nonexistent".to_string()),
        ("ACTIVE_KEY_ID".to_string(), PRIMARY_KEY_ID.to_string()),
        ("DB_STATUS_RETRIES".to_string(), "1".to_string()),
        ("TOKEN_ISSUER".to_string(), "workspace-service-test".to_string()),
    ]);

    let mut config =
        Config::from_vars(&vars).map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;
    config.database.acquire_timeout_seconds = 1;
    config.database.min_connections = 0;
    Ok(config)
}
