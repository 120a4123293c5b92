//! Workspace Service
//!
//! Entry point for the project/workspace/asset API.

use common::{AuthenticationContext, KeyStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use workspace_service::auth::PemDirectoryKeyStore;
use workspace_service::config::Config;
use workspace_service::db;
use workspace_service::observability::metrics::init_metrics_recorder;
use workspace_service::routes::{self, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration first so the log filter default can come from it
    let config = Config::from_env().map_err(|e| {
        eprintln!("Failed to load configuration: {e}");
        e
    })?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.observability.log_filter.clone().into());
    if config.observability.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    info!("Starting Workspace Service");
    info!(
        bind_address = %config.bind_address,
        keys_dir = %config.keys_dir.display(),
        active_key_id = %config.active_key_id,
        jwt_clock_skew_seconds = config.jwt_clock_skew.as_secs(),
        "Configuration loaded successfully"
    );

    // Metrics recorder must be installed before any metric is emitted
    let metrics_handle = init_metrics_recorder().map_err(|e| {
        error!("Failed to initialize metrics recorder: {}", e);
        e
    })?;

    // Resolve the active signing key up front; a missing key is fatal
    let key_store: Arc<dyn KeyStore> = Arc::new(PemDirectoryKeyStore::new(&config.keys_dir));
    let auth = AuthenticationContext::new(&config.active_key_id, key_store)
        .await
        .map_err(|e| {
            error!("Failed to load signing key: {}", e);
            e
        })?
        .with_clock_skew(config.jwt_clock_skew);

    info!("Connecting to database...");
    let db_pool = db::connect(&config.database).await.map_err(|e| {
        error!("Failed to connect to database: {}", e);
        e
    })?;

    sqlx::migrate!("../../migrations")
        .run(&db_pool)
        .await
        .map_err(|e| {
            error!("Failed to run migrations: {}", e);
            e
        })?;

    info!("Database connection established");

    // Parse bind address before moving config
    let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    let state = Arc::new(AppState {
        pool: db_pool,
        config,
        auth: Arc::new(auth),
    });

    let app = routes::build_routes(state, metrics_handle);

    info!("Workspace Service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Workspace Service shutdown complete");

    Ok(())
}

/// Listens for shutdown signals (SIGTERM, SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, starting graceful shutdown..."),
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, starting graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
