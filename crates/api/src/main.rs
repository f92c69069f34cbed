use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_api::background;
use catalog_api::config::{LogFormat, ServerConfig, StorageBackend};
use catalog_api::router::build_app_router;
use catalog_api::state::AppState;
use catalog_db::CatalogStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env();

    // --- Tracing ---
    let log_format = config
        .as_ref()
        .map(|c| c.log_format)
        .unwrap_or(LogFormat::Pretty);
    init_tracing(log_format);

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };
    tracing::info!(
        host = %config.host,
        port = %config.port,
        backend = ?config.storage_backend,
        "Loaded server configuration"
    );

    // --- Storage ---
    let store = match config.storage_backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            CatalogStore::in_memory()
        }
        StorageBackend::Postgres => {
            let Some(database_url) = config.database_url.as_deref() else {
                tracing::error!("DATABASE_URL must be set for the postgres backend");
                std::process::exit(1);
            };

            let pool = exit_on_err(
                catalog_db::create_pool(database_url, config.db_max_connections).await,
                "Failed to connect to database",
            );
            tracing::info!("Database connection pool created");

            exit_on_err(
                catalog_db::health_check(&pool).await,
                "Database health check failed",
            );
            tracing::info!("Database health check passed");

            exit_on_err(
                catalog_db::run_migrations(&pool).await,
                "Failed to run database migrations",
            );
            tracing::info!("Database migrations applied");

            CatalogStore::Postgres(pool)
        }
    };

    // --- App state ---
    let state = AppState::new(store, config.clone());

    // --- Wizard session sweeper ---
    let sweeper_cancel = tokio_util::sync::CancellationToken::new();
    let sweeper_handle = tokio::spawn(background::wizard_sweeper::run(
        Arc::clone(&state.wizard),
        Duration::from_secs(config.wizard_sweep_interval_secs.max(1)),
        sweeper_cancel.clone(),
    ));

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let host = exit_on_err(config.host.parse::<IpAddr>(), "Invalid HOST address");
    let addr = SocketAddr::new(host, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = exit_on_err(
        tokio::net::TcpListener::bind(addr).await,
        "Failed to bind to address",
    );

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server error");
    }

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    sweeper_cancel.cancel();
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    if tokio::time::timeout(shutdown_timeout, sweeper_handle)
        .await
        .is_err()
    {
        tracing::warn!("Wizard session sweeper did not stop in time");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Unwrap a startup result, or log the error and exit with status 1.
fn exit_on_err<T, E: std::fmt::Display>(result: Result<T, E>, context: &str) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(error = %e, "{context}");
            std::process::exit(1);
        }
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the default filter. `LOG_FORMAT=json` switches to
/// one JSON object per line.
fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "catalog_api=debug,catalog_db=info,tower_http=debug".into());

    let (pretty, json) = match format {
        LogFormat::Pretty => (Some(tracing_subscriber::fmt::layer()), None),
        LogFormat::Json => (None, Some(tracing_subscriber::fmt::layer().json())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .init();
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl-C, starting graceful shutdown"),
        _ = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }
}
