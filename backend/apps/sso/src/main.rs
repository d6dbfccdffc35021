//! SSO Server Entry Point
//!
//! Uses `anyhow` for startup errors; request-level errors are
//! `kernel::error::AppError`.

use std::net::SocketAddr;

use anyhow::Context;
use auth::{PgAuthRepository, auth_router};
use axum::Router;
use kernel::error::app_error::AppError;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use sso::MIGRATOR;
use sso::config::ServerConfig;
use sso::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env()?;
    init_tracing(config.environment);

    tracing::info!(
        env = %config.environment,
        port = config.port,
        token_ttl_secs = config.token_ttl.as_secs(),
        "Starting sso"
    );

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("connect to database")?;

    tracing::info!("Connected to database");

    MIGRATOR.run(&pool).await.context("run migrations")?;

    tracing::info!("Migrations completed");

    // Build router
    let app = Router::new()
        .nest(
            "/auth",
            auth_router(
                PgAuthRepository::new(pool.clone()),
                config.auth_config(),
                config.request_timeout,
            ),
        )
        .fallback(not_found)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;

    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn not_found() -> AppError {
    AppError::not_found("route not found")
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
