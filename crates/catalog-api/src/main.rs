//! Collection catalog API server entry point.

use std::sync::Arc;

use catalog_api::config::AppConfig;
use catalog_api::error::AppError;
use catalog_api::routes;
use catalog_api::state::AppState;
use catalog_api::telemetry;
use catalog_core::clock::SystemClock;
use catalog_store::{MIGRATOR, PgCollectionRepository, PgEventRepository};
use sqlx::postgres::PgPoolOptions;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;
    let telemetry = telemetry::init(config.otlp_endpoint.as_deref())?;

    tracing::info!(bind_addr = %config.bind_addr, "starting collection catalog API server");

    // Create database connection pool.
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(config.database_acquire_timeout)
        .connect(&config.database_url)
        .await?;

    MIGRATOR.run(&pool).await?;
    tracing::info!("database migrations applied");

    // Build application state.
    let app_state = AppState::new(
        Arc::new(PgCollectionRepository::new(pool.clone(), Arc::new(SystemClock))),
        Arc::new(PgEventRepository::new(pool.clone())),
        config.pagination,
    );

    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", config.bind_addr);

    // The drain deadline starts when the signal arrives, not at start-up.
    let (signalled_tx, signalled_rx) = oneshot::channel();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = signalled_tx.send(());
    });
    let mut server = tokio::spawn(async move { server.await });

    tokio::select! {
        result = &mut server => {
            result.map_err(|e| AppError::Server(std::io::Error::other(e)))??;
        }
        _ = signalled_rx => {
            match tokio::time::timeout(config.graceful_shutdown_timeout, &mut server).await {
                Ok(result) => result.map_err(|e| AppError::Server(std::io::Error::other(e)))??,
                Err(_) => tracing::warn!(
                    timeout_secs = config.graceful_shutdown_timeout.as_secs(),
                    "graceful shutdown timed out, dropping in-flight requests"
                ),
            }
        }
    }

    pool.close().await;
    tracing::info!("server stopped");
    telemetry.shutdown();

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received SIGINT, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
