//! HTTP transport for the book catalog, built on Axum.
//!
//! The transport is thin: it validates request bodies, calls the
//! [`BookService`], and maps domain errors to status codes through
//! [`error::status_for`].

use std::sync::Arc;

use anyhow::Context;
use axum::{routing::get, Router};
use catalog::{repository::BookRepository, service::BookService};

pub mod dto;
pub mod error;
pub mod router;
pub mod routes;
pub mod settings;
pub mod telemetry;

use router::RouterBuilder;
use routes::AppState;
use settings::ServerSettings;

/// Build the main HTTP router around a shared service.
pub fn build_router<R>(service: Arc<BookService<R>>, settings: &ServerSettings) -> Router
where
    R: BookRepository + 'static,
{
    RouterBuilder::new()
        .route("/healthz", get(health_check))
        .merge(routes::books_router().with_state(AppState::new(service)))
        .with_tracing()
        .with_cors()
        .with_request_id()
        .with_timeout(settings.request_timeout_ms)
        .build()
}

/// Serve the catalog over HTTP until a shutdown signal arrives, then shut the
/// repository down.
pub async fn start_server<R>(repository: R, settings: &ServerSettings) -> anyhow::Result<()>
where
    R: BookRepository + 'static,
{
    let service = Arc::new(BookService::new(repository));
    let app = build_router(Arc::clone(&service), settings);

    let listener = tokio::net::TcpListener::bind(settings.address())
        .await
        .context("failed to bind to address")?;

    tracing::info!("HTTP server listening on http://{}", settings.address());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");

    match Arc::try_unwrap(service) {
        Ok(service) => service
            .into_repository()
            .shutdown()
            .await
            .context("failed to shut down repository")?,
        Err(_) => tracing::warn!("repository still in use; skipping shutdown"),
    }

    Ok(())
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
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

    tracing::info!("shutdown signal received");
}
