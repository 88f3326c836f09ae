//! `tasklist-server`: the task service over HTTP.

use anyhow::Context;
use std::sync::Arc;
use tasklist_tasks::{InMemoryTaskStore, TaskEnvironment, TaskService};
use tasklist_web::{router, AppState, ServerConfig};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasklist_web=info,tasklist_tasks=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    let addr = config.bind_addr().context("invalid TASKLIST_HOST/PORT")?;
    info!(
        %addr,
        api_key = config.api_key.is_some(),
        shutdown_timeout = ?config.shutdown_timeout,
        "Configuration loaded"
    );

    let service = TaskService::new(Arc::new(InMemoryTaskStore::new()), TaskEnvironment::system());
    let mut state = AppState::new(service);
    if let Some(key) = config.api_key.as_deref() {
        state = state.with_api_key(key);
    }
    match tasklist_runtime::metrics::install_recorder() {
        Ok(Some(handle)) => state = state.with_metrics(handle),
        Ok(None) => {},
        Err(error) => warn!(%error, "Metrics disabled"),
    }

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "Task service listening");

    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let app = router(state);
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        joined = &mut server => {
            // Server stopped on its own (accept loop error)
            joined.context("server task panicked")?.context("server failed")?;
            return Ok(());
        }
        () = shutdown_signal() => {}
    }

    let _ = stop_tx.send(());
    match tokio::time::timeout(config.shutdown_timeout, server).await {
        Ok(joined) => joined.context("server task panicked")?.context("server failed")?,
        Err(_) => warn!("Graceful shutdown timed out, dropping open connections"),
    }

    info!("Shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
///
/// Waits for Ctrl+C (SIGINT) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            warn!(%error, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            },
            Err(error) => {
                warn!(%error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C signal"),
        () = terminate => info!("Received SIGTERM signal"),
    }
}
