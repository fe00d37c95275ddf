//! OS signal handling.
//!
//! # Responsibilities
//! - Wait for SIGINT (Ctrl+C) or SIGTERM and report it
//! - Reload the route table on SIGHUP
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - SIGHUP triggers config reload, not shutdown
//! - A failed reload is logged; the current table keeps serving

use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::routing::SharedRouteTable;

/// Resolves when the process is asked to terminate.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
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
        _ = ctrl_c => tracing::info!(signal = "SIGINT", "Shutdown signal received"),
        _ = terminate => tracing::info!(signal = "SIGTERM", "Shutdown signal received"),
    }
}

/// Reload `routes` on every SIGHUP until shutdown.
#[cfg(unix)]
pub fn spawn_reload_on_hangup(routes: Arc<SharedRouteTable>, mut shutdown: broadcast::Receiver<()>) -> JoinHandle<()> {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut hangup = match signal(SignalKind::hangup()) {
            Ok(stream) => stream,
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGHUP, reload on signal disabled");
                return;
            }
        };

        loop {
            tokio::select! {
                received = hangup.recv() => {
                    if received.is_none() {
                        break;
                    }
                    tracing::info!(signal = "SIGHUP", "Reload signal received");
                    let routes = routes.clone();
                    match tokio::task::spawn_blocking(move || routes.reload()).await {
                        Ok(Ok(summary)) => tracing::info!(routes = summary.routes_loaded, "Reload on signal complete"),
                        Ok(Err(e)) => tracing::error!(error = %e, "Reload on signal failed"),
                        Err(e) => tracing::error!(error = %e, "Reload task failed"),
                    }
                }
                _ = shutdown.recv() => break,
            }
        }
    })
}

#[cfg(not(unix))]
pub fn spawn_reload_on_hangup(_routes: Arc<SharedRouteTable>, _shutdown: broadcast::Receiver<()>) -> JoinHandle<()> {
    tokio::spawn(async {})
}
