//! Score Ledger - Binary Entry Point
//!
//! Starts the HTTP server on `SCORES_BIND_ADDR` (see `config` for every
//! variable). Logging is controlled with `RUST_LOG`.

use std::process::ExitCode;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use score_ledger::api::{create_router, AppState};
use score_ledger::{ScoreService, ServerConfig};

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let service = match ScoreService::open(config.service.clone()) {
        Ok(service) => Arc::new(service),
        Err(e) => {
            error!(
                error = %e,
                data_file = %config.service.data_file.display(),
                "Failed to open score ledger"
            );
            return ExitCode::FAILURE;
        }
    };

    let listener = match TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, addr = %config.bind_addr, "Failed to bind");
            return ExitCode::FAILURE;
        }
    };

    info!(
        version = score_ledger::VERSION,
        addr = %config.bind_addr,
        storage = ?config.service.storage,
        summary_source = %config.service.summary_source,
        history_capacity = config.service.history_capacity,
        "Score ledger listening"
    );

    let app = create_router(Arc::new(AppState::new(service)));
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "Server error");
        return ExitCode::FAILURE;
    }

    info!("Score ledger stopped");
    ExitCode::SUCCESS
}

/// Resolves on Ctrl-C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
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

    info!("Shutdown signal received");
}
