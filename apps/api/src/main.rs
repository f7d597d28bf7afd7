//! # Pharmacy API Server
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Mobile client ───► HTTP (3000) ───► axum routes ───► MySQL pool       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The server starts even when the database is unreachable; requests then
//! fail individually with the driver's error.

use tokio::net::TcpListener;
use tracing::{error, info};

use pharma_api::{
    build_router, check_database, init_tracing, ApiConfig, AppState, STARTUP_CHECK_TIMEOUT,
};
use pharma_db::Database;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    info!("Starting pharmacy API server...");

    let config = ApiConfig::from_env()?;
    info!(addr = %config.bind_addr(), database = ?config.database, "Configuration loaded");

    let db = Database::new(&config.database)?;
    check_database(&db, STARTUP_CHECK_TIMEOUT).await;

    let app = build_router(AppState::new(db.clone()));

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %config.bind_addr(), "Server listening");
    info!("Health check: http://localhost:{}/api/health", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to install Ctrl+C handler");
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
                error!(error = %err, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received, starting graceful shutdown...");
}
