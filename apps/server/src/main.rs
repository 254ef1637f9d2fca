//! # Kassa Server
//!
//! Entry point: load configuration, open the database, serve HTTP.

use anyhow::Context;
use kassa_db::{Database, DbConfig};
use kassa_server::{init_tracing, serve, AppState, ServerConfig};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting Kassa POS server");

    let config = ServerConfig::load().context("Failed to load configuration")?;
    info!(
        bind_addr = %config.bind_addr,
        db_path = %config.db_path.display(),
        store = %config.store_name,
        "Configuration loaded"
    );

    if let Some(dir) = config.db_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
    }

    let db = Database::new(DbConfig::new(&config.db_path))
        .await
        .context("Failed to open database")?;
    info!("Database connected and migrations applied");

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    let state = AppState::new(db.clone(), config);
    serve(listener, state, shutdown_signal()).await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
