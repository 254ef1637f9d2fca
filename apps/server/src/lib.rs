//! # Kassa Server
//!
//! HTTP/JSON API for the Kassa till.
//!
//! ## Module Organization
//! ```text
//! kassa_server/
//! ├── lib.rs          ◄─── App assembly, tracing, serve loop
//! ├── config.rs       ◄─── ServerConfig (defaults → kassa.toml → KASSA_*)
//! ├── error.rs        ◄─── ApiError + HTTP status mapping
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState (db, cart, config)
//! │   └── cart.rs     ◄─── Shared cart with commit guard
//! └── routes/
//!     ├── item.rs     ◄─── Inventory CRUD + search
//!     ├── cart.rs     ◄─── Cart actions
//!     ├── sale.rs     ◄─── Sale commit + history
//!     ├── request.rs  ◄─── Customer requests
//!     ├── finance.rs  ◄─── Finance summary
//!     ├── config.rs   ◄─── Store settings
//!     └── health.rs   ◄─── Liveness
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Initialize logging       RUST_LOG, default info,kassa=debug         │
//! │  2. Load ServerConfig        defaults → kassa.toml → KASSA_* env       │
//! │  3. Open database            SQLite (WAL), run pending migrations       │
//! │  4. Build router             routes + TraceLayer + CorsLayer            │
//! │  5. Serve                    until Ctrl+C / SIGTERM                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::future::Future;

use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub use crate::config::{ConfigError, ServerConfig};
pub use crate::error::{ApiError, ErrorCode};
pub use crate::state::AppState;

/// Builds the full application: routes plus HTTP middleware.
pub fn build_app(state: AppState) -> Router {
    routes::router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            // The till front end may be served from another origin.
            .layer(CorsLayer::permissive()),
    )
}

/// Serves the application on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "HTTP server listening");
    }

    axum::serve(listener, build_app(state))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=kassa=trace` - Show trace for kassa crates only
/// - Default: `info,kassa=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kassa=debug,sqlx=warn,tower_http=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
