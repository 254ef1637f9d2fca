//! # Application State
//!
//! Everything handlers share, behind one cheaply clonable handle.
//!
//! ```text
//! ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐
//! │    Database      │ │    CartState     │ │    ServerConfig      │
//! │                  │ │                  │ │                      │
//! │  • SQLite pool   │ │  • Current cart  │ │  • Store name        │
//! │  • Repositories  │ │  • Revision      │ │  • Currency          │
//! │                  │ │  • Commit flag   │ │  • Thresholds        │
//! └──────────────────┘ └──────────────────┘ └──────────────────────┘
//! ```

mod cart;

pub use cart::{CartState, CommitGuard};

use std::sync::Arc;

use kassa_db::Database;

use crate::config::ServerConfig;

/// Shared application state passed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub cart: CartState,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ServerConfig) -> Self {
        AppState {
            db,
            cart: CartState::new(),
            config: Arc::new(config),
        }
    }
}
