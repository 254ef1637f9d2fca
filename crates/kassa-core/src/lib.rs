//! # kassa-core: Pure Business Logic for Kassa POS
//!
//! Everything in here is deterministic and free of I/O: the cart reducer,
//! money arithmetic, input validation and the finance aggregation.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kassa POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web Frontend                                 │   │
//! │  │    Item grid ──► Cart ──► Amount paid ──► Complete sale         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP / JSON                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    kassa-server (axum)                          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kassa-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌─────────┐ │   │
//! │  │   │  types  │ │  money  │ │  cart   │ │validation│ │ finance │ │   │
//! │  │   │  Item   │ │  Money  │ │  Cart   │ │  rules   │ │ Summary │ │   │
//! │  │   │  Sale   │ │         │ │ Action  │ │          │ │ ranges  │ │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘ └─────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    kassa-db (Database Layer)                    │   │
//! │  │         items, sales, sale_items, requests (SQLite)             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Item, Sale, CustomerRequest, ...)
//! - [`money`] - Money type with integer arithmetic
//! - [`cart`] - Cart state and its reducer
//! - [`finance`] - Revenue/cost/profit aggregation over a time range
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use kassa_core::cart::{Cart, CartAction};
//! use kassa_core::money::Money;
//! # use kassa_core::types::Item;
//! # let candle = Item {
//! #     id: 1,
//! #     name: "Candle".into(),
//! #     cost_price_cents: 200,
//! #     sell_price_cents: 450,
//! #     inventory_count: 3,
//! #     created_at: chrono::Utc::now(),
//! # };
//!
//! let mut cart = Cart::new();
//! cart.apply(CartAction::AddItem(candle.clone())).unwrap();
//! cart.apply(CartAction::AddItem(candle)).unwrap();
//!
//! assert_eq!(cart.total(), Money::from_cents(900));
//! assert_eq!(cart.custom_amount(), cart.total());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod finance;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartAction, CartLine, Settlement};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Items at or below this stock level are flagged as running low.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Highest accepted cost or sell price, in cents (€1,000,000).
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

/// Highest accepted stock count for one item.
///
/// `MAX_PRICE_CENTS × MAX_INVENTORY` is 1e14, so tens of thousands of full
/// cart lines still sum inside `i64`.
pub const MAX_INVENTORY: i64 = 1_000_000;

/// Number of sales shown in the history view when no limit is given.
pub const DEFAULT_HISTORY_LIMIT: i64 = 50;

/// Upper bound for a caller-supplied history limit.
pub const MAX_HISTORY_LIMIT: i64 = 200;

/// Number of best-selling items reported by the finance summary.
pub const TOP_ITEMS_LIMIT: usize = 10;

/// Display name for sale lines whose item has since been deleted.
pub const DELETED_ITEM_NAME: &str = "(deleted item)";
