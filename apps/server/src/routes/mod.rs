//! # HTTP Routes
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Method  Path                        Handler                           │
//! │  ──────  ────                        ───────                           │
//! │  GET     /health                     health::health                    │
//! │  GET     /api/config                 config::get_config                │
//! │                                                                         │
//! │  GET     /api/items?q=               item::list_items                  │
//! │  POST    /api/items                  item::create_item                 │
//! │  POST    /api/items/bulk-delete      item::bulk_delete_items           │
//! │  GET     /api/items/{id}             item::get_item                    │
//! │  PUT     /api/items/{id}             item::update_item                 │
//! │  DELETE  /api/items/{id}             item::delete_item                 │
//! │                                                                         │
//! │  GET     /api/cart                   cart::get_cart                    │
//! │  DELETE  /api/cart                   cart::clear_cart                  │
//! │  POST    /api/cart/items             cart::add_to_cart                 │
//! │  PUT     /api/cart/items/{id}        cart::update_cart_item            │
//! │  DELETE  /api/cart/items/{id}        cart::remove_from_cart            │
//! │  PUT     /api/cart/amount-paid       cart::set_amount_paid             │
//! │                                                                         │
//! │  GET     /api/sales?limit=           sale::list_sales                  │
//! │  POST    /api/sales                  sale::commit_sale                 │
//! │                                                                         │
//! │  GET     /api/requests               request::list_requests            │
//! │  POST    /api/requests               request::create_request           │
//! │  DELETE  /api/requests/{id}          request::fulfil_request           │
//! │                                                                         │
//! │  GET     /api/finance?range=         finance::get_finance              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cart;
pub mod config;
pub mod finance;
pub mod health;
pub mod item;
pub mod request;
pub mod sale;

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::state::AppState;

/// Builds the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/config", get(config::get_config))
        // Items
        .route("/api/items", get(item::list_items).post(item::create_item))
        .route("/api/items/bulk-delete", post(item::bulk_delete_items))
        .route(
            "/api/items/{id}",
            get(item::get_item)
                .put(item::update_item)
                .delete(item::delete_item),
        )
        // Cart
        .route("/api/cart", get(cart::get_cart).delete(cart::clear_cart))
        .route("/api/cart/items", post(cart::add_to_cart))
        .route(
            "/api/cart/items/{id}",
            put(cart::update_cart_item).delete(cart::remove_from_cart),
        )
        .route("/api/cart/amount-paid", put(cart::set_amount_paid))
        // Sales
        .route("/api/sales", get(sale::list_sales).post(sale::commit_sale))
        // Requests
        .route(
            "/api/requests",
            get(request::list_requests).post(request::create_request),
        )
        .route("/api/requests/{id}", delete(request::fulfil_request))
        // Finance
        .route("/api/finance", get(finance::get_finance))
        .with_state(state)
}
