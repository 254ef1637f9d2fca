//! # Cart Routes
//!
//! Every handler maps to one cart action and answers with the whole cart.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│  Amount  │────►│ Committed│       │
//! │  │  Cart    │     │          │     │  Paid    │     │   Sale   │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                              │
//! │                   add_to_cart       set_amount_paid   POST /api/sales   │
//! │                   update_cart_item                    (sale.rs)         │
//! │                   remove_from_cart                                      │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart ──────────────────────► (back to empty)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::{Path, State};
use axum::Json;
use kassa_core::validation::validate_amount_paid;
use kassa_core::{Cart, CartAction, CoreError, Money, Settlement};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Cart response: lines and totals plus derived figures.
///
/// ```json
/// {
///   "lines": [{ "item": { "id": 3, "name": "Soy candle", ... }, "quantity": 2 }],
///   "total": 1200,
///   "customAmount": 1500,
///   "settlement": { "kind": "change", "amount": 300 },
///   "lineCount": 1,
///   "totalQuantity": 2
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    #[serde(flatten)]
    pub cart: Cart,
    pub settlement: Settlement,
    pub line_count: usize,
    pub total_quantity: i64,
}

impl From<Cart> for CartView {
    fn from(cart: Cart) -> Self {
        CartView {
            settlement: cart.settlement(),
            line_count: cart.line_count(),
            total_quantity: cart.total_quantity(),
            cart,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub item_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAmountPaidRequest {
    pub amount_cents: i64,
}

pub async fn get_cart(State(state): State<AppState>) -> Result<Json<CartView>, ApiError> {
    debug!("get_cart");
    let cart = state.cart.with_cart(Cart::clone);
    Ok(Json(CartView::from(cart)))
}

/// Adds one unit of an item.
///
/// The item is re-read from the database first, so the stock limit and the
/// price snapshot are current.
///
/// ## Errors
/// - `NOT_FOUND` if the item does not exist
/// - `OUT_OF_STOCK` if the cart already holds every unit in stock; the cart
///   is left as it was
pub async fn add_to_cart(
    State(state): State<AppState>,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>, ApiError> {
    let item_id = request.item_id;
    debug!(item_id, "add_to_cart");

    let item = state
        .db
        .items()
        .get_by_id(item_id)
        .await?
        .ok_or(CoreError::ItemNotFound(item_id))?;

    let (changed, cart) = state.cart.apply(CartAction::AddItem(item))?;
    if !changed {
        return Err(CoreError::OutOfStock(item_id).into());
    }

    Ok(Json(CartView::from(cart)))
}

/// Sets a line's quantity. Clamped to what is in stock; zero removes the line.
pub async fn update_cart_item(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
    Json(request): Json<UpdateQuantityRequest>,
) -> Result<Json<CartView>, ApiError> {
    debug!(item_id, quantity = request.quantity, "update_cart_item");

    let (_, cart) = state.cart.apply(CartAction::UpdateQuantity {
        item_id,
        quantity: request.quantity,
    })?;

    Ok(Json(CartView::from(cart)))
}

pub async fn remove_from_cart(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
) -> Result<Json<CartView>, ApiError> {
    debug!(item_id, "remove_from_cart");
    let (_, cart) = state.cart.apply(CartAction::RemoveItem(item_id))?;
    Ok(Json(CartView::from(cart)))
}

/// Sets the amount the customer hands over. Any non-negative amount is
/// accepted; the settlement shows change or the amount still owed.
pub async fn set_amount_paid(
    State(state): State<AppState>,
    Json(request): Json<SetAmountPaidRequest>,
) -> Result<Json<CartView>, ApiError> {
    debug!(amount_cents = request.amount_cents, "set_amount_paid");
    validate_amount_paid(request.amount_cents)?;

    let (_, cart) = state.cart.apply(CartAction::SetCustomAmount(Money::from_cents(
        request.amount_cents,
    )))?;

    Ok(Json(CartView::from(cart)))
}

pub async fn clear_cart(State(state): State<AppState>) -> Result<Json<CartView>, ApiError> {
    debug!("clear_cart");
    let (_, cart) = state.cart.apply(CartAction::ClearCart)?;
    Ok(Json(CartView::from(cart)))
}
