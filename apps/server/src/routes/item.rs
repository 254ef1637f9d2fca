//! # Item Routes
//!
//! Inventory management: the item grid, its search box and the add/edit form.
//!
//! ## Create / Edit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Form submit                                                           │
//! │  { name, costPriceCents, sellPriceCents, inventoryCount }              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_new_item()   name trimmed, 1..=200 chars                     │
//! │                        cost > 0, sell > 0, sell > cost                 │
//! │                        inventory >= 0                                  │
//! │       │  ✗ → 400 VALIDATION_ERROR                                      │
//! │       ▼                                                                 │
//! │  db.items().insert() / update()                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ItemView { ...item, stockLevel }                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use kassa_core::validation::{validate_new_item, validate_search_query};
use kassa_core::{CartAction, Item, NewItem, StockLevel};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

/// An item as shown in the grid, with its stock badge.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    #[serde(flatten)]
    pub item: Item,
    pub stock_level: StockLevel,
}

impl ItemView {
    fn new(item: Item, low_stock_threshold: i64) -> Self {
        let stock_level = StockLevel::classify(item.inventory_count, low_stock_threshold);
        ItemView { item, stock_level }
    }
}

#[derive(Debug, Deserialize)]
pub struct ItemQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct BulkDeleteResponse {
    pub deleted: u64,
}

/// Lists items, optionally filtered by a name substring.
///
/// ## Arguments
/// * `q` - Search text, matched case-insensitively anywhere in the name.
///   Blank means no filter.
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ItemQuery>,
) -> Result<Json<Vec<ItemView>>, ApiError> {
    let start = Instant::now();
    let q = validate_search_query(query.q.as_deref().unwrap_or(""))?;

    let items = state.db.items().search(&q).await?;
    let threshold = state.config.low_stock_threshold;
    let views: Vec<ItemView> = items
        .into_iter()
        .map(|item| ItemView::new(item, threshold))
        .collect();

    debug!(
        query = %q,
        count = views.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "list_items"
    );

    Ok(Json(views))
}

pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ItemView>, ApiError> {
    debug!(id, "get_item");

    let item = state
        .db
        .items()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Item", id))?;

    Ok(Json(ItemView::new(item, state.config.low_stock_threshold)))
}

/// Creates an item from the add-item form.
///
/// ## Returns
/// `201 Created` with the stored item.
pub async fn create_item(
    State(state): State<AppState>,
    Json(form): Json<NewItem>,
) -> Result<(StatusCode, Json<ItemView>), ApiError> {
    let item = validate_new_item(form)?;
    let stored = state.db.items().insert(&item).await?;

    info!(id = stored.id, name = %stored.name, "Item created");

    Ok((
        StatusCode::CREATED,
        Json(ItemView::new(stored, state.config.low_stock_threshold)),
    ))
}

/// Replaces an item's name, prices and stock count.
///
/// A cart line for this item keeps its old snapshot until the item is added
/// again, which refreshes it.
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<NewItem>,
) -> Result<Json<ItemView>, ApiError> {
    let item = validate_new_item(form)?;
    let stored = state.db.items().update(id, &item).await?;

    info!(id, name = %stored.name, "Item updated");

    Ok(Json(ItemView::new(stored, state.config.low_stock_threshold)))
}

/// Deletes an item and drops it from the cart.
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.db.items().delete(id).await?;
    drop_from_cart(&state, &[id])?;

    info!(id, "Item deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Deletes several items at once. Unknown ids are ignored.
pub async fn bulk_delete_items(
    State(state): State<AppState>,
    Json(request): Json<BulkDeleteRequest>,
) -> Result<Json<BulkDeleteResponse>, ApiError> {
    let deleted = state.db.items().delete_many(&request.ids).await?;
    drop_from_cart(&state, &request.ids)?;

    info!(requested = request.ids.len(), deleted, "Items bulk deleted");
    Ok(Json(BulkDeleteResponse { deleted }))
}

/// Removes lines for deleted items, which could never be committed.
fn drop_from_cart(state: &AppState, ids: &[i64]) -> Result<(), ApiError> {
    for &id in ids {
        if state.cart.with_cart(|cart| cart.quantity_of(id).is_some()) {
            state.cart.apply(CartAction::RemoveItem(id))?;
        }
    }
    Ok(())
}
