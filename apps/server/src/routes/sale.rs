//! # Sale Routes
//!
//! Committing the cart and browsing past sales.
//!
//! ## Commit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /api/sales                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  cart.begin_commit()        snapshot; 409 if a commit is running       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  snapshot.to_new_sale()     422 EMPTY_CART / PAYMENT_ERROR             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.sales().commit()        one transaction: sale, lines, stock        │
//! │       │  ✗ → logged, generic message, cart untouched                   │
//! │       ▼                                                                 │
//! │  guard.finish()             clear cart unless edited meanwhile         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  201 SaleReceipt                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use kassa_core::validation::validate_history_limit;
use kassa_core::{SaleLine, SaleWithLines, Settlement, MAX_HISTORY_LIMIT};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

/// Returned after a successful commit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleReceipt {
    pub sale_id: i64,
    pub total_amount_cents: i64,
    pub amount_paid_cents: i64,
    pub settlement: Settlement,
    /// Total formatted with the store currency, e.g. `€14.50`.
    pub total_display: String,
    /// `false` when the cart was edited while the sale was being stored.
    pub cart_cleared: bool,
}

/// One sale in the history list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleView {
    pub id: i64,
    pub total_amount_cents: i64,
    pub amount_paid_cents: i64,
    pub created_at: DateTime<Utc>,
    pub settlement: Settlement,
    pub lines: Vec<SaleLineView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineView {
    pub item_id: Option<i64>,
    pub item_name: String,
    pub quantity: i64,
    pub price_per_item_cents: i64,
    pub line_total_cents: i64,
}

impl From<SaleLine> for SaleLineView {
    fn from(line: SaleLine) -> Self {
        SaleLineView {
            item_name: line.display_name().to_string(),
            line_total_cents: line.line_total().cents(),
            item_id: line.item_id,
            quantity: line.quantity,
            price_per_item_cents: line.price_per_item_cents,
        }
    }
}

impl From<SaleWithLines> for SaleView {
    fn from(entry: SaleWithLines) -> Self {
        let SaleWithLines { sale, lines } = entry;
        SaleView {
            settlement: sale.settlement(),
            id: sale.id,
            total_amount_cents: sale.total_amount_cents,
            amount_paid_cents: sale.amount_paid_cents,
            created_at: sale.created_at,
            lines: lines.into_iter().map(SaleLineView::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// Commits the current cart as a sale.
///
/// ## Errors
/// - `EMPTY_CART` (422) when the cart has no lines
/// - `PAYMENT_ERROR` (422) when the amount paid is zero
/// - `SALE_IN_PROGRESS` (409) when another commit is still running
/// - `INSUFFICIENT_STOCK` (409) when stock ran out since the items were added
/// - `SALE_FAILED` (500) for anything else
///
/// In every error case nothing is stored and the cart is left as it was.
pub async fn commit_sale(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SaleReceipt>), ApiError> {
    let guard = state.cart.begin_commit()?;
    let new_sale = guard.cart().to_new_sale()?;

    debug!(
        lines = new_sale.lines.len(),
        total_cents = new_sale.total_amount_cents,
        "commit_sale"
    );

    let sale = state
        .db
        .sales()
        .commit(&new_sale)
        .await
        .map_err(ApiError::sale_failed)?;

    let cart_cleared = guard.finish();

    info!(sale_id = sale.id, cart_cleared, "Sale completed");

    Ok((
        StatusCode::CREATED,
        Json(SaleReceipt {
            sale_id: sale.id,
            total_amount_cents: sale.total_amount_cents,
            amount_paid_cents: sale.amount_paid_cents,
            settlement: sale.settlement(),
            total_display: state.config.format_money(sale.total_amount()),
            cart_cleared,
        }),
    ))
}

/// The most recent sales, newest first.
///
/// ## Arguments
/// * `limit` - Number of sales, 1 to 200. Defaults to the configured
///   history limit.
pub async fn list_sales(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<SaleView>>, ApiError> {
    let limit = validate_history_limit(
        query.limit.unwrap_or(state.config.history_limit),
        MAX_HISTORY_LIMIT,
    )?;
    debug!(limit, "list_sales");

    let sales = state.db.sales().recent(limit).await?;
    Ok(Json(sales.into_iter().map(SaleView::from).collect()))
}
