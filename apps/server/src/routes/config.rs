//! # Config Routes
//!
//! Exposes the parts of the server configuration the till needs to render
//! itself. Paths and bind addresses are not exposed.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::debug;

use crate::state::AppState;

/// Store settings for the front end.
///
/// ```json
/// {
///   "storeName": "Candle Corner",
///   "currencySymbol": "€",
///   "lowStockThreshold": 5,
///   "historyLimit": 50
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreInfo {
    pub store_name: String,
    pub currency_symbol: String,
    pub low_stock_threshold: i64,
    pub history_limit: i64,
}

pub async fn get_config(State(state): State<AppState>) -> Json<StoreInfo> {
    debug!("get_config");
    let config = &state.config;
    Json(StoreInfo {
        store_name: config.store_name.clone(),
        currency_symbol: config.currency_symbol.clone(),
        low_stock_threshold: config.low_stock_threshold,
        history_limit: config.history_limit,
    })
}
