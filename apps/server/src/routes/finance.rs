//! # Finance Routes
//!
//! Revenue, cost and profit over a trailing window.
//!
//! ```text
//! GET /api/finance?range=week
//!      │
//!      ▼
//! start = now - 7 days
//!      │
//!      ▼
//! db.sales().since(start) ──► (sales, lines + current cost)
//!      │
//!      ▼
//! finance::summarize() ──► totals, per-day rows, top 10 items
//! ```

use std::time::Instant;

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use kassa_core::finance::{summarize, FinanceSummary, TimeRange};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FinanceQuery {
    pub range: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceView {
    pub range: TimeRange,
    pub start: DateTime<Utc>,
    #[serde(flatten)]
    pub summary: FinanceSummary,
}

/// Finance summary for `week`, `month` (default) or `year`.
pub async fn get_finance(
    State(state): State<AppState>,
    Query(query): Query<FinanceQuery>,
) -> Result<Json<FinanceView>, ApiError> {
    let timer = Instant::now();
    let range: TimeRange = match query.range.as_deref() {
        Some(raw) => raw.parse()?,
        None => TimeRange::default(),
    };
    let start = range.start(Utc::now());

    let (sales, lines) = state.db.sales().since(start).await?;
    let summary = summarize(&sales, &lines);

    debug!(
        ?range,
        sales = summary.sales_count,
        elapsed_ms = timer.elapsed().as_secs_f64() * 1000.0,
        "get_finance"
    );

    Ok(Json(FinanceView {
        range,
        start,
        summary,
    }))
}
