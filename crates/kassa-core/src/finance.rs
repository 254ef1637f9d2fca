//! # Finance
//!
//! Revenue, cost and profit over a trailing time range.
//!
//! ## Aggregation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sales since range start            lines (qty, price, item cost/name) │
//! │          │                                        │                     │
//! │          ▼                                        ▼                     │
//! │  per day: revenue += sale total     totals: revenue += qty × price      │
//! │           sales   += 1                      cost    += qty × cost_price │
//! │           cost    += line costs     per item name: qty, revenue         │
//! │          │                                        │                     │
//! │          └──────────────┬─────────────────────────┘                     │
//! │                         ▼                                               │
//! │  FinanceSummary { totals, sales_by_date (ascending), top 10 items }     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Per-day revenue counts the sale totals while overall revenue counts the
//! line amounts. They agree for every sale committed through the cart.
//! Cost uses the item's current cost price; deleted items contribute no cost.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{FinanceLine, Sale};
use crate::{DELETED_ITEM_NAME, TOP_ITEMS_LIMIT};

// =============================================================================
// Time Range
// =============================================================================

/// The trailing window a finance summary covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum TimeRange {
    Week,
    #[default]
    Month,
    Year,
}

impl TimeRange {
    /// Start of the window ending at `now`.
    pub fn start(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            TimeRange::Week => now - Duration::days(7),
            TimeRange::Month => now.checked_sub_months(Months::new(1)).unwrap_or(now),
            TimeRange::Year => now.checked_sub_months(Months::new(12)).unwrap_or(now),
        }
    }
}

impl FromStr for TimeRange {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(TimeRange::Week),
            "month" => Ok(TimeRange::Month),
            "year" => Ok(TimeRange::Year),
            other => Err(ValidationError::InvalidFormat {
                field: "range".to_string(),
                reason: format!("expected week, month or year, got '{other}'"),
            }),
        }
    }
}

// =============================================================================
// Summary Types
// =============================================================================

/// Figures for one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DailyFinance {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub revenue: Money,
    pub cost: Money,
    pub profit: Money,
    pub sales: i64,
}

/// A best-selling item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TopItem {
    pub name: String,
    pub quantity: i64,
    pub revenue: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FinanceSummary {
    pub total_revenue: Money,
    pub total_cost: Money,
    pub profit: Money,
    pub sales_count: i64,
    pub sales_by_date: Vec<DailyFinance>,
    pub top_items: Vec<TopItem>,
}

// =============================================================================
// Aggregation
// =============================================================================

#[derive(Default)]
struct DayAccumulator {
    revenue: Money,
    cost: Money,
    sales: i64,
}

/// Aggregates sales and their lines into a summary.
///
/// Lines whose `sale_id` is not among `sales` are ignored.
pub fn summarize(sales: &[Sale], lines: &[FinanceLine]) -> FinanceSummary {
    let mut days: BTreeMap<NaiveDate, DayAccumulator> = BTreeMap::new();
    let mut sale_dates: HashMap<i64, NaiveDate> = HashMap::with_capacity(sales.len());

    for sale in sales {
        let date = sale.created_at.date_naive();
        sale_dates.insert(sale.id, date);

        let day = days.entry(date).or_default();
        day.revenue += sale.total_amount();
        day.sales += 1;
    }

    let mut total_revenue = Money::zero();
    let mut total_cost = Money::zero();
    let mut items: HashMap<&str, (i64, Money)> = HashMap::new();

    for line in lines {
        let Some(date) = sale_dates.get(&line.sale_id) else {
            continue;
        };

        let revenue = Money::from_cents(line.price_per_item_cents) * line.quantity;
        let cost = Money::from_cents(line.cost_price_cents.unwrap_or(0)) * line.quantity;

        total_revenue += revenue;
        total_cost += cost;
        if let Some(day) = days.get_mut(date) {
            day.cost += cost;
        }

        let name = line.item_name.as_deref().unwrap_or(DELETED_ITEM_NAME);
        let entry = items.entry(name).or_insert((0, Money::zero()));
        entry.0 += line.quantity;
        entry.1 += revenue;
    }

    let sales_by_date = days
        .into_iter()
        .map(|(date, day)| DailyFinance {
            date,
            revenue: day.revenue,
            cost: day.cost,
            profit: day.revenue - day.cost,
            sales: day.sales,
        })
        .collect();

    let mut top_items: Vec<TopItem> = items
        .into_iter()
        .map(|(name, (quantity, revenue))| TopItem {
            name: name.to_string(),
            quantity,
            revenue,
        })
        .collect();
    top_items.sort_by(|a, b| b.revenue.cmp(&a.revenue).then_with(|| a.name.cmp(&b.name)));
    top_items.truncate(TOP_ITEMS_LIMIT);

    FinanceSummary {
        total_revenue,
        total_cost,
        profit: total_revenue - total_cost,
        sales_count: sales.len() as i64,
        sales_by_date,
        top_items,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
