//! # Domain Types
//!
//! Core domain types used throughout Kassa POS.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Item       │   │      Sale       │   │ CustomerRequest │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  total_amount   │   │  item_id  XOR   │       │
//! │  │  name           │   │  amount_paid    │   │  custom name    │       │
//! │  │  cost / sell    │   │       │         │   │  contact info   │       │
//! │  │  inventory      │   │       ▼         │   └─────────────────┘       │
//! │  └─────────────────┘   │   SaleLine[]    │                             │
//! │                        │   qty × price   │                             │
//! │                        │   (snapshot)    │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Row types derive `sqlx::FromRow` when the `sqlx` feature is on, so the
//! database crate can map query results straight into them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Settlement;
use crate::money::Money;
use crate::{DELETED_ITEM_NAME, LOW_STOCK_THRESHOLD};

// =============================================================================
// Item
// =============================================================================

/// An item that can be sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Item {
    pub id: i64,
    pub name: String,
    /// Purchase price in cents.
    pub cost_price_cents: i64,
    /// Selling price in cents. Higher than cost for anything created through
    /// the item form, though storage does not enforce it.
    pub sell_price_cents: i64,
    pub inventory_count: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Item {
    #[inline]
    pub fn cost_price(&self) -> Money {
        Money::from_cents(self.cost_price_cents)
    }

    #[inline]
    pub fn sell_price(&self) -> Money {
        Money::from_cents(self.sell_price_cents)
    }

    /// Profit per unit sold.
    #[inline]
    pub fn margin(&self) -> Money {
        self.sell_price() - self.cost_price()
    }

    /// Stock badge shown on the item grid.
    pub fn stock_level(&self) -> StockLevel {
        StockLevel::classify(self.inventory_count, LOW_STOCK_THRESHOLD)
    }
}

/// Item fields as entered in the create/edit form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewItem {
    pub name: String,
    pub cost_price_cents: i64,
    pub sell_price_cents: i64,
    pub inventory_count: i64,
}

// =============================================================================
// Stock Level
// =============================================================================

/// Coarse stock classification for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum StockLevel {
    OutOfStock,
    Low,
    Available,
}

impl StockLevel {
    /// Classifies a stock count. `threshold` is inclusive: a count equal to
    /// it is already low.
    pub fn classify(count: i64, threshold: i64) -> Self {
        if count <= 0 {
            StockLevel::OutOfStock
        } else if count <= threshold {
            StockLevel::Low
        } else {
            StockLevel::Available
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A committed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sale {
    pub id: i64,
    pub total_amount_cents: i64,
    pub amount_paid_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }

    #[inline]
    pub fn amount_paid(&self) -> Money {
        Money::from_cents(self.amount_paid_cents)
    }

    /// Change given or amount still owed when the sale was rung up.
    pub fn settlement(&self) -> Settlement {
        Settlement::between(self.total_amount(), self.amount_paid())
    }
}

/// One line of a committed sale.
///
/// `quantity` and `price_per_item_cents` are frozen at commit time.
/// `item_name` is joined from the live item and is `None` once the item
/// has been deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleLine {
    pub id: i64,
    pub sale_id: i64,
    pub item_id: Option<i64>,
    pub item_name: Option<String>,
    pub quantity: i64,
    pub price_per_item_cents: i64,
}

impl SaleLine {
    #[inline]
    pub fn price_per_item(&self) -> Money {
        Money::from_cents(self.price_per_item_cents)
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        self.price_per_item() * self.quantity
    }

    pub fn display_name(&self) -> &str {
        self.item_name.as_deref().unwrap_or(DELETED_ITEM_NAME)
    }
}

/// A sale together with its lines, as listed in the history view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleWithLines {
    pub sale: Sale,
    pub lines: Vec<SaleLine>,
}

/// Everything needed to persist a sale, derived from a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewSale {
    pub total_amount_cents: i64,
    pub amount_paid_cents: i64,
    pub lines: Vec<NewSaleLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewSaleLine {
    pub item_id: i64,
    pub quantity: i64,
    pub price_per_item_cents: i64,
}

/// A sold line joined with the item's current name and cost price, used for
/// finance aggregation. Both are `None` when the item was deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct FinanceLine {
    pub sale_id: i64,
    pub quantity: i64,
    pub price_per_item_cents: i64,
    pub item_name: Option<String>,
    pub cost_price_cents: Option<i64>,
}

// =============================================================================
// Customer Request
// =============================================================================

/// What a customer asked for: an item we carry, or something described in
/// free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum RequestTarget {
    Item {
        #[serde(rename = "itemId")]
        item_id: i64,
    },
    Custom {
        name: String,
    },
}

/// Optional contact details left with a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CustomerContact {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// A validated request ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRequest {
    pub target: RequestTarget,
    pub contact: CustomerContact,
}

/// A stored customer request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CustomerRequest {
    pub id: i64,
    pub item_id: Option<i64>,
    pub custom_item_name: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    /// Name of the referenced item, joined at query time.
    pub item_name: Option<String>,
}

impl CustomerRequest {
    /// What was asked for. Storage guarantees exactly one of `item_id` and
    /// `custom_item_name` is set.
    pub fn target(&self) -> RequestTarget {
        match (self.item_id, &self.custom_item_name) {
            (Some(item_id), _) => RequestTarget::Item { item_id },
            (None, name) => RequestTarget::Custom {
                name: name.clone().unwrap_or_default(),
            },
        }
    }

    /// Name to show in the request list.
    pub fn display_name(&self) -> &str {
        self.item_name
            .as_deref()
            .or(self.custom_item_name.as_deref())
            .unwrap_or(DELETED_ITEM_NAME)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(inventory_count: i64) -> Item {
        Item {
            id: 1,
            name: "Beeswax candle".to_string(),
            cost_price_cents: 250,
            sell_price_cents: 600,
            inventory_count,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_stock_level_thresholds() {
        assert_eq!(item(0).stock_level(), StockLevel::OutOfStock);
        assert_eq!(item(1).stock_level(), StockLevel::Low);
        assert_eq!(item(5).stock_level(), StockLevel::Low);
        assert_eq!(item(6).stock_level(), StockLevel::Available);
    }

    #[test]
    fn test_item_margin() {
        assert_eq!(item(3).margin(), Money::from_cents(350));
    }

    #[test]
    fn test_sale_line_display_name_for_deleted_item() {
        let line = SaleLine {
            id: 1,
            sale_id: 1,
            item_id: None,
            item_name: None,
            quantity: 2,
            price_per_item_cents: 300,
        };
        assert_eq!(line.display_name(), DELETED_ITEM_NAME);
        assert_eq!(line.line_total(), Money::from_cents(600));
    }

    #[test]
    fn test_request_target_from_row() {
        let mut request = CustomerRequest {
            id: 1,
            item_id: Some(4),
            custom_item_name: None,
            customer_name: None,
            customer_phone: None,
            customer_email: None,
            created_at: Utc::now(),
            item_name: Some("Soy candle".to_string()),
        };
        assert_eq!(request.target(), RequestTarget::Item { item_id: 4 });
        assert_eq!(request.display_name(), "Soy candle");

        request.item_id = None;
        request.item_name = None;
        request.custom_item_name = Some("Lavender wax melt".to_string());
        assert_eq!(
            request.target(),
            RequestTarget::Custom {
                name: "Lavender wax melt".to_string()
            }
        );
        assert_eq!(request.display_name(), "Lavender wax melt");
    }

    #[test]
    fn test_request_target_json_shape() {
        let target: RequestTarget =
            serde_json::from_str(r#"{"kind":"item","itemId":3}"#).unwrap();
        assert_eq!(target, RequestTarget::Item { item_id: 3 });

        let target: RequestTarget =
            serde_json::from_str(r#"{"kind":"custom","name":"Tea lights"}"#).unwrap();
        assert_eq!(
            target,
            RequestTarget::Custom {
                name: "Tea lights".to_string()
            }
        );
    }
}
