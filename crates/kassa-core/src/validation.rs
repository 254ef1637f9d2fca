//! # Validation Module
//!
//! Input validation for item, request and payment forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractors (axum Json / Query)                          │
//! │  └── Type validation (deserialization)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── name required, sell > cost > 0, stock >= 0                        │
//! │  └── request: item XOR free-text name                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kassa_core::types::NewItem;
//! use kassa_core::validation::validate_new_item;
//!
//! let item = validate_new_item(NewItem {
//!     name: "  Beeswax candle ".to_string(),
//!     cost_price_cents: 250,
//!     sell_price_cents: 600,
//!     inventory_count: 12,
//! })
//! .unwrap();
//! assert_eq!(item.name, "Beeswax candle");
//! ```

use crate::error::ValidationError;
use crate::types::{CustomerContact, NewItem, NewRequest, RequestTarget};
use crate::{MAX_INVENTORY, MAX_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_CONTACT_LEN: usize = 200;
const MAX_QUERY_LEN: usize = 100;

// =============================================================================
// Items
// =============================================================================

/// Validates an item name and returns it trimmed.
pub fn validate_item_name(name: &str) -> ValidationResult<String> {
    required_trimmed("name", name, MAX_NAME_LEN)
}

/// Validates the price pair of an item.
///
/// ## Rules
/// - 0 < cost <= `MAX_PRICE_CENTS`
/// - 0 < sell <= `MAX_PRICE_CENTS`
/// - sell > cost
pub fn validate_prices(cost_price_cents: i64, sell_price_cents: i64) -> ValidationResult<()> {
    if cost_price_cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "costPrice".to_string(),
        });
    }

    if sell_price_cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "sellPrice".to_string(),
        });
    }

    for (field, cents) in [("costPrice", cost_price_cents), ("sellPrice", sell_price_cents)] {
        if cents > MAX_PRICE_CENTS {
            return Err(ValidationError::OutOfRange {
                field: field.to_string(),
                min: 1,
                max: MAX_PRICE_CENTS,
            });
        }
    }

    if sell_price_cents <= cost_price_cents {
        return Err(ValidationError::SellBelowCost {
            cost: cost_price_cents,
            sell: sell_price_cents,
        });
    }

    Ok(())
}

pub fn validate_inventory_count(count: i64) -> ValidationResult<()> {
    if count < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "inventoryCount".to_string(),
        });
    }
    if count > MAX_INVENTORY {
        return Err(ValidationError::OutOfRange {
            field: "inventoryCount".to_string(),
            min: 0,
            max: MAX_INVENTORY,
        });
    }
    Ok(())
}

/// Validates a full item form and normalizes it (trimmed name).
pub fn validate_new_item(item: NewItem) -> ValidationResult<NewItem> {
    let name = validate_item_name(&item.name)?;
    validate_prices(item.cost_price_cents, item.sell_price_cents)?;
    validate_inventory_count(item.inventory_count)?;

    Ok(NewItem { name, ..item })
}

/// Validates a search query. Empty means "no filter".
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Cart & Sales
// =============================================================================

/// The amount typed into "amount paid". Zero is accepted here (it only
/// blocks committing), negative amounts are not.
pub fn validate_amount_paid(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "amountPaid".to_string(),
        });
    }
    Ok(())
}

/// Validates a requested history page size.
pub fn validate_history_limit(limit: i64, max: i64) -> ValidationResult<i64> {
    if !(1..=max).contains(&limit) {
        return Err(ValidationError::OutOfRange {
            field: "limit".to_string(),
            min: 1,
            max,
        });
    }
    Ok(limit)
}

// =============================================================================
// Requests
// =============================================================================

/// Builds a request from raw form fields.
///
/// ## Rules
/// ```text
/// item_id   custom_item_name     result
/// ───────   ────────────────     ──────
/// Some      None / blank         Item
/// None      non-blank            Custom (trimmed)
/// None      None / blank         Required error
/// Some      non-blank            MutuallyExclusive error
/// ```
/// Contact fields are trimmed; blanks become `None`.
pub fn validate_new_request(
    item_id: Option<i64>,
    custom_item_name: Option<&str>,
    contact: CustomerContact,
) -> ValidationResult<NewRequest> {
    let custom_item_name = custom_item_name
        .map(str::trim)
        .filter(|name| !name.is_empty());

    let target = match (item_id, custom_item_name) {
        (Some(_), Some(_)) => {
            return Err(ValidationError::MutuallyExclusive {
                first: "itemId".to_string(),
                second: "customItemName".to_string(),
            })
        }
        (Some(item_id), None) => RequestTarget::Item { item_id },
        (None, Some(name)) => {
            if name.chars().count() > MAX_NAME_LEN {
                return Err(ValidationError::TooLong {
                    field: "customItemName".to_string(),
                    max: MAX_NAME_LEN,
                });
            }
            RequestTarget::Custom {
                name: name.to_string(),
            }
        }
        (None, None) => {
            return Err(ValidationError::Required {
                field: "customItemName".to_string(),
            })
        }
    };

    Ok(NewRequest {
        target,
        contact: CustomerContact {
            name: optional_trimmed("customerName", contact.name)?,
            phone: optional_trimmed("customerPhone", contact.phone)?,
            email: optional_trimmed("customerEmail", contact.email)?,
        },
    })
}

// =============================================================================
// Helpers
// =============================================================================

fn required_trimmed(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

fn optional_trimmed(field: &str, value: Option<String>) -> ValidationResult<Option<String>> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) if value.chars().count() > MAX_CONTACT_LEN => Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_CONTACT_LEN,
        }),
        Some(value) => Ok(Some(value.to_string())),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
