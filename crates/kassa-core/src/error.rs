//! # Error Types
//!
//! Domain-specific error types for kassa-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kassa-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  kassa-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  kassa-server errors                                                   │
//! │  └── ApiError         - What the HTTP client sees (serialized)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Item does not exist (or was deleted).
    #[error("Item not found: {0}")]
    ItemNotFound(i64),

    /// Item is out of stock and cannot be added to the cart.
    #[error("Item {0} is out of stock")]
    OutOfStock(i64),

    /// A sale cannot be committed from an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Amount paid is missing or not positive.
    ///
    /// ## When This Occurs
    /// ```text
    /// Cart total: €12.50
    /// Amount paid: €0.00   ← "Complete sale" is not allowed
    /// ```
    #[error("Invalid amount paid: {reason}")]
    InvalidAmountPaid { reason: String },

    /// A cart total that does not fit in `i64` cents.
    #[error("Cart total is too large")]
    AmountOverflow,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before anything touches the database.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Sell price must exceed cost price.
    #[error("Sell price ({sell}) must be higher than cost price ({cost})")]
    SellBelowCost { cost: i64, sell: i64 },

    /// Invalid format (e.g., unknown time range).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Two fields that exclude each other were both given.
    #[error("{first} and {second} cannot both be set")]
    MutuallyExclusive { first: String, second: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
