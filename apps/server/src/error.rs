//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Handler                                                               │
//! │  Result<Json<T>, ApiError>                                             │
//! │       │                                                                 │
//! │       ├── ValidationError ──────────────► 400 VALIDATION_ERROR          │
//! │       ├── CoreError (cart rules) ───────► 409 / 422                     │
//! │       ├── DbError::NotFound ────────────► 404 NOT_FOUND                 │
//! │       └── DbError (anything else) ──────► 500, logged, generic message  │
//! │                                                                         │
//! │  Body: { "code": "NOT_FOUND", "message": "Item not found: 42" }        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kassa_core::{CoreError, ValidationError};
use kassa_db::DbError;
use serde::Serialize;

/// Message shown whenever a sale could not be committed.
pub const SALE_FAILED_MESSAGE: &str = "Could not complete the sale. Please try again.";

/// API error returned from handlers.
///
/// ```json
/// {
///   "code": "OUT_OF_STOCK",
///   "message": "Item 7 is out of stock"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Item has no more stock to add to the cart (409)
    OutOfStock,

    /// Stock ran out between adding to the cart and committing (409)
    InsufficientStock,

    /// Another commit of the cart is still running (409)
    SaleInProgress,

    /// Nothing in the cart to sell (422)
    EmptyCart,

    /// Amount paid not acceptable for a commit (422)
    PaymentError,

    /// Sale could not be committed (500)
    SaleFailed,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::OutOfStock | ErrorCode::InsufficientStock | ErrorCode::SaleInProgress => {
                StatusCode::CONFLICT
            }
            ErrorCode::EmptyCart | ErrorCode::PaymentError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::SaleFailed | ErrorCode::DatabaseError | ErrorCode::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Maps a failed commit to a response. The cause is logged, the client
    /// only learns whether retrying could help.
    pub fn sale_failed(err: DbError) -> Self {
        tracing::error!(error = %err, "Sale commit failed");
        match err {
            DbError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, SALE_FAILED_MESSAGE)
            }
            _ => ApiError::new(ErrorCode::SaleFailed, SALE_FAILED_MESSAGE),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, id),
            DbError::InsufficientStock { item_id, requested } => ApiError::new(
                ErrorCode::InsufficientStock,
                format!("Not enough stock for item {}: {} requested", item_id, requested),
            ),
            DbError::EmptySale => ApiError::new(ErrorCode::EmptyCart, "Cart is empty"),
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            DbError::CheckViolation { message } => {
                tracing::error!("Check constraint violation: {}", message);
                ApiError::validation("Invalid value")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ItemNotFound(id) => ApiError::not_found("Item", id),
            CoreError::OutOfStock(_) => ApiError::new(ErrorCode::OutOfStock, err.to_string()),
            CoreError::EmptyCart => ApiError::new(ErrorCode::EmptyCart, err.to_string()),
            CoreError::InvalidAmountPaid { .. } => {
                ApiError::new(ErrorCode::PaymentError, err.to_string())
            }
            CoreError::AmountOverflow => ApiError::validation(err.to_string()),
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}
