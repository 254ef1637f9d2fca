//! # Request Routes
//!
//! Customer requests for items that are out of stock or not carried.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kassa_core::validation::validate_new_request;
use kassa_core::{CustomerContact, CustomerRequest, RequestTarget};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

/// The request form. Exactly one of `itemId` and `customItemName` is set.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestForm {
    pub item_id: Option<i64>,
    pub custom_item_name: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestView {
    #[serde(flatten)]
    pub request: CustomerRequest,
    /// Item name, or the free-text name for custom requests.
    pub display_name: String,
}

impl From<CustomerRequest> for RequestView {
    fn from(request: CustomerRequest) -> Self {
        RequestView {
            display_name: request.display_name().to_string(),
            request,
        }
    }
}

pub async fn list_requests(
    State(state): State<AppState>,
) -> Result<Json<Vec<RequestView>>, ApiError> {
    debug!("list_requests");
    let requests = state.db.requests().list().await?;
    Ok(Json(requests.into_iter().map(RequestView::from).collect()))
}

/// Records a request.
///
/// ## Errors
/// - `VALIDATION_ERROR` when both or neither of item and custom name are set
/// - `NOT_FOUND` when the referenced item does not exist
pub async fn create_request(
    State(state): State<AppState>,
    Json(form): Json<RequestForm>,
) -> Result<(StatusCode, Json<RequestView>), ApiError> {
    let request = validate_new_request(
        form.item_id,
        form.custom_item_name.as_deref(),
        CustomerContact {
            name: form.customer_name,
            phone: form.customer_phone,
            email: form.customer_email,
        },
    )?;

    if let RequestTarget::Item { item_id } = request.target {
        if state.db.items().get_by_id(item_id).await?.is_none() {
            return Err(ApiError::not_found("Item", item_id));
        }
    }

    let stored = state.db.requests().insert(&request).await?;
    Ok((StatusCode::CREATED, Json(RequestView::from(stored))))
}

/// Fulfils a request, which removes it from the list.
pub async fn fulfil_request(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.db.requests().fulfil(id).await?;
    info!(id, "Request fulfilled");
    Ok(StatusCode::NO_CONTENT)
}
