//! # Request Repository
//!
//! Customer requests for items the shop is out of, or does not stock.
//! Fulfilling a request deletes it.

use chrono::Utc;
use kassa_core::{CustomerRequest, NewRequest, RequestTarget};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

const REQUEST_SELECT: &str = "SELECT r.id, r.item_id, r.custom_item_name,
            r.customer_name, r.customer_phone, r.customer_email,
            r.created_at, i.name AS item_name
     FROM requests r
     LEFT JOIN items i ON i.id = r.item_id";

/// Repository for customer request database operations.
#[derive(Debug, Clone)]
pub struct RequestRepository {
    pool: SqlitePool,
}

impl RequestRepository {
    pub fn new(pool: SqlitePool) -> Self {
        RequestRepository { pool }
    }

    /// Open requests, newest first, with the requested item's name joined in.
    pub async fn list(&self) -> DbResult<Vec<CustomerRequest>> {
        let sql = format!("{REQUEST_SELECT} ORDER BY r.created_at DESC, r.id DESC");
        let requests = sqlx::query_as::<_, CustomerRequest>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(requests)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<CustomerRequest>> {
        let sql = format!("{REQUEST_SELECT} WHERE r.id = ?1");
        let request = sqlx::query_as::<_, CustomerRequest>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(request)
    }

    /// Stores a validated request.
    ///
    /// ## Errors
    /// `DbError::ForeignKeyViolation` if the target item does not exist.
    pub async fn insert(&self, request: &NewRequest) -> DbResult<CustomerRequest> {
        let (item_id, custom_item_name) = match &request.target {
            RequestTarget::Item { item_id } => (Some(*item_id), None),
            RequestTarget::Custom { name } => (None, Some(name.as_str())),
        };

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO requests
                (item_id, custom_item_name, customer_name, customer_phone, customer_email, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id",
        )
        .bind(item_id)
        .bind(custom_item_name)
        .bind(request.contact.name.as_deref())
        .bind(request.contact.phone.as_deref())
        .bind(request.contact.email.as_deref())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        info!(id, ?item_id, "Customer request recorded");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Request", id))
    }

    /// Marks a request fulfilled by removing it.
    pub async fn fulfil(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM requests WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Request", id));
        }

        debug!(id, "Request fulfilled");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use kassa_core::{CustomerContact, NewItem};

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn add_item(db: &Database, name: &str) -> i64 {
        db.items()
            .insert(&NewItem {
                name: name.to_string(),
                cost_price_cents: 100,
                sell_price_cents: 250,
                inventory_count: 0,
            })
            .await
            .unwrap()
            .id
    }

    fn contact(name: &str) -> CustomerContact {
        CustomerContact {
            name: Some(name.to_string()),
            phone: Some("0612345678".to_string()),
            email: None,
        }
    }

    #[tokio::test]
    async fn test_insert_item_request_joins_name() {
        let db = setup().await;
        let item_id = add_item(&db, "Lavender candle").await;

        let stored = db
            .requests()
            .insert(&NewRequest {
                target: RequestTarget::Item { item_id },
                contact: contact("Anna"),
            })
            .await
            .unwrap();

        assert_eq!(stored.item_id, Some(item_id));
        assert_eq!(stored.custom_item_name, None);
        assert_eq!(stored.item_name.as_deref(), Some("Lavender candle"));
        assert_eq!(stored.customer_name.as_deref(), Some("Anna"));
        assert_eq!(stored.customer_email, None);
    }

    #[tokio::test]
    async fn test_insert_custom_request() {
        let db = setup().await;
        let stored = db
            .requests()
            .insert(&NewRequest {
                target: RequestTarget::Custom {
                    name: "Black taper candles".to_string(),
                },
                contact: CustomerContact::default(),
            })
            .await
            .unwrap();

        assert_eq!(stored.item_id, None);
        assert_eq!(stored.custom_item_name.as_deref(), Some("Black taper candles"));
        assert_eq!(stored.item_name, None);
    }

    #[tokio::test]
    async fn test_request_for_unknown_item_is_rejected() {
        let db = setup().await;
        let result = db
            .requests()
            .insert(&NewRequest {
                target: RequestTarget::Item { item_id: 777 },
                contact: CustomerContact::default(),
            })
            .await;

        assert!(matches!(result, Err(DbError::ForeignKeyViolation { .. })));
    }

    #[tokio::test]
    async fn test_list_and_fulfil() {
        let db = setup().await;
        let first = db
            .requests()
            .insert(&NewRequest {
                target: RequestTarget::Custom { name: "Wicks".to_string() },
                contact: CustomerContact::default(),
            })
            .await
            .unwrap();
        let second = db
            .requests()
            .insert(&NewRequest {
                target: RequestTarget::Custom { name: "Moulds".to_string() },
                contact: CustomerContact::default(),
            })
            .await
            .unwrap();

        let listed = db.requests().list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);

        db.requests().fulfil(first.id).await.unwrap();
        assert!(matches!(
            db.requests().fulfil(first.id).await,
            Err(DbError::NotFound { .. })
        ));
        assert_eq!(db.requests().list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_deleting_item_removes_its_requests() {
        let db = setup().await;
        let item_id = add_item(&db, "Lavender candle").await;
        db.requests()
            .insert(&NewRequest {
                target: RequestTarget::Item { item_id },
                contact: CustomerContact::default(),
            })
            .await
            .unwrap();

        db.items().delete(item_id).await.unwrap();
        assert!(db.requests().list().await.unwrap().is_empty());
    }
}
