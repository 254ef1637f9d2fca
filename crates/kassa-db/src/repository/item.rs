//! # Item Repository
//!
//! CRUD and name search over the `items` table.
//!
//! ## Search
//! ```text
//! User types: "cand"
//!      │
//!      ▼
//! name LIKE '%cand%'  (case-insensitive, % and _ escaped)
//!      │
//!      ▼
//! "Beeswax candle", "Candle holder", "Soy Candle"   (ordered by name)
//! ```

use chrono::Utc;
use kassa_core::{Item, NewItem};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};

const ITEM_COLUMNS: &str =
    "id, name, cost_price_cents, sell_price_cents, inventory_count, created_at";

/// Repository for item database operations.
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// All items, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Item>> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items ORDER BY name COLLATE NOCASE, id");
        let items = sqlx::query_as::<_, Item>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Items whose name contains `query`, ignoring case. An empty query
    /// returns every item.
    pub async fn search(&self, query: &str) -> DbResult<Vec<Item>> {
        if query.is_empty() {
            return self.list().await;
        }

        debug!(query = %query, "Searching items");

        let sql = format!(
            r"SELECT {ITEM_COLUMNS} FROM items
              WHERE name LIKE '%' || ?1 || '%' ESCAPE '\'
              ORDER BY name COLLATE NOCASE, id"
        );
        let items = sqlx::query_as::<_, Item>(&sql)
            .bind(escape_like(query))
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Item>> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1");
        let item = sqlx::query_as::<_, Item>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    /// Inserts a validated item and returns the stored row.
    pub async fn insert(&self, item: &NewItem) -> DbResult<Item> {
        debug!(name = %item.name, "Inserting item");

        let sql = format!(
            "INSERT INTO items (name, cost_price_cents, sell_price_cents, inventory_count, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING {ITEM_COLUMNS}"
        );
        let stored = sqlx::query_as::<_, Item>(&sql)
            .bind(&item.name)
            .bind(item.cost_price_cents)
            .bind(item.sell_price_cents)
            .bind(item.inventory_count)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        Ok(stored)
    }

    /// Overwrites the editable fields of an item.
    ///
    /// ## Errors
    /// `DbError::NotFound` if the item does not exist.
    pub async fn update(&self, id: i64, item: &NewItem) -> DbResult<Item> {
        debug!(id, name = %item.name, "Updating item");

        let sql = format!(
            "UPDATE items SET
                name = ?2,
                cost_price_cents = ?3,
                sell_price_cents = ?4,
                inventory_count = ?5
             WHERE id = ?1
             RETURNING {ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&sql)
            .bind(id)
            .bind(&item.name)
            .bind(item.cost_price_cents)
            .bind(item.sell_price_cents)
            .bind(item.inventory_count)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Item", id))
    }

    /// Deletes one item. Sale lines keep their snapshot with the item
    /// reference cleared; requests for the item are removed.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting item");

        let result = sqlx::query("DELETE FROM items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id));
        }

        Ok(())
    }

    /// Deletes every item in `ids`. Unknown ids are skipped.
    ///
    /// ## Returns
    /// The number of items actually deleted.
    pub async fn delete_many(&self, ids: &[i64]) -> DbResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        debug!(count = ids.len(), "Bulk deleting items");

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("DELETE FROM items WHERE id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Escapes LIKE wildcards so user input is matched literally.
fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn new_item(name: &str, cost: i64, sell: i64, stock: i64) -> NewItem {
        NewItem {
            name: name.to_string(),
            cost_price_cents: cost,
            sell_price_cents: sell,
            inventory_count: stock,
        }
    }

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("candle"), "candle");
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = setup().await;
        let stored = db.items().insert(&new_item("Soy candle", 250, 600, 8)).await.unwrap();

        assert!(stored.id > 0);
        assert_eq!(stored.name, "Soy candle");

        let fetched = db.items().get_by_id(stored.id).await.unwrap().unwrap();
        assert_eq!(fetched, stored);
        assert!(db.items().get_by_id(stored.id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_name() {
        let db = setup().await;
        for name in ["wax melt", "Beeswax candle", "Candle holder"] {
            db.items().insert(&new_item(name, 100, 200, 1)).await.unwrap();
        }

        let names: Vec<String> = db.items().list().await.unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["Beeswax candle", "Candle holder", "wax melt"]);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let db = setup().await;
        for name in ["Beeswax candle", "Candle holder", "Tea lights", "100% soy"] {
            db.items().insert(&new_item(name, 100, 200, 1)).await.unwrap();
        }

        let found = db.items().search("CANDLE").await.unwrap();
        assert_eq!(found.len(), 2);

        let found = db.items().search("%").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "100% soy");

        assert_eq!(db.items().search("").await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_update() {
        let db = setup().await;
        let stored = db.items().insert(&new_item("Soy candle", 250, 600, 8)).await.unwrap();

        let updated = db
            .items()
            .update(stored.id, &new_item("Soy candle large", 300, 800, 2))
            .await
            .unwrap();
        assert_eq!(updated.name, "Soy candle large");
        assert_eq!(updated.inventory_count, 2);
        assert_eq!(updated.created_at, stored.created_at);

        let missing = db.items().update(999, &new_item("x", 1, 2, 0)).await;
        assert!(matches!(missing, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_and_delete_many() {
        let db = setup().await;
        let a = db.items().insert(&new_item("A", 1, 2, 1)).await.unwrap();
        let b = db.items().insert(&new_item("B", 1, 2, 1)).await.unwrap();
        let c = db.items().insert(&new_item("C", 1, 2, 1)).await.unwrap();

        db.items().delete(a.id).await.unwrap();
        assert!(matches!(db.items().delete(a.id).await, Err(DbError::NotFound { .. })));

        let deleted = db.items().delete_many(&[b.id, c.id, 12345]).await.unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(db.items().count().await.unwrap(), 0);
        assert_eq!(db.items().delete_many(&[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_negative_inventory_is_rejected_by_storage() {
        let db = setup().await;
        let result = db.items().insert(&new_item("Broken", 1, 2, -1)).await;
        assert!(matches!(result, Err(DbError::CheckViolation { .. })));
    }
}
