//! # Sale Repository
//!
//! Sale commit, history and the finance query.
//!
//! ## Commit
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │   1. INSERT sales (total, amount_paid)           → sale id             │
//! │   2. INSERT sale_items per line (qty, price snapshot)                  │
//! │   3. UPDATE items SET inventory_count = inventory_count - qty          │
//! │      WHERE id = ? AND inventory_count >= qty                           │
//! │        └── 0 rows → InsufficientStock, whole transaction rolled back   │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock is decremented relative to the stored value, never overwritten
//! from a client-side snapshot, so two tills selling the same item cannot
//! lose each other's updates.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use kassa_core::{FinanceLine, NewSale, Sale, SaleLine, SaleWithLines};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

const SALE_COLUMNS: &str = "id, total_amount_cents, amount_paid_cents, created_at";

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Commits a sale now. See [`SaleRepository::commit_at`].
    pub async fn commit(&self, sale: &NewSale) -> DbResult<Sale> {
        self.commit_at(sale, Utc::now()).await
    }

    /// Persists a sale, its lines and the stock decrements in one
    /// transaction.
    ///
    /// ## Errors
    /// - `DbError::EmptySale` when there are no lines
    /// - `DbError::InsufficientStock` when a line asks for more than is left
    /// - `DbError::ForeignKeyViolation` when a line references a missing item
    ///
    /// Nothing is written when any of these occur.
    pub async fn commit_at(&self, sale: &NewSale, created_at: DateTime<Utc>) -> DbResult<Sale> {
        if sale.lines.is_empty() {
            return Err(DbError::EmptySale);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let sql = format!(
            "INSERT INTO sales (total_amount_cents, amount_paid_cents, created_at)
             VALUES (?1, ?2, ?3)
             RETURNING {SALE_COLUMNS}"
        );
        let stored = sqlx::query_as::<_, Sale>(&sql)
            .bind(sale.total_amount_cents)
            .bind(sale.amount_paid_cents)
            .bind(created_at)
            .fetch_one(&mut *tx)
            .await?;

        debug!(sale_id = stored.id, lines = sale.lines.len(), "Sale row inserted");

        for line in &sale.lines {
            sqlx::query(
                "INSERT INTO sale_items (sale_id, item_id, quantity, price_per_item_cents)
                 VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(stored.id)
            .bind(line.item_id)
            .bind(line.quantity)
            .bind(line.price_per_item_cents)
            .execute(&mut *tx)
            .await?;
        }

        for line in &sale.lines {
            let result = sqlx::query(
                "UPDATE items SET inventory_count = inventory_count - ?2
                 WHERE id = ?1 AND inventory_count >= ?2",
            )
            .bind(line.item_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                // Dropping `tx` rolls everything back.
                return Err(DbError::InsufficientStock {
                    item_id: line.item_id,
                    requested: line.quantity,
                });
            }
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            sale_id = stored.id,
            total_cents = stored.total_amount_cents,
            paid_cents = stored.amount_paid_cents,
            "Sale committed"
        );

        Ok(stored)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<SaleWithLines>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1");
        let Some(sale) = sqlx::query_as::<_, Sale>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let lines = self.lines_for(&[sale.id]).await?;
        Ok(Some(SaleWithLines { sale, lines }))
    }

    /// The most recent `limit` sales with their lines, newest first.
    pub async fn recent(&self, limit: i64) -> DbResult<Vec<SaleWithLines>> {
        let sql = format!(
            "SELECT {SALE_COLUMNS} FROM sales
             ORDER BY created_at DESC, id DESC
             LIMIT ?1"
        );
        let sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        let ids: Vec<i64> = sales.iter().map(|sale| sale.id).collect();
        let mut lines_by_sale: HashMap<i64, Vec<SaleLine>> = HashMap::new();
        for line in self.lines_for(&ids).await? {
            lines_by_sale.entry(line.sale_id).or_default().push(line);
        }

        Ok(sales
            .into_iter()
            .map(|sale| {
                let lines = lines_by_sale.remove(&sale.id).unwrap_or_default();
                SaleWithLines { sale, lines }
            })
            .collect())
    }

    /// Sales created at or after `start` (oldest first) and their lines
    /// joined with each item's current name and cost price.
    pub async fn since(&self, start: DateTime<Utc>) -> DbResult<(Vec<Sale>, Vec<FinanceLine>)> {
        let sql = format!(
            "SELECT {SALE_COLUMNS} FROM sales
             WHERE created_at >= ?1
             ORDER BY created_at ASC, id ASC"
        );
        let sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(start)
            .fetch_all(&self.pool)
            .await?;

        let lines = sqlx::query_as::<_, FinanceLine>(
            "SELECT si.sale_id,
                    si.quantity,
                    si.price_per_item_cents,
                    i.name AS item_name,
                    i.cost_price_cents AS cost_price_cents
             FROM sale_items si
             JOIN sales s ON s.id = si.sale_id
             LEFT JOIN items i ON i.id = si.item_id
             WHERE s.created_at >= ?1
             ORDER BY si.id",
        )
        .bind(start)
        .fetch_all(&self.pool)
        .await?;

        debug!(sales = sales.len(), lines = lines.len(), "Loaded finance data");
        Ok((sales, lines))
    }

    async fn lines_for(&self, sale_ids: &[i64]) -> DbResult<Vec<SaleLine>> {
        if sale_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT si.id, si.sale_id, si.item_id, i.name AS item_name,
                    si.quantity, si.price_per_item_cents
             FROM sale_items si
             LEFT JOIN items i ON i.id = si.item_id
             WHERE si.sale_id IN (",
        );
        let mut separated = builder.separated(", ");
        for id in sale_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY si.id");

        let lines = builder
            .build_query_as::<SaleLine>()
            .fetch_all(&self.pool)
            .await?;

        Ok(lines)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
