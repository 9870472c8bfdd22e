//! Manual stock adjustments and the movement ledger.
//!
//! Every change to a product's stock (manual correction, order placement,
//! order cancellation) leaves a row in stock_movements, so the stock screen
//! can explain how a level came to be.

use chrono::{DateTime, Utc};
use farda_core::{Product, StockMovement};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::error::StoreError;
use crate::products::product_from_row;

/// A movement together with its product's name and size.
#[derive(Debug, Clone)]
pub struct MovementDetail {
    pub movement: StockMovement,
    pub product_name: String,
    pub product_size: String,
}

#[derive(Clone)]
pub struct StockStore {
    pool: PgPool,
}

impl StockStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply a signed manual adjustment to a product's stock.
    ///
    /// Runs in a transaction with the product row locked: the resulting
    /// level is checked against zero before the update, and the movement is
    /// recorded atomically with it.
    pub async fn adjust(
        &self,
        product_id: i64,
        delta: i64,
        reason: &str,
        recorded_by: Option<&str>,
    ) -> Result<Product, StoreError> {
        if delta == 0 {
            return Err(StoreError::InvalidInput("adjustment delta cannot be zero".to_string()));
        }
        if reason.trim().is_empty() {
            return Err(StoreError::InvalidInput("adjustment reason is required".to_string()));
        }

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            SELECT id, name, category, size, color, price, stock, min_stock,
                   description, school_id, active, created_at
            FROM products
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StoreError::NotFound("product"))?;
        let product = product_from_row(&row)?;

        let new_stock = product.stock + delta;
        if new_stock < 0 {
            return Err(StoreError::StockWouldGoNegative {
                product: product.name,
                stock: product.stock,
                delta,
            });
        }

        let updated = sqlx::query(
            r#"
            UPDATE products SET stock = $1 WHERE id = $2
            RETURNING id, name, category, size, color, price, stock, min_stock,
                      description, school_id, active, created_at
            "#,
        )
        .bind(new_stock)
        .bind(product_id)
        .fetch_one(&mut *tx)
        .await?;

        record_movement(&mut tx, product_id, delta, reason, recorded_by).await?;
        tx.commit().await?;

        product_from_row(&updated)
    }

    /// Movements for one product, newest first.
    pub async fn movements_for_product(
        &self,
        product_id: i64,
        limit: i64,
    ) -> Result<Vec<StockMovement>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, product_id, delta, reason, recorded_by, recorded_at
            FROM stock_movements
            WHERE product_id = $1
            ORDER BY recorded_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(product_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(movement_from_row).collect()
    }

    /// Most recent movements across all products.
    pub async fn recent_movements(&self, limit: i64) -> Result<Vec<MovementDetail>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT m.id, m.product_id, m.delta, m.reason, m.recorded_by, m.recorded_at,
                   p.name AS product_name, p.size AS product_size
            FROM stock_movements m
            JOIN products p ON m.product_id = p.id
            ORDER BY m.recorded_at DESC, m.id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(MovementDetail {
                    movement: movement_from_row(row)?,
                    product_name: row.try_get("product_name")?,
                    product_size: row.try_get("product_size")?,
                })
            })
            .collect()
    }
}

/// Insert a movement row inside an open transaction. Shared with the order
/// store, which records order-driven stock changes through the same ledger.
pub(crate) async fn record_movement(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    product_id: i64,
    delta: i64,
    reason: &str,
    recorded_by: Option<&str>,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO stock_movements (product_id, delta, reason, recorded_by)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(product_id)
    .bind(delta)
    .bind(reason)
    .bind(recorded_by)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

fn movement_from_row(row: &PgRow) -> Result<StockMovement, StoreError> {
    let recorded_at: DateTime<Utc> = row.try_get("recorded_at")?;
    Ok(StockMovement {
        id: row.try_get("id")?,
        product_id: row.try_get("product_id")?,
        delta: row.try_get("delta")?,
        reason: row.try_get("reason")?,
        recorded_by: row.try_get("recorded_by")?,
        recorded_at,
    })
}
