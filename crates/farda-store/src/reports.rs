//! Aggregate queries behind the dashboard metrics and the reports screen.

use farda_core::OrderStatus;
use sqlx::{PgPool, Row};

use crate::error::StoreError;

/// Headline numbers for the dashboard home page.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct OverviewMetrics {
    pub total_orders: i64,
    pub pending_orders: i64,
    pub total_clients: i64,
    pub low_stock_products: i64,
    /// Summed totals of delivered orders.
    pub delivered_sales: f64,
}

/// Per-school roll-up.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SchoolMetrics {
    pub school_id: i64,
    pub school_name: String,
    pub orders: i64,
    pub pending_orders: i64,
    pub products: i64,
    pub low_stock_products: i64,
}

/// Delivered revenue per school.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SchoolSales {
    pub school_name: String,
    pub delivered_orders: i64,
    pub delivered_sales: f64,
}

#[derive(Clone)]
pub struct ReportStore {
    pool: PgPool,
}

impl ReportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn overview(&self) -> Result<OverviewMetrics, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(1) FROM orders) AS total_orders,
                (SELECT COUNT(1) FROM orders WHERE status = 'pending') AS pending_orders,
                (SELECT COUNT(1) FROM clients) AS total_clients,
                (SELECT COUNT(1) FROM products WHERE active AND stock <= min_stock)
                    AS low_stock_products,
                (SELECT COALESCE(SUM(total_amount), 0)
                    FROM orders WHERE status = 'delivered') AS delivered_sales
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(OverviewMetrics {
            total_orders: row.try_get("total_orders")?,
            pending_orders: row.try_get("pending_orders")?,
            total_clients: row.try_get("total_clients")?,
            low_stock_products: row.try_get("low_stock_products")?,
            delivered_sales: row.try_get("delivered_sales")?,
        })
    }

    /// Count of orders in each status, in lifecycle order. Statuses with no
    /// orders appear with a zero count.
    pub async fn orders_by_status(&self) -> Result<Vec<(OrderStatus, i64)>, StoreError> {
        let rows = sqlx::query("SELECT status, COUNT(1) AS total FROM orders GROUP BY status")
            .fetch_all(&self.pool)
            .await?;

        let mut counts: Vec<(OrderStatus, i64)> =
            OrderStatus::ALL.iter().map(|s| (*s, 0)).collect();
        for row in rows {
            let status_str: String = row.try_get("status")?;
            let total: i64 = row.try_get("total")?;
            let status =
                OrderStatus::parse(&status_str).ok_or(StoreError::InvalidStoredValue {
                    column: "orders.status",
                    value: status_str,
                })?;
            if let Some(entry) = counts.iter_mut().find(|(s, _)| *s == status) {
                entry.1 = total;
            }
        }
        Ok(counts)
    }

    /// Order and catalog roll-up per active school.
    pub async fn per_school(&self) -> Result<Vec<SchoolMetrics>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT s.id AS school_id,
                   s.name AS school_name,
                   (SELECT COUNT(1) FROM orders o WHERE o.school_id = s.id) AS orders,
                   (SELECT COUNT(1) FROM orders o
                        WHERE o.school_id = s.id AND o.status = 'pending') AS pending_orders,
                   (SELECT COUNT(1) FROM products p
                        WHERE p.school_id = s.id AND p.active) AS products,
                   (SELECT COUNT(1) FROM products p
                        WHERE p.school_id = s.id AND p.active AND p.stock <= p.min_stock)
                       AS low_stock_products
            FROM schools s
            WHERE s.active
            ORDER BY s.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(SchoolMetrics {
                    school_id: row.try_get("school_id")?,
                    school_name: row.try_get("school_name")?,
                    orders: row.try_get("orders")?,
                    pending_orders: row.try_get("pending_orders")?,
                    products: row.try_get("products")?,
                    low_stock_products: row.try_get("low_stock_products")?,
                })
            })
            .collect()
    }

    /// Delivered revenue per school, highest first.
    pub async fn sales_by_school(&self) -> Result<Vec<SchoolSales>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT s.name AS school_name,
                   COUNT(o.id) AS delivered_orders,
                   COALESCE(SUM(o.total_amount), 0) AS delivered_sales
            FROM schools s
            LEFT JOIN orders o ON o.school_id = s.id AND o.status = 'delivered'
            WHERE s.active
            GROUP BY s.name
            ORDER BY delivered_sales DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(SchoolSales {
                    school_name: row.try_get("school_name")?,
                    delivered_orders: row.try_get("delivered_orders")?,
                    delivered_sales: row.try_get("delivered_sales")?,
                })
            })
            .collect()
    }
}
