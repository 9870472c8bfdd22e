//! Orders and the automatic stock control that goes with them.
//!
//! Placing an order checks and decrements stock for every line inside one
//! transaction with the product rows locked, so two concurrent orders cannot
//! both take the last units. Cancelling or deleting an order puts the units
//! back, exactly once.

use chrono::NaiveDate;
use farda_core::{Order, OrderItem, OrderStatus, PaymentMethod};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::error::StoreError;
use crate::stock::record_movement;

/// One requested line of a new order.
#[derive(Debug, Clone)]
pub struct NewOrderLine {
    pub product_id: i64,
    pub quantity: i64,
}

/// Input for placing an order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub client_id: i64,
    pub school_id: i64,
    pub expected_delivery: Option<NaiveDate>,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub seller_id: Option<i64>,
    pub lines: Vec<NewOrderLine>,
}

/// An order with the names a listing needs.
#[derive(Debug, Clone)]
pub struct OrderSummary {
    pub order: Order,
    pub client_name: String,
    pub school_name: String,
}

/// An order line with its product's name and size, for the detail page.
#[derive(Debug, Clone)]
pub struct OrderLineDetail {
    pub item: OrderItem,
    pub product_name: String,
    pub product_size: String,
}

#[derive(Clone)]
pub struct OrderStore {
    pool: PgPool,
}

impl OrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Place an order: verify stock, write the order and its items, and
    /// deduct stock, all in one transaction.
    ///
    /// Unit prices are captured from the catalog at this moment; later price
    /// changes do not affect placed orders.
    pub async fn create(
        &self,
        new: NewOrder,
        recorded_by: Option<&str>,
    ) -> Result<Order, StoreError> {
        if new.lines.is_empty() {
            return Err(StoreError::EmptyOrder);
        }
        for line in &new.lines {
            if line.quantity <= 0 {
                return Err(StoreError::InvalidInput(
                    "line quantity must be positive".to_string(),
                ));
            }
        }

        let mut tx = self.pool.begin().await?;

        // Lock and check every product before writing anything.
        let mut priced_lines: Vec<(NewOrderLine, String, f64)> = Vec::new();
        for line in &new.lines {
            let row = sqlx::query(
                "SELECT name, price, stock FROM products WHERE id = $1 AND active FOR UPDATE",
            )
            .bind(line.product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound("product"))?;

            let name: String = row.try_get("name")?;
            let price: f64 = row.try_get("price")?;
            let stock: i64 = row.try_get("stock")?;

            if stock < line.quantity {
                return Err(StoreError::InsufficientStock {
                    product: name,
                    available: stock,
                    requested: line.quantity,
                });
            }
            priced_lines.push((line.clone(), name, price));
        }

        let total_quantity: i64 = priced_lines.iter().map(|(l, _, _)| l.quantity).sum();
        let total_amount: f64 = priced_lines
            .iter()
            .map(|(l, _, price)| l.quantity as f64 * price)
            .sum();

        let order_row = sqlx::query(
            r#"
            INSERT INTO orders
                (client_id, school_id, expected_delivery, payment_method,
                 total_quantity, total_amount, notes, seller_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, client_id, school_id, status, placed_at, expected_delivery,
                      delivered_at, payment_method, total_quantity, total_amount,
                      notes, seller_id
            "#,
        )
        .bind(new.client_id)
        .bind(new.school_id)
        .bind(new.expected_delivery)
        .bind(new.payment_method.as_str())
        .bind(total_quantity)
        .bind(total_amount)
        .bind(&new.notes)
        .bind(new.seller_id)
        .fetch_one(&mut *tx)
        .await?;
        let order = order_from_row(&order_row)?;

        for (line, _, price) in &priced_lines {
            let subtotal = line.quantity as f64 * price;
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, product_id, quantity, unit_price, subtotal)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(order.id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(price)
            .bind(subtotal)
            .execute(&mut *tx)
            .await?;

            sqlx::query("UPDATE products SET stock = stock - $1 WHERE id = $2")
                .bind(line.quantity)
                .bind(line.product_id)
                .execute(&mut *tx)
                .await?;

            record_movement(
                &mut tx,
                line.product_id,
                -line.quantity,
                &format!("order #{}", order.id),
                recorded_by,
            )
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            order_id = order.id,
            client_id = order.client_id,
            total_quantity,
            "Order placed"
        );
        Ok(order)
    }

    /// List orders newest first, optionally filtered by school.
    pub async fn list(&self, school_id: Option<i64>) -> Result<Vec<OrderSummary>, StoreError> {
        let mut sql = String::from(
            r#"
            SELECT o.id, o.client_id, o.school_id, o.status, o.placed_at,
                   o.expected_delivery, o.delivered_at, o.payment_method,
                   o.total_quantity, o.total_amount, o.notes, o.seller_id,
                   c.name AS client_name, s.name AS school_name
            FROM orders o
            JOIN clients c ON o.client_id = c.id
            JOIN schools s ON o.school_id = s.id
            "#,
        );
        if school_id.is_some() {
            sql.push_str(" WHERE o.school_id = $1");
        }
        sql.push_str(" ORDER BY o.placed_at DESC, o.id DESC");

        let mut query = sqlx::query(&sql);
        if let Some(id) = school_id {
            query = query.bind(id);
        }
        let rows = query.fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| {
                Ok(OrderSummary {
                    order: order_from_row(row)?,
                    client_name: row.try_get("client_name")?,
                    school_name: row.try_get("school_name")?,
                })
            })
            .collect()
    }

    pub async fn get(&self, id: i64) -> Result<OrderSummary, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT o.id, o.client_id, o.school_id, o.status, o.placed_at,
                   o.expected_delivery, o.delivered_at, o.payment_method,
                   o.total_quantity, o.total_amount, o.notes, o.seller_id,
                   c.name AS client_name, s.name AS school_name
            FROM orders o
            JOIN clients c ON o.client_id = c.id
            JOIN schools s ON o.school_id = s.id
            WHERE o.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("order"))?;

        Ok(OrderSummary {
            order: order_from_row(&row)?,
            client_name: row.try_get("client_name")?,
            school_name: row.try_get("school_name")?,
        })
    }

    /// Lines of an order with product names, in insertion order.
    pub async fn lines(&self, order_id: i64) -> Result<Vec<OrderLineDetail>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT i.id, i.order_id, i.product_id, i.quantity, i.unit_price, i.subtotal,
                   p.name AS product_name, p.size AS product_size
            FROM order_items i
            JOIN products p ON i.product_id = p.id
            WHERE i.order_id = $1
            ORDER BY i.id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(OrderLineDetail {
                    item: OrderItem {
                        id: row.try_get("id")?,
                        order_id: row.try_get("order_id")?,
                        product_id: row.try_get("product_id")?,
                        quantity: row.try_get("quantity")?,
                        unit_price: row.try_get("unit_price")?,
                        subtotal: row.try_get("subtotal")?,
                    },
                    product_name: row.try_get("product_name")?,
                    product_size: row.try_get("product_size")?,
                })
            })
            .collect()
    }

    /// Change an order's status.
    ///
    /// Delivered stamps the delivery date. Cancelling restores the deducted
    /// stock. A cancelled order cannot change status again (its stock was
    /// already returned).
    pub async fn set_status(
        &self,
        id: i64,
        new_status: OrderStatus,
        recorded_by: Option<&str>,
    ) -> Result<Order, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT status FROM orders WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound("order"))?;
        let current_str: String = row.try_get("status")?;
        let current = OrderStatus::parse(&current_str).ok_or(StoreError::InvalidStoredValue {
            column: "orders.status",
            value: current_str,
        })?;

        if current == OrderStatus::Cancelled && new_status != OrderStatus::Cancelled {
            return Err(StoreError::OrderCancelled);
        }

        if new_status == OrderStatus::Cancelled && current != OrderStatus::Cancelled {
            restore_stock(&mut tx, id, "cancelled", recorded_by).await?;
        }

        let updated = if new_status == OrderStatus::Delivered {
            sqlx::query(
                r#"
                UPDATE orders SET status = $1, delivered_at = CURRENT_DATE WHERE id = $2
                RETURNING id, client_id, school_id, status, placed_at, expected_delivery,
                          delivered_at, payment_method, total_quantity, total_amount,
                          notes, seller_id
                "#,
            )
            .bind(new_status.as_str())
            .bind(id)
            .fetch_one(&mut *tx)
            .await?
        } else {
            sqlx::query(
                r#"
                UPDATE orders SET status = $1 WHERE id = $2
                RETURNING id, client_id, school_id, status, placed_at, expected_delivery,
                          delivered_at, payment_method, total_quantity, total_amount,
                          notes, seller_id
                "#,
            )
            .bind(new_status.as_str())
            .bind(id)
            .fetch_one(&mut *tx)
            .await?
        };

        tx.commit().await?;
        order_from_row(&updated)
    }

    /// Delete an order, restoring stock unless it was already cancelled.
    pub async fn delete(&self, id: i64, recorded_by: Option<&str>) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT status FROM orders WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound("order"))?;
        let status_str: String = row.try_get("status")?;
        let status = OrderStatus::parse(&status_str).ok_or(StoreError::InvalidStoredValue {
            column: "orders.status",
            value: status_str,
        })?;

        if status != OrderStatus::Cancelled {
            restore_stock(&mut tx, id, "deleted", recorded_by).await?;
        }

        // Items cascade.
        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(order_id = id, "Order deleted");
        Ok(())
    }
}

/// Put every line's units back on the shelf, recording movements.
async fn restore_stock(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    order_id: i64,
    why: &str,
    recorded_by: Option<&str>,
) -> Result<(), StoreError> {
    let rows = sqlx::query("SELECT product_id, quantity FROM order_items WHERE order_id = $1")
        .bind(order_id)
        .fetch_all(&mut **tx)
        .await?;

    for row in rows {
        let product_id: i64 = row.try_get("product_id")?;
        let quantity: i64 = row.try_get("quantity")?;

        sqlx::query("UPDATE products SET stock = stock + $1 WHERE id = $2")
            .bind(quantity)
            .bind(product_id)
            .execute(&mut **tx)
            .await?;

        record_movement(
            tx,
            product_id,
            quantity,
            &format!("order #{order_id} {why}"),
            recorded_by,
        )
        .await?;
    }
    Ok(())
}

fn order_from_row(row: &PgRow) -> Result<Order, StoreError> {
    let status_str: String = row.try_get("status")?;
    let status = OrderStatus::parse(&status_str).ok_or(StoreError::InvalidStoredValue {
        column: "orders.status",
        value: status_str,
    })?;

    let payment_str: String = row.try_get("payment_method")?;
    let payment_method =
        PaymentMethod::parse(&payment_str).ok_or(StoreError::InvalidStoredValue {
            column: "orders.payment_method",
            value: payment_str,
        })?;

    Ok(Order {
        id: row.try_get("id")?,
        client_id: row.try_get("client_id")?,
        school_id: row.try_get("school_id")?,
        status,
        placed_at: row.try_get("placed_at")?,
        expected_delivery: row.try_get("expected_delivery")?,
        delivered_at: row.try_get("delivered_at")?,
        payment_method,
        total_quantity: row.try_get("total_quantity")?,
        total_amount: row.try_get("total_amount")?,
        notes: row.try_get("notes")?,
        seller_id: row.try_get("seller_id")?,
    })
}
