//! Customer registry.

use chrono::NaiveDate;
use farda_core::Client;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::error::StoreError;

/// Input for registering a client.
#[derive(Debug, Clone, Default)]
pub struct NewClient {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct ClientStore {
    pool: PgPool,
}

impl ClientStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: NewClient) -> Result<Client, StoreError> {
        if new.name.trim().is_empty() {
            return Err(StoreError::InvalidInput("client name is required".to_string()));
        }

        let row = sqlx::query(
            r#"
            INSERT INTO clients (name, phone, email, address, birth_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, phone, email, address, birth_date, registered_at
            "#,
        )
        .bind(&new.name)
        .bind(&new.phone)
        .bind(&new.email)
        .bind(&new.address)
        .bind(new.birth_date)
        .fetch_one(&self.pool)
        .await?;

        client_from_row(&row)
    }

    /// List all clients, ordered by name.
    pub async fn list(&self) -> Result<Vec<Client>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, phone, email, address, birth_date, registered_at
            FROM clients
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(client_from_row).collect()
    }

    pub async fn get(&self, id: i64) -> Result<Client, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, phone, email, address, birth_date, registered_at
            FROM clients
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("client"))?;
        client_from_row(&row)
    }

    /// Delete a client. Refused while any order references them.
    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let orders: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM orders WHERE client_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        if orders > 0 {
            return Err(StoreError::ClientHasOrders);
        }

        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("client"));
        }
        Ok(())
    }
}

fn client_from_row(row: &PgRow) -> Result<Client, StoreError> {
    Ok(Client {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        phone: row.try_get("phone")?,
        email: row.try_get("email")?,
        address: row.try_get("address")?,
        birth_date: row.try_get("birth_date")?,
        registered_at: row.try_get("registered_at")?,
    })
}
