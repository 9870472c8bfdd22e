//! Schools the shop produces uniforms for.

use farda_core::{School, SeedSchool};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::error::{StoreError, is_unique_violation};

#[derive(Clone)]
pub struct SchoolStore {
    pool: PgPool,
}

impl SchoolStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a school. Names are unique.
    pub async fn create(
        &self,
        name: &str,
        address: Option<&str>,
        phone: Option<&str>,
    ) -> Result<School, StoreError> {
        if name.trim().is_empty() {
            return Err(StoreError::InvalidInput("school name is required".to_string()));
        }

        let row = sqlx::query(
            r#"
            INSERT INTO schools (name, address, phone)
            VALUES ($1, $2, $3)
            RETURNING id, name, address, phone, active
            "#,
        )
        .bind(name)
        .bind(address)
        .bind(phone)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Duplicate(format!("school '{name}'"))
            } else {
                StoreError::Database(e)
            }
        })?;

        school_from_row(&row)
    }

    /// List schools, ordered by name.
    pub async fn list(&self, only_active: bool) -> Result<Vec<School>, StoreError> {
        let sql = if only_active {
            "SELECT id, name, address, phone, active FROM schools WHERE active ORDER BY name"
        } else {
            "SELECT id, name, address, phone, active FROM schools ORDER BY name"
        };
        let rows = sqlx::query(sql).fetch_all(&self.pool).await?;
        rows.iter().map(school_from_row).collect()
    }

    pub async fn get(&self, id: i64) -> Result<School, StoreError> {
        let row = sqlx::query("SELECT id, name, address, phone, active FROM schools WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("school"))?;
        school_from_row(&row)
    }

    /// Insert the configured schools when the table is empty.
    pub async fn seed_defaults(&self, seeds: &[SeedSchool]) -> Result<usize, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM schools")
            .fetch_one(&self.pool)
            .await?;
        if count > 0 || seeds.is_empty() {
            return Ok(0);
        }

        for seed in seeds {
            self.create(&seed.name, seed.address.as_deref(), seed.phone.as_deref())
                .await?;
        }
        tracing::info!(count = seeds.len(), "Seeded schools");
        Ok(seeds.len())
    }
}

fn school_from_row(row: &PgRow) -> Result<School, StoreError> {
    Ok(School {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        address: row.try_get("address")?,
        phone: row.try_get("phone")?,
        active: row.try_get("active")?,
    })
}
