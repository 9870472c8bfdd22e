//! Product catalog, one entry per (name, size, color) within a school.

use farda_core::{Product, ProductCategory};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::error::{StoreError, is_unique_violation};

/// Input for registering a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub category: ProductCategory,
    pub size: String,
    pub color: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub min_stock: i64,
    pub description: Option<String>,
    pub school_id: i64,
}

/// A product together with its school's name, for listings.
#[derive(Debug, Clone)]
pub struct ProductWithSchool {
    pub product: Product,
    pub school_name: String,
}

#[derive(Clone)]
pub struct ProductStore {
    pool: PgPool,
}

impl ProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: NewProduct) -> Result<Product, StoreError> {
        if new.name.trim().is_empty() {
            return Err(StoreError::InvalidInput("product name is required".to_string()));
        }
        if new.price < 0.0 {
            return Err(StoreError::InvalidInput("price cannot be negative".to_string()));
        }
        if new.stock < 0 {
            return Err(StoreError::InvalidInput("stock cannot be negative".to_string()));
        }

        let row = sqlx::query(
            r#"
            INSERT INTO products
                (name, category, size, color, price, stock, min_stock, description, school_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, name, category, size, color, price, stock, min_stock,
                      description, school_id, active, created_at
            "#,
        )
        .bind(&new.name)
        .bind(new.category.as_str())
        .bind(&new.size)
        .bind(&new.color)
        .bind(new.price)
        .bind(new.stock)
        .bind(new.min_stock)
        .bind(&new.description)
        .bind(new.school_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Duplicate(format!(
                    "product '{}' size {} for this school",
                    new.name, new.size
                ))
            } else {
                StoreError::Database(e)
            }
        })?;

        product_from_row(&row)
    }

    /// List products with their school name, optionally filtered by school.
    /// Ordered by school, category, then name.
    pub async fn list(
        &self,
        school_id: Option<i64>,
        only_active: bool,
    ) -> Result<Vec<ProductWithSchool>, StoreError> {
        let mut sql = String::from(
            r#"
            SELECT p.id, p.name, p.category, p.size, p.color, p.price, p.stock,
                   p.min_stock, p.description, p.school_id, p.active, p.created_at,
                   s.name AS school_name
            FROM products p
            JOIN schools s ON p.school_id = s.id
            WHERE TRUE
            "#,
        );
        if school_id.is_some() {
            sql.push_str(" AND p.school_id = $1");
        }
        if only_active {
            sql.push_str(" AND p.active");
        }
        sql.push_str(" ORDER BY s.name, p.category, p.name, p.size");

        let mut query = sqlx::query(&sql);
        if let Some(id) = school_id {
            query = query.bind(id);
        }
        let rows = query.fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| {
                Ok(ProductWithSchool {
                    product: product_from_row(row)?,
                    school_name: row.try_get("school_name")?,
                })
            })
            .collect()
    }

    pub async fn get(&self, id: i64) -> Result<Product, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, category, size, color, price, stock, min_stock,
                   description, school_id, active, created_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("product"))?;
        product_from_row(&row)
    }

    /// Active products at or below their restock threshold.
    pub async fn low_stock(&self) -> Result<Vec<ProductWithSchool>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT p.id, p.name, p.category, p.size, p.color, p.price, p.stock,
                   p.min_stock, p.description, p.school_id, p.active, p.created_at,
                   s.name AS school_name
            FROM products p
            JOIN schools s ON p.school_id = s.id
            WHERE p.active AND p.stock <= p.min_stock
            ORDER BY p.stock ASC, p.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(ProductWithSchool {
                    product: product_from_row(row)?,
                    school_name: row.try_get("school_name")?,
                })
            })
            .collect()
    }

    /// Retire a product from the catalog. Past orders keep referencing it.
    pub async fn deactivate(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE products SET active = FALSE WHERE id = $1 AND active")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("product"));
        }
        Ok(())
    }
}

pub(crate) fn product_from_row(row: &PgRow) -> Result<Product, StoreError> {
    let category_str: String = row.try_get("category")?;
    let category =
        ProductCategory::parse(&category_str).ok_or(StoreError::InvalidStoredValue {
            column: "products.category",
            value: category_str,
        })?;

    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        category,
        size: row.try_get("size")?,
        color: row.try_get("color")?,
        price: row.try_get("price")?,
        stock: row.try_get("stock")?,
        min_stock: row.try_get("min_stock")?,
        description: row.try_get("description")?,
        school_id: row.try_get("school_id")?,
        active: row.try_get("active")?,
        created_at: row.try_get("created_at")?,
    })
}
