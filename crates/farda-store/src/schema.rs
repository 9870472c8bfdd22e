//! Idempotent schema creation.
//!
//! `farda init` (and `farda serve`, defensively at startup) runs these
//! statements; everything is CREATE ... IF NOT EXISTS so re-running is safe.

use sqlx::PgPool;

use crate::error::StoreError;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        username TEXT UNIQUE NOT NULL,
        password_hash TEXT NOT NULL,
        display_name TEXT NOT NULL DEFAULT '',
        role TEXT NOT NULL DEFAULT 'vendor',
        active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS schools (
        id BIGSERIAL PRIMARY KEY,
        name TEXT UNIQUE NOT NULL,
        address TEXT,
        phone TEXT,
        active BOOLEAN NOT NULL DEFAULT TRUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS clients (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        phone TEXT,
        email TEXT,
        address TEXT,
        birth_date DATE,
        registered_at DATE NOT NULL DEFAULT CURRENT_DATE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        category TEXT NOT NULL,
        size TEXT NOT NULL,
        color TEXT,
        price DOUBLE PRECISION NOT NULL DEFAULT 0,
        stock BIGINT NOT NULL DEFAULT 0,
        min_stock BIGINT NOT NULL DEFAULT 5,
        description TEXT,
        school_id BIGINT NOT NULL REFERENCES schools(id),
        active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        CONSTRAINT products_stock_non_negative CHECK (stock >= 0)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        id BIGSERIAL PRIMARY KEY,
        client_id BIGINT NOT NULL REFERENCES clients(id),
        school_id BIGINT NOT NULL REFERENCES schools(id),
        status TEXT NOT NULL DEFAULT 'pending',
        placed_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        expected_delivery DATE,
        delivered_at DATE,
        payment_method TEXT NOT NULL DEFAULT 'cash',
        total_quantity BIGINT NOT NULL,
        total_amount DOUBLE PRECISION NOT NULL,
        notes TEXT,
        seller_id BIGINT REFERENCES users(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS order_items (
        id BIGSERIAL PRIMARY KEY,
        order_id BIGINT NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
        product_id BIGINT NOT NULL REFERENCES products(id),
        quantity BIGINT NOT NULL,
        unit_price DOUBLE PRECISION NOT NULL,
        subtotal DOUBLE PRECISION NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS stock_movements (
        id BIGSERIAL PRIMARY KEY,
        product_id BIGINT NOT NULL REFERENCES products(id),
        delta BIGINT NOT NULL,
        reason TEXT NOT NULL,
        recorded_by TEXT,
        recorded_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    // One active product per (name, size, color, school)
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_products_identity
        ON products (name, size, (coalesce(color, '')), school_id)
        WHERE active
    "#,
    "CREATE INDEX IF NOT EXISTS idx_products_school ON products (school_id)",
    "CREATE INDEX IF NOT EXISTS idx_orders_school ON orders (school_id)",
    "CREATE INDEX IF NOT EXISTS idx_orders_status ON orders (status)",
    "CREATE INDEX IF NOT EXISTS idx_orders_placed_at ON orders (placed_at)",
    "CREATE INDEX IF NOT EXISTS idx_stock_movements_product ON stock_movements (product_id)",
];

/// Create all tables and indexes if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::debug!(statements = STATEMENTS.len(), "Schema ensured");
    Ok(())
}
