//! Connection pool setup.

use farda_core::DatabaseConfig;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::error::StoreError;

/// Connect to Postgres using the configured credentials.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, StoreError> {
    let url = config.connection_string();
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&url)
        .await?;

    tracing::info!(
        host = %config.host,
        database = %config.database,
        max_connections = config.max_connections,
        "Connected to Postgres"
    );

    Ok(pool)
}
