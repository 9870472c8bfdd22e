//! Error types for the data layer.

use thiserror::Error;

/// Errors produced by the stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity lookup failed.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Unique constraint would be violated.
    #[error("{0} already exists")]
    Duplicate(String),

    /// An order line asks for more units than are on hand.
    #[error("insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// A stock adjustment would take the level below zero.
    #[error("adjustment of {delta} would take {product} below zero (current stock {stock})")]
    StockWouldGoNegative {
        product: String,
        stock: i64,
        delta: i64,
    },

    /// A client with orders cannot be deleted.
    #[error("client has orders and cannot be deleted")]
    ClientHasOrders,

    /// An order needs at least one line.
    #[error("order has no items")]
    EmptyOrder,

    /// A cancelled order cannot change status again.
    #[error("order is cancelled and cannot change status")]
    OrderCancelled,

    /// Login failed: unknown user, inactive account, or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password rejected by the strength rules.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// Caller-supplied value rejected before reaching the database.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A stored value could not be interpreted (e.g. unknown status string).
    #[error("invalid value in column {column}: {value}")]
    InvalidStoredValue { column: &'static str, value: String },

    /// Password hashing/verification machinery failed.
    #[error("password hash error: {0}")]
    PasswordHash(String),

    /// Underlying database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// True when the error is a Postgres unique-constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
