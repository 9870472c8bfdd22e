//! Dashboard error type and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use farda_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("failed to start dashboard: {0}")]
    StartupFailed(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("not authorized")]
    NotAuthorized,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl DashboardError {
    fn status(&self) -> StatusCode {
        match self {
            Self::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            Self::NotAuthorized => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Store(err) => store_status(err),
            Self::StartupFailed(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Store errors the operator caused map to 4xx with the store's own message
/// (insufficient stock, duplicates, validation); everything else is a 500.
fn store_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        StoreError::Duplicate(_)
        | StoreError::InsufficientStock { .. }
        | StoreError::StockWouldGoNegative { .. }
        | StoreError::ClientHasOrders
        | StoreError::EmptyOrder
        | StoreError::OrderCancelled
        | StoreError::WeakPassword(_)
        | StoreError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        StoreError::InvalidStoredValue { .. }
        | StoreError::PasswordHash(_)
        | StoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Dashboard request failed");
        }
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_mistakes_are_client_errors() {
        let err = DashboardError::Store(StoreError::InsufficientStock {
            product: "Polo".to_string(),
            available: 1,
            requested: 3,
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = DashboardError::Store(StoreError::ClientHasOrders);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_infrastructure_failures_are_server_errors() {
        let err = DashboardError::Store(StoreError::PasswordHash("bad phc".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
