//! Dashboard server implementation.

use tokio::net::TcpListener;

use crate::error::DashboardError;
use crate::routes;
use crate::state::AppState;

/// The dashboard server.
pub struct DashboardServer {
    state: AppState,
}

impl DashboardServer {
    /// Create a new dashboard server over prepared state.
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Start the dashboard server.
    pub async fn run(&self) -> Result<(), DashboardError> {
        let addr = self.state.config().dashboard.bind_addr();
        tracing::info!(address = %addr, "Starting Farda dashboard");

        let app = routes::create_router(self.state.clone());

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| DashboardError::StartupFailed(e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| DashboardError::StartupFailed(e.to_string()))?;

        Ok(())
    }
}
