//! Serve command: start the web dashboard.

use std::sync::Arc;

use farda_audit::AuditLogger;
use farda_core::FardaConfig;
use farda_dashboard::{AppState, DashboardServer};
use farda_store::{connect, ensure_schema};

pub async fn run(config: FardaConfig) -> anyhow::Result<()> {
    if !config.dashboard.enabled {
        anyhow::bail!("dashboard is disabled in the configuration");
    }

    let pool = connect(&config.database).await?;
    ensure_schema(&pool).await?;

    let audit = Arc::new(AuditLogger::new(config.audit.clone())?);

    tracing::info!(
        project = %config.project_name(),
        bind = %config.dashboard.bind_addr(),
        audit_enabled = audit.is_enabled(),
        "Starting Farda"
    );

    let state = AppState::new(config, pool, audit);
    let server = DashboardServer::new(state);
    server.run().await?;

    Ok(())
}
