//! Audit command: print recent audit events from the configured log.

use farda_audit::{AuditFilter, AuditLogger};
use farda_core::FardaConfig;

pub async fn run(
    config: &FardaConfig,
    limit: usize,
    actor: Option<String>,
    kind: Option<String>,
) -> anyhow::Result<()> {
    if !config.audit.enabled {
        println!("Audit logging is disabled in the configuration.");
        return Ok(());
    }

    let logger = AuditLogger::new(config.audit.clone())?;
    let events = logger
        .query(AuditFilter {
            actor,
            kind,
            limit: Some(limit),
            ..Default::default()
        })
        .await?;

    if events.is_empty() {
        println!("No matching audit events.");
        return Ok(());
    }

    for event in &events {
        println!("{}", event.to_log_line());
    }
    println!("({} event(s))", events.len());
    Ok(())
}
