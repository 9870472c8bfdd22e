//! The audit logger the dashboard and CLI talk to.
//!
//! Construction is config-driven: disabled means a null backend, otherwise a
//! file backend under the configured directory, optionally echoing to stdout.
//! The typed helpers keep call sites honest about which fields each action
//! carries.

use farda_core::AuditConfig;
use std::sync::Arc;

use crate::error::AuditError;
use crate::event::{AuditAction, AuditEvent};
use crate::storage::{AuditStorage, ConsoleStorage, FileStorage, NullStorage};

pub struct AuditLogger {
    enabled: bool,
    storage: Arc<dyn AuditStorage>,
}

impl AuditLogger {
    /// Build a logger from configuration.
    pub fn new(config: AuditConfig) -> Result<Self, AuditError> {
        if !config.enabled {
            return Ok(Self::disabled());
        }

        let log_path = std::path::Path::new(&config.directory).join("audit.log");
        let file = FileStorage::open(&log_path)?;
        let storage: Arc<dyn AuditStorage> = if config.stdout {
            Arc::new(file.with_echo())
        } else {
            Arc::new(file)
        };

        Ok(Self {
            enabled: true,
            storage,
        })
    }

    /// A logger over a caller-supplied backend.
    pub fn with_storage(storage: Arc<dyn AuditStorage>) -> Self {
        Self {
            enabled: true,
            storage,
        }
    }

    /// A no-op logger.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            storage: Arc::new(NullStorage),
        }
    }

    /// A stdout-only logger, handy in development.
    pub fn console_only() -> Self {
        Self {
            enabled: true,
            storage: Arc::new(ConsoleStorage),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub async fn log(&self, event: AuditEvent) -> Result<(), AuditError> {
        if !self.enabled {
            return Ok(());
        }

        tracing::debug!(
            event_id = %event.id,
            kind = event.kind(),
            actor = %event.actor,
            entity = %event.entity,
            "Audit event"
        );

        self.storage.store(event).await
    }

    /// Matching events, newest first.
    pub async fn query(&self, filter: AuditFilter) -> Result<Vec<AuditEvent>, AuditError> {
        self.storage.query(filter).await
    }

    // Typed helpers, one per dashboard mutation.

    pub async fn log_order_placed(
        &self,
        actor: &str,
        order_id: i64,
        quantity: i64,
        amount: f64,
    ) -> Result<(), AuditError> {
        self.log(AuditEvent::record(
            actor,
            format!("order/{order_id}"),
            AuditAction::OrderPlaced { quantity, amount },
        ))
        .await
    }

    pub async fn log_order_status_changed(
        &self,
        actor: &str,
        order_id: i64,
        new_status: &str,
    ) -> Result<(), AuditError> {
        self.log(AuditEvent::record(
            actor,
            format!("order/{order_id}"),
            AuditAction::OrderStatusChanged {
                status: new_status.to_string(),
            },
        ))
        .await
    }

    pub async fn log_order_deleted(&self, actor: &str, order_id: i64) -> Result<(), AuditError> {
        self.log(AuditEvent::record(
            actor,
            format!("order/{order_id}"),
            AuditAction::OrderDeleted,
        ))
        .await
    }

    pub async fn log_stock_adjusted(
        &self,
        actor: &str,
        product_id: i64,
        delta: i64,
        reason: &str,
    ) -> Result<(), AuditError> {
        self.log(AuditEvent::record(
            actor,
            format!("product/{product_id}"),
            AuditAction::StockAdjusted {
                delta,
                reason: reason.to_string(),
            },
        ))
        .await
    }

    pub async fn log_product_created(
        &self,
        actor: &str,
        product_id: i64,
    ) -> Result<(), AuditError> {
        self.log(AuditEvent::record(
            actor,
            format!("product/{product_id}"),
            AuditAction::ProductCreated,
        ))
        .await
    }

    pub async fn log_product_retired(
        &self,
        actor: &str,
        product_id: i64,
    ) -> Result<(), AuditError> {
        self.log(AuditEvent::record(
            actor,
            format!("product/{product_id}"),
            AuditAction::ProductRetired,
        ))
        .await
    }

    pub async fn log_school_created(&self, actor: &str, school_id: i64) -> Result<(), AuditError> {
        self.log(AuditEvent::record(
            actor,
            format!("school/{school_id}"),
            AuditAction::SchoolCreated,
        ))
        .await
    }

    pub async fn log_client_created(&self, actor: &str, client_id: i64) -> Result<(), AuditError> {
        self.log(AuditEvent::record(
            actor,
            format!("client/{client_id}"),
            AuditAction::ClientCreated,
        ))
        .await
    }

    pub async fn log_client_deleted(&self, actor: &str, client_id: i64) -> Result<(), AuditError> {
        self.log(AuditEvent::record(
            actor,
            format!("client/{client_id}"),
            AuditAction::ClientDeleted,
        ))
        .await
    }

    pub async fn log_user_created(&self, actor: &str, username: &str) -> Result<(), AuditError> {
        self.log(AuditEvent::record(
            actor,
            format!("user/{username}"),
            AuditAction::UserCreated,
        ))
        .await
    }

    pub async fn log_password_changed(&self, actor: &str) -> Result<(), AuditError> {
        self.log(AuditEvent::record(
            actor,
            format!("user/{actor}"),
            AuditAction::PasswordChanged,
        ))
        .await
    }

    pub async fn log_login_succeeded(&self, username: &str) -> Result<(), AuditError> {
        self.log(AuditEvent::record(
            username,
            format!("user/{username}"),
            AuditAction::LoginSucceeded,
        ))
        .await
    }

    pub async fn log_login_failed(&self, username: &str, reason: &str) -> Result<(), AuditError> {
        self.log(AuditEvent::record(
            "anonymous",
            format!("user/{username}"),
            AuditAction::LoginFailed {
                error: reason.to_string(),
            },
        ))
        .await
    }
}

/// Criteria for querying the audit trail.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    /// Only events by this actor.
    pub actor: Option<String>,
    /// Only events of this kind (snake_case, e.g. "stock_adjusted").
    pub kind: Option<String>,
    /// Only events at or after this time.
    pub since: Option<chrono::DateTime<chrono::Utc>>,
    /// Only events at or before this time.
    pub until: Option<chrono::DateTime<chrono::Utc>>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl AuditFilter {
    /// The most recent `limit` events, no other criteria.
    pub fn recent(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }

    pub fn matches(&self, event: &AuditEvent) -> bool {
        if let Some(actor) = &self.actor {
            if &event.actor != actor {
                return false;
            }
        }
        if let Some(kind) = &self.kind {
            if event.kind() != kind {
                return false;
            }
        }
        if let Some(since) = self.since {
            if event.at < since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if event.at > until {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_logger_swallows_events() {
        let logger = AuditLogger::disabled();
        assert!(!logger.is_enabled());
        logger.log_order_placed("vendor", 1, 3, 120.0).await.unwrap();
        assert!(logger.query(AuditFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_logger_records_and_queries() {
        let dir = tempfile::tempdir().unwrap();
        let config = AuditConfig {
            enabled: true,
            directory: dir.path().to_string_lossy().to_string(),
            stdout: false,
        };
        let logger = AuditLogger::new(config).unwrap();

        logger.log_login_failed("admin", "wrong password").await.unwrap();
        logger.log_login_succeeded("admin").await.unwrap();

        let failures = logger
            .query(AuditFilter {
                kind: Some("login_failed".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].actor, "anonymous");

        let recent = logger.query(AuditFilter::recent(10)).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].kind(), "login_succeeded");
    }

    #[test]
    fn test_filter_time_window() {
        let event = AuditEvent::record("admin", "user/admin", AuditAction::PasswordChanged);

        let mut filter = AuditFilter::default();
        filter.since = Some(event.at - chrono::Duration::minutes(1));
        filter.until = Some(event.at + chrono::Duration::minutes(1));
        assert!(filter.matches(&event));

        filter.since = Some(event.at + chrono::Duration::minutes(1));
        assert!(!filter.matches(&event));
    }
}
