//! Audit event types.
//!
//! An event records who did what to which record: an actor (username), an
//! entity ("order/42", "product/7"), and a typed action payload. The payload
//! enum carries exactly the fields each action needs, so an order placement
//! cannot be recorded without its quantity and amount.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What happened, with the data that belongs to it.
///
/// Serialized internally tagged, so a JSONL line reads
/// `{"action":"stock_adjusted","delta":-3,"reason":"..."}` alongside the
/// envelope fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AuditAction {
    OrderPlaced { quantity: i64, amount: f64 },
    OrderStatusChanged { status: String },
    OrderDeleted,
    StockAdjusted { delta: i64, reason: String },
    ProductCreated,
    ProductRetired,
    SchoolCreated,
    ClientCreated,
    ClientDeleted,
    UserCreated,
    PasswordChanged,
    LoginSucceeded,
    LoginFailed { error: String },
}

impl AuditAction {
    /// Stable snake_case name, identical to the serialized tag. Used for log
    /// lines and for filtering.
    pub fn kind(&self) -> &'static str {
        match self {
            AuditAction::OrderPlaced { .. } => "order_placed",
            AuditAction::OrderStatusChanged { .. } => "order_status_changed",
            AuditAction::OrderDeleted => "order_deleted",
            AuditAction::StockAdjusted { .. } => "stock_adjusted",
            AuditAction::ProductCreated => "product_created",
            AuditAction::ProductRetired => "product_retired",
            AuditAction::SchoolCreated => "school_created",
            AuditAction::ClientCreated => "client_created",
            AuditAction::ClientDeleted => "client_deleted",
            AuditAction::UserCreated => "user_created",
            AuditAction::PasswordChanged => "password_changed",
            AuditAction::LoginSucceeded => "login_succeeded",
            AuditAction::LoginFailed { .. } => "login_failed",
        }
    }
}

/// One recorded audit event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique event id.
    pub id: Uuid,

    /// When the event happened.
    pub at: DateTime<Utc>,

    /// Username of whoever did it ("anonymous" for failed logins without a
    /// session).
    pub actor: String,

    /// Record touched, as kind/id (e.g. "order/42").
    pub entity: String,

    #[serde(flatten)]
    pub action: AuditAction,
}

impl AuditEvent {
    pub fn record(
        actor: impl Into<String>,
        entity: impl Into<String>,
        action: AuditAction,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            at: Utc::now(),
            actor: actor.into(),
            entity: entity.into(),
            action,
        }
    }

    pub fn kind(&self) -> &'static str {
        self.action.kind()
    }

    /// Human-readable one-liner for console output and `farda audit`.
    pub fn to_log_line(&self) -> String {
        let mut line = format!(
            "[{}] {} actor={} entity={}",
            self.at.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            self.kind(),
            self.actor,
            self.entity,
        );

        match &self.action {
            AuditAction::OrderPlaced { quantity, amount } => {
                line.push_str(&format!(" quantity={quantity} amount={amount:.2}"));
            }
            AuditAction::OrderStatusChanged { status } => {
                line.push_str(&format!(" status={status}"));
            }
            AuditAction::StockAdjusted { delta, reason } => {
                line.push_str(&format!(" delta={delta:+} reason=\"{}\"", sanitize(reason)));
            }
            AuditAction::LoginFailed { error } => {
                line.push_str(&format!(" error=\"{}\"", sanitize(error)));
            }
            _ => {}
        }

        line
    }
}

fn sanitize(text: &str) -> String {
    text.replace('"', "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_serialized_tag() {
        let event = AuditEvent::record(
            "vendor",
            "order/42",
            AuditAction::OrderPlaced {
                quantity: 12,
                amount: 358.8,
            },
        );
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""action":"order_placed""#));
        assert_eq!(event.kind(), "order_placed");
    }

    #[test]
    fn test_payload_round_trip() {
        let event = AuditEvent::record(
            "admin",
            "product/7",
            AuditAction::StockAdjusted {
                delta: -3,
                reason: "damaged in storage".to_string(),
            },
        );
        let json = serde_json::to_string(&event).unwrap();
        let back: AuditEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back.action, event.action);
        assert_eq!(back.entity, "product/7");
    }

    #[test]
    fn test_log_line_carries_payload() {
        let line = AuditEvent::record(
            "admin",
            "product/7",
            AuditAction::StockAdjusted {
                delta: -3,
                reason: r#"counted "by hand""#.to_string(),
            },
        )
        .to_log_line();

        assert!(line.contains("stock_adjusted"));
        assert!(line.contains("actor=admin"));
        assert!(line.contains("delta=-3"));
        assert!(!line.contains("\"by hand\""), "quotes must be sanitized");
    }

    #[test]
    fn test_log_line_plain_action() {
        let line =
            AuditEvent::record("admin", "user/admin", AuditAction::LoginSucceeded).to_log_line();
        assert!(line.ends_with("entity=user/admin"));
    }
}
