//! Dashboard application state.

use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use farda_audit::AuditLogger;
use farda_core::{FardaConfig, Role};
use farda_store::{
    ClientStore, OrderStore, ProductStore, ReportStore, SchoolStore, StockStore, UserStore,
};
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Shared application state for the dashboard.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: FardaConfig,
    users: UserStore,
    schools: SchoolStore,
    clients: ClientStore,
    products: ProductStore,
    stock: StockStore,
    orders: OrderStore,
    reports: ReportStore,
    audit: Arc<AuditLogger>,
    sessions: SessionStore,
}

impl AppState {
    /// Create application state over a connected pool.
    pub fn new(config: FardaConfig, pool: PgPool, audit: Arc<AuditLogger>) -> Self {
        let session_ttl = Duration::seconds(config.dashboard.session_ttl_secs as i64);
        Self {
            inner: Arc::new(AppStateInner {
                users: UserStore::new(pool.clone()),
                schools: SchoolStore::new(pool.clone()),
                clients: ClientStore::new(pool.clone()),
                products: ProductStore::new(pool.clone()),
                stock: StockStore::new(pool.clone()),
                orders: OrderStore::new(pool.clone()),
                reports: ReportStore::new(pool),
                audit,
                sessions: SessionStore::new(session_ttl),
                config,
            }),
        }
    }

    pub fn config(&self) -> &FardaConfig {
        &self.inner.config
    }

    pub fn users(&self) -> &UserStore {
        &self.inner.users
    }

    pub fn schools(&self) -> &SchoolStore {
        &self.inner.schools
    }

    pub fn clients(&self) -> &ClientStore {
        &self.inner.clients
    }

    pub fn products(&self) -> &ProductStore {
        &self.inner.products
    }

    pub fn stock(&self) -> &StockStore {
        &self.inner.stock
    }

    pub fn orders(&self) -> &OrderStore {
        &self.inner.orders
    }

    pub fn reports(&self) -> &ReportStore {
        &self.inner.reports
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.inner.audit
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }
}

/// A logged-in user, attached to requests by the auth middleware.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub username: String,
    pub display_name: String,
    pub role: Role,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

struct Session {
    user: SessionUser,
    expires_at: DateTime<Utc>,
}

/// In-memory session registry: random token -> logged-in user.
///
/// Sessions expire after the configured TTL and do not survive a restart.
pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a session for a user, returning the opaque token.
    pub fn create(&self, user: SessionUser) -> String {
        let bytes: [u8; 32] = rand::random();
        let token = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes);

        let session = Session {
            user,
            expires_at: Utc::now() + self.ttl,
        };
        self.sessions
            .write()
            .expect("session lock poisoned")
            .insert(token.clone(), session);
        token
    }

    /// Resolve a token to its user, if the session is still valid.
    /// Expired sessions are removed on sight.
    pub fn validate(&self, token: &str) -> Option<SessionUser> {
        let mut sessions = self.sessions.write().expect("session lock poisoned");
        match sessions.get(token) {
            Some(session) if session.expires_at > Utc::now() => Some(session.user.clone()),
            Some(_) => {
                sessions.remove(token);
                None
            }
            None => None,
        }
    }

    /// Drop a session (logout).
    pub fn remove(&self, token: &str) {
        self.sessions
            .write()
            .expect("session lock poisoned")
            .remove(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user(role: Role) -> SessionUser {
        SessionUser {
            username: "vendor".to_string(),
            display_name: "Vendor".to_string(),
            role,
        }
    }

    #[test]
    fn test_session_round_trip() {
        let store = SessionStore::new(Duration::hours(1));
        let token = store.create(test_user(Role::Vendor));

        let user = store.validate(&token).unwrap();
        assert_eq!(user.username, "vendor");
        assert!(!user.is_admin());

        store.remove(&token);
        assert!(store.validate(&token).is_none());
    }

    #[test]
    fn test_expired_session_rejected() {
        let store = SessionStore::new(Duration::seconds(-1));
        let token = store.create(test_user(Role::Admin));
        assert!(store.validate(&token).is_none());
    }

    #[test]
    fn test_tokens_are_unique() {
        let store = SessionStore::new(Duration::hours(1));
        let a = store.create(test_user(Role::Admin));
        let b = store.create(test_user(Role::Admin));
        assert_ne!(a, b);
    }
}
