//! Bootstrap account configuration.
//!
//! `farda init` creates two accounts when the users table is empty: an
//! administrator and a vendor. Passwords come from environment variables so
//! they never land in the config file.

use serde::{Deserialize, Serialize};

/// Bootstrap accounts created on an empty database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Username of the bootstrap administrator.
    #[serde(default = "default_admin_username")]
    pub admin_username: String,

    /// Environment variable holding the administrator password.
    #[serde(default = "default_admin_password_env")]
    pub admin_password_env: String,

    /// Username of the bootstrap vendor account.
    #[serde(default = "default_vendor_username")]
    pub vendor_username: String,

    /// Environment variable holding the vendor password.
    #[serde(default = "default_vendor_password_env")]
    pub vendor_password_env: String,

    /// Schools inserted when the schools table is empty.
    #[serde(default)]
    pub schools: Vec<SeedSchool>,
}

/// A school seeded by `farda init`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedSchool {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            admin_username: default_admin_username(),
            admin_password_env: default_admin_password_env(),
            vendor_username: default_vendor_username(),
            vendor_password_env: default_vendor_password_env(),
            schools: Vec::new(),
        }
    }
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_password_env() -> String {
    "FARDA_ADMIN_PASSWORD".to_string()
}

fn default_vendor_username() -> String {
    "vendor".to_string()
}

fn default_vendor_password_env() -> String {
    "FARDA_VENDOR_PASSWORD".to_string()
}
