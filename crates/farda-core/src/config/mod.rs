//! Configuration types for the Farda dashboard.
//!
//! All crates share one `FardaConfig` structure, loaded from a YAML file
//! (farda.yaml). Every section has serde defaults, so a minimal file plus a
//! `DATABASE_URL` environment variable is enough to run.

pub mod audit;
pub mod dashboard;
pub mod database;
pub mod seed;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use audit::AuditConfig;
pub use dashboard::DashboardConfig;
pub use database::DatabaseConfig;
pub use seed::SeedConfig;

/// Complete Farda configuration loaded from a file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FardaConfig {
    /// Shop/project name shown in the dashboard header.
    #[serde(default)]
    pub project: Option<String>,

    /// Postgres connection.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Dashboard server settings.
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Audit logging settings.
    #[serde(default)]
    pub audit: AuditConfig,

    /// Bootstrap accounts created by `farda init`.
    #[serde(default)]
    pub seed: SeedConfig,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl FardaConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Name shown in the dashboard chrome.
    pub fn project_name(&self) -> &str {
        self.project.as_deref().unwrap_or("Farda")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_yaml() {
        let config = FardaConfig::from_yaml("project: Uniformes Silva\n").unwrap();
        assert_eq!(config.project_name(), "Uniformes Silva");
        assert_eq!(config.dashboard.port, 8080);
        assert_eq!(config.database.port, 5432);
        assert!(config.audit.enabled);
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
project: Fardamentos

database:
  host: db.internal
  port: 5433
  database: farda
  username: farda
  credentials_env: DATABASE_URL

dashboard:
  host: 0.0.0.0
  port: 9000
  session_ttl_secs: 3600

audit:
  enabled: true
  directory: /var/log/farda
  stdout: true

seed:
  admin_username: admin
  vendor_username: vendor
"#;
        let config = FardaConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.credentials_env.as_deref(), Some("DATABASE_URL"));
        assert_eq!(config.dashboard.port, 9000);
        assert_eq!(config.dashboard.session_ttl_secs, 3600);
        assert_eq!(config.audit.directory, "/var/log/farda");
        assert_eq!(config.seed.admin_username, "admin");
    }

    #[test]
    fn test_empty_yaml_defaults() {
        let config = FardaConfig::from_yaml("{}").unwrap();
        assert_eq!(config.project_name(), "Farda");
        assert!(config.dashboard.enabled);
    }
}
