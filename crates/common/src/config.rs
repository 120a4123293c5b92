//! Shared configuration sections.

use crate::secret::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::fmt;

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_acquire_timeout_seconds() -> u64 {
    5
}

/// Database connection settings.
#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string (contains credentials).
    pub url: SecretString,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Connections kept open while idle.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// How long to wait for a pooled connection before failing.
    #[serde(default = "default_acquire_timeout_seconds")]
    pub acquire_timeout_seconds: u64,
}

impl DatabaseConfig {
    /// Settings with pool defaults for the given URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: SecretString::from(url.into()),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            acquire_timeout_seconds: default_acquire_timeout_seconds(),
        }
    }

    /// The connection string. Never log the result.
    #[must_use]
    pub fn url(&self) -> &str {
        self.url.expose_secret()
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("acquire_timeout_seconds", &self.acquire_timeout_seconds)
            .finish()
    }
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Emit JSON-formatted logs.
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "workspace_service=debug,common=info,tower_http=debug".to_string(),
            json_logs: false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_debug_redacts_url() {
        let config = DatabaseConfig::new("postgresql://ws:hunter2@db:5432/workspaces");
        let debug_str = format!("{config:?}");

        assert!(!debug_str.contains("hunter2"));
        assert!(debug_str.contains("[REDACTED]"));
        assert_eq!(config.url(), "postgresql://ws:hunter2@db:5432/workspaces");
    }

    #[test]
    fn test_database_config_deserialize_defaults() {
        let config: DatabaseConfig =
            serde_json::from_str(r#"{"url":"postgresql://localhost/ws"}"#).unwrap();

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.acquire_timeout_seconds, 5);
    }

    #[test]
    fn test_observability_defaults() {
        let config = ObservabilityConfig::default();
        assert!(config.log_filter.contains("workspace_service"));
        assert!(!config.json_logs);
    }
}
