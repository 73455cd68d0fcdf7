//! Application configuration
//!
//! Loaded from a TOML file (default: `~/.config/medequip/config.toml`,
//! overridable with the `MEDEQUIP_CONFIG` environment variable). Every
//! section and field has a default so a missing or partial file still
//! yields a runnable configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Errors raised while loading the configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub security: SecurityConfig,
    pub alerts: AlertsConfig,
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Database URL. The `DATABASE_URL` environment variable wins over
    /// the file value.
    pub url: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite://./medequip.db?mode=rwc".to_string(),
        }
    }
}

impl DatabaseSettings {
    pub fn connection_url(&self) -> String {
        std::env::var("DATABASE_URL").unwrap_or_else(|_| self.url.clone())
    }
}

/// Security settings: token signing and password hashing
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Secret key for signing JWT tokens. `MEDEQUIP_JWT_SECRET` wins over
    /// the file value. Loaded once at startup, never rotated in-process.
    pub jwt_secret: String,
    /// Token lifetime in hours
    pub jwt_expiration_hours: i64,
    /// bcrypt cost factor. None = bcrypt default
    pub bcrypt_cost: Option<u32>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_hours: 24,
            bcrypt_cost: None,
        }
    }
}

impl SecurityConfig {
    pub fn jwt_secret(&self) -> String {
        std::env::var("MEDEQUIP_JWT_SECRET").unwrap_or_else(|_| self.jwt_secret.clone())
    }
}

/// Maintenance alerting settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AlertsConfig {
    /// How far ahead (in days) a pending maintenance counts as "upcoming"
    pub lookahead_days: i64,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self { lookahead_days: 7 }
    }
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let cfg = toml::from_str(&raw)?;
        Ok(cfg)
    }
}

/// Default config file location: `~/.config/medequip/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("medequip")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_runnable() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.port, 8001);
        assert_eq!(cfg.security.jwt_expiration_hours, 24);
        assert_eq!(cfg.alerts.lookahead_days, 7);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9090

            [alerts]
            lookahead_days = 14
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.alerts.lookahead_days, 14);
        assert_eq!(cfg.database.url, "sqlite://./medequip.db?mode=rwc");
    }

    #[test]
    fn address_joins_host_and_port() {
        let cfg = ServerConfig {
            host: "127.0.0.1".into(),
            port: 8001,
        };
        assert_eq!(cfg.address(), "127.0.0.1:8001");
    }
}
