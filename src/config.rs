//! Blog configuration, from TOML or the process environment.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::gate::PolicyGate;
use crate::request::{UserId, ADMIN_ID};
use crate::secret::Secret;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// Config file is not valid TOML for [`Config`]
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A required environment setting is absent
    #[error("missing required setting {0}")]
    Missing(&'static str),
    /// A setting is present but unusable
    #[error("invalid value for {key}: {reason}")]
    Invalid {
        /// Setting name
        key: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Blog configuration.
///
/// ```
/// use blog_policy::Config;
///
/// let config = Config::from_toml_str(r#"secret_key = "hush""#).unwrap();
/// assert_eq!(config.admin_id.0, 1);
/// assert_eq!(config.database_url, "sqlite://blog.db");
/// assert_eq!(format!("{}", config.secret_key), "[REDACTED]");
/// ```
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Identity of the administrator (default: 1).
    #[serde(default = "default_admin_id")]
    pub admin_id: UserId,
    /// Session signing key. Never printed.
    pub secret_key: Secret<String>,
    /// Storage location (default: `sqlite://blog.db`).
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Fallback log filter when `RUST_LOG` is unset (default: `info`).
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_admin_id() -> UserId {
    ADMIN_ID
}

fn default_database_url() -> String {
    "sqlite://blog.db".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read `ADMIN_ID`, `SECRET_KEY`, `DATABASE_URL` and `LOG_FILTER` from
    /// the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// ```
    /// use blog_policy::{Config, ConfigError};
    ///
    /// let err = Config::from_lookup(|_| None).unwrap_err();
    /// assert!(matches!(err, ConfigError::Missing("SECRET_KEY")));
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let admin_id = match lookup("ADMIN_ID") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .map(UserId)
                .map_err(|e| ConfigError::Invalid {
                    key: "ADMIN_ID",
                    reason: e.to_string(),
                })?,
            None => default_admin_id(),
        };
        let secret_key = lookup("SECRET_KEY").ok_or(ConfigError::Missing("SECRET_KEY"))?;

        let config = Config {
            admin_id,
            secret_key: Secret::new(secret_key),
            database_url: lookup("DATABASE_URL").unwrap_or_else(default_database_url),
            log_filter: lookup("LOG_FILTER").unwrap_or_else(default_log_filter),
        };
        config.validate()?;
        Ok(config)
    }

    /// Gate bound to the configured administrator.
    pub fn gate(&self) -> PolicyGate {
        PolicyGate::new(self.admin_id)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.secret_key.expose_secret().is_empty() {
            return Err(ConfigError::Invalid {
                key: "SECRET_KEY",
                reason: "must not be empty".to_string(),
            });
        }
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "DATABASE_URL",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
