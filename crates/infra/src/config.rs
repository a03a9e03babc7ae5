//! Configuration loading and representation.
//!
//! Everything is read from environment variables once at startup. Loaders take
//! a lookup function so they can be exercised without touching the process
//! environment; `from_env` wires that to `std::env::var`.

use std::fs::read_to_string;
use std::str::FromStr;

use thiserror::Error;
use tracing::{info, warn};

const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_USER: &str = "root";
const DEFAULT_DB_NAME: &str = "products_db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {var} from {path}: {source}")]
    SecretFile {
        var: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {var} value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Connection settings for the catalog store.
#[derive(Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub host: String,
    pub user: String,
    pub database: String,
    pub password: Option<String>,
}

impl core::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("database", &self.database)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `DB_PASSWORD_FILE` wins over `DB_PASSWORD`; its contents are trimmed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let password = match lookup("DB_PASSWORD_FILE") {
            Some(path) => Some(read_secret("DB_PASSWORD_FILE", &path)?),
            None => lookup("DB_PASSWORD"),
        };
        if password.is_none() {
            warn!("neither DB_PASSWORD nor DB_PASSWORD_FILE set; connecting without a password");
        }

        Ok(Self {
            host: var_or(&lookup, "DB_HOST", DEFAULT_DB_HOST),
            user: var_or(&lookup, "DB_USER", DEFAULT_DB_USER),
            database: var_or(&lookup, "DB_NAME", DEFAULT_DB_NAME),
            password,
        })
    }
}

/// Which catalog store adapter the API runs against.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    MySql,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" => Ok(Self::MySql),
            "memory" => Ok(Self::Memory),
            _ => Err(ConfigError::Invalid {
                var: "CATALOG_STORE",
                value: s.to_string(),
                reason: "expected one of: mysql, memory",
            }),
        }
    }
}

impl StoreBackend {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        match lookup("CATALOG_STORE") {
            Some(value) => value.parse(),
            None => Ok(Self::default()),
        }
    }
}

fn var_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn read_secret(var: &'static str, path: &str) -> Result<String, ConfigError> {
    read_to_string(path)
        .map(|s| s.trim().to_string())
        .map_err(|source| ConfigError::SecretFile {
            var,
            path: path.to_string(),
            source,
        })
}
