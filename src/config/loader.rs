//! Load [`BridgeConfig`] from environment variables (call `dotenvy::dotenv()` first to pick up `.env`).

use crate::config::types::*;
use crate::config::validate;
use crate::error::ConfigError;
use std::str::FromStr;
use std::time::Duration;

impl BridgeConfig {
    /// Read settings from the process environment, falling back to defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Validates the result.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = BridgeConfig::default();
        if let Some(url) = lookup("DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(addr) = lookup("BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(raw) = lookup("DB_MAX_CONNECTIONS") {
            config.max_connections = parse_var("DB_MAX_CONNECTIONS", &raw)?;
        }
        if let Some(raw) = lookup("DB_ACQUIRE_TIMEOUT_SECS") {
            config.acquire_timeout = Duration::from_secs(parse_var("DB_ACQUIRE_TIMEOUT_SECS", &raw)?);
        }
        if let Some(raw) = lookup("BRIDGE_TABLES") {
            config.tables = TableAccess::from_list(&raw);
        }
        if let Some(raw) = lookup("BODY_LIMIT_BYTES") {
            config.body_limit_bytes = parse_var("BODY_LIMIT_BYTES", &raw)?;
        }
        if let Some(raw) = lookup("RUN_MIGRATIONS") {
            config.run_migrations = parse_flag("RUN_MIGRATIONS", &raw)?;
        }
        validate(&config)?;
        Ok(config)
    }
}

fn parse_var<T: FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        var,
        value: raw.to_string(),
    })
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: raw.to_string(),
        }),
    }
}
