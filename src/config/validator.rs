//! Validate loaded settings before the pool or listener is built.

use crate::config::types::{BridgeConfig, TableAccess};
use crate::error::ConfigError;

pub fn validate(config: &BridgeConfig) -> Result<(), ConfigError> {
    if config.database_url.trim().is_empty() {
        return Err(ConfigError::Validation("DATABASE_URL must not be empty".into()));
    }
    if config.max_connections == 0 {
        return Err(ConfigError::Validation("DB_MAX_CONNECTIONS must be at least 1".into()));
    }
    if config.body_limit_bytes == 0 {
        return Err(ConfigError::Validation("BODY_LIMIT_BYTES must be at least 1".into()));
    }
    if let TableAccess::Only(names) = &config.tables {
        if names.iter().any(|n| n.is_empty()) {
            return Err(ConfigError::Validation("BRIDGE_TABLES contains an empty table name".into()));
        }
    }
    Ok(())
}
