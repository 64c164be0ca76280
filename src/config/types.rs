//! Runtime settings for the bridge: storage URL, listener, pool sizing, and table access.

use std::collections::BTreeSet;
use std::time::Duration;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/lambda.sqlite3";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3300";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;

#[derive(Clone, Debug)]
pub struct BridgeConfig {
    /// SQLite connection URL (e.g. `sqlite:./data/lambda.sqlite3` or `sqlite::memory:`).
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
    /// How long a request waits for a pooled connection before failing.
    pub acquire_timeout: Duration,
    pub tables: TableAccess,
    pub body_limit_bytes: usize,
    /// Apply bundled migrations (the `zoos` table) at startup.
    pub run_migrations: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS),
            tables: TableAccess::Any,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
            run_migrations: true,
        }
    }
}

/// Which tables the generic `/:table` routes may address.
/// Fixed-table routes are mounted explicitly and are not subject to this list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TableAccess {
    /// Any relation name taken from the URL is passed through to the storage engine.
    #[default]
    Any,
    Only(BTreeSet<String>),
}

impl TableAccess {
    /// Parse a comma-separated list; blank entries are kept so validation can reject them.
    pub fn from_list(raw: &str) -> Self {
        TableAccess::Only(raw.split(',').map(|s| s.trim().to_string()).collect())
    }

    pub fn permits(&self, table: &str) -> bool {
        match self {
            TableAccess::Any => true,
            TableAccess::Only(names) => names.contains(table),
        }
    }
}
