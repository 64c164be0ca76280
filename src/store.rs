//! Storage bootstrap: database file, connection pool, bundled migrations, and liveness probe.

use crate::config::BridgeConfig;
use crate::error::StorageError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Create the parent directory of a file-backed database so SQLite can create the file.
pub async fn ensure_database_dir(database_url: &str) -> Result<(), StorageError> {
    if is_in_memory(database_url) {
        return Ok(());
    }
    let options = SqliteConnectOptions::from_str(database_url)?;
    if let Some(parent) = options.get_filename().parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    Ok(())
}

/// Open the pool described by `config`, creating the database file if missing.
pub async fn connect(config: &BridgeConfig) -> Result<SqlitePool, StorageError> {
    ensure_database_dir(&config.database_url).await?;
    let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(options)
        .await?;
    tracing::info!(url = %config.database_url, max_connections = config.max_connections, "storage pool ready");
    Ok(pool)
}

/// Apply bundled migrations (creates `zoos`). Idempotent.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn ping(pool: &SqlitePool) -> Result<(), StorageError> {
    sqlx::query("SELECT 1").fetch_optional(pool).await?;
    Ok(())
}
