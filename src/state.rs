//! Shared application state for all routes. Built once at startup and cloned into each handler.

use crate::config::TableAccess;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    /// Tables the generic routes may address.
    pub tables: Arc<TableAccess>,
}

impl AppState {
    pub fn new(pool: SqlitePool, tables: TableAccess) -> Self {
        AppState {
            pool,
            tables: Arc::new(tables),
        }
    }
}
