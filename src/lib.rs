//! Table bridge: generic REST-to-SQL CRUD routes over SQLite tables.

pub mod config;
pub mod error;
pub mod extractors;
pub mod response;
pub mod sql;
pub mod state;
pub mod store;
pub mod service;
pub mod handlers;
pub mod routes;

pub use config::{BridgeConfig, TableAccess};
pub use error::{AppError, ConfigError, StorageError};
pub use routes::{app, common_routes, fixed_table_routes, table_routes, ZOOS_TABLE};
pub use service::{CrudService, Row};
pub use state::AppState;
pub use store::{connect, ensure_database_dir, run_migrations};
