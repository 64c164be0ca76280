//! Table CRUD routes.
//! The generic router takes the table from the `:table` segment; a fixed-table router binds one
//! table name at construction and serves the same handlers under `/<table>`.

use crate::extractors::FixedTable;
use crate::handlers::table::{create, delete as delete_handler, list, read, update};
use crate::state::AppState;
use axum::{routing::get, Extension, Router};

pub fn table_routes(state: AppState) -> Router {
    Router::new()
        .route("/:table", get(list).post(create))
        .route("/:table/:id", get(read).put(update).delete(delete_handler))
        .with_state(state)
}

pub fn fixed_table_routes(state: AppState, table: &str) -> Router {
    let base = format!("/{table}");
    Router::new()
        .route(&base, get(list).post(create))
        .route(&format!("{base}/:id"), get(read).put(update).delete(delete_handler))
        .layer(Extension(FixedTable::new(table)))
        .with_state(state)
}
