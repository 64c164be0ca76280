//! Table CRUD handlers: list, read, create, update, delete.

use crate::error::{AppError, StorageError};
use crate::extractors::RowPath;
use crate::response::{created, no_content, ok};
use crate::service::{CrudService, Row};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::Value;

fn body_to_row(value: Value) -> Result<Row, AppError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(StorageError::InvalidRow.into()),
    }
}

pub async fn list(State(state): State<AppState>, path: RowPath) -> Result<impl IntoResponse, AppError> {
    let rows = CrudService::list(&state.pool, &path.table).await?;
    Ok(ok(rows))
}

pub async fn read(State(state): State<AppState>, path: RowPath) -> Result<impl IntoResponse, AppError> {
    let id = path.row_id()?;
    let row = CrudService::read(&state.pool, &path.table, &id)
        .await?
        .ok_or_else(|| AppError::RowNotFound { table: path.table.clone() })?;
    Ok(ok(row))
}

pub async fn create(
    State(state): State<AppState>,
    path: RowPath,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let body = body_to_row(body)?;
    let row = CrudService::create(&state.pool, &path.table, &body).await?;
    Ok(created(row))
}

pub async fn update(
    State(state): State<AppState>,
    path: RowPath,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let id = path.row_id()?;
    let body = body_to_row(body)?;
    let row = CrudService::update(&state.pool, &path.table, &id, &body)
        .await?
        .ok_or_else(|| AppError::NoRowsAffected { table: path.table.clone() })?;
    Ok(ok(row))
}

pub async fn delete(State(state): State<AppState>, path: RowPath) -> Result<impl IntoResponse, AppError> {
    let id = path.row_id()?;
    if !CrudService::delete(&state.pool, &path.table, &id).await? {
        return Err(AppError::NoRowsAffected { table: path.table });
    }
    Ok(no_content())
}
