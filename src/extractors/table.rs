//! Extract the addressed table (and id, when present) from the request path.

use crate::error::AppError;
use crate::state::AppState;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Table bound at router construction; when present as a request extension it
/// replaces the `:table` path segment and bypasses the allow-list.
#[derive(Clone, Debug)]
pub struct FixedTable(pub Arc<str>);

impl FixedTable {
    pub fn new(table: &str) -> Self {
        FixedTable(Arc::from(table))
    }
}

#[derive(Clone, Debug)]
pub struct RowPath {
    pub table: String,
    pub id: Option<String>,
}

impl RowPath {
    /// The `:id` segment as a bind value. Routes without an id never call this.
    pub fn row_id(&self) -> Result<Value, AppError> {
        self.id
            .as_deref()
            .map(parse_id)
            .ok_or(AppError::Routing("id"))
    }
}

/// Integer-looking ids bind as integers; anything else binds as text.
pub fn parse_id(id_str: &str) -> Value {
    match id_str.parse::<i64>() {
        Ok(n) => Value::Number(n.into()),
        Err(_) => Value::String(id_str.to_string()),
    }
}

#[async_trait]
impl FromRequestParts<AppState> for RowPath {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let fixed = parts.extensions.get::<FixedTable>().cloned();
        let mut params = match Path::<HashMap<String, String>>::from_request_parts(parts, state).await {
            Ok(Path(params)) => params,
            Err(_) if fixed.is_some() => HashMap::new(),
            Err(rejection) => {
                tracing::warn!(error = %rejection.body_text(), "path extraction failed");
                return Err(AppError::Routing("table"));
            }
        };
        let id = params.remove("id");
        if let Some(FixedTable(table)) = fixed {
            return Ok(RowPath {
                table: table.to_string(),
                id,
            });
        }
        let table = params
            .remove("table")
            .filter(|t| !t.is_empty())
            .ok_or(AppError::Routing("table"))?;
        if !state.tables.permits(&table) {
            return Err(AppError::TableNotPermitted(table));
        }
        Ok(RowPath { table, id })
    }
}
