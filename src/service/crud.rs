//! Generic CRUD execution against SQLite.

use crate::error::{AppError, StorageError};
use crate::service::Row;
use crate::sql::{delete, insert, select_all, select_by_id, update, QueryBuf, SqliteBindValue, ID_COLUMN};
use serde_json::Value;
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteQueryResult, SqliteRow};
use sqlx::SqlitePool;

pub struct CrudService;

impl CrudService {
    /// All rows of `table`, in storage order. An empty table is an empty vec.
    pub async fn list(pool: &SqlitePool, table: &str) -> Result<Vec<Row>, AppError> {
        let q = select_all(table);
        Self::query_many(pool, &q).await
    }

    /// Fetch one row by id. Returns None when no row matches.
    pub async fn read(pool: &SqlitePool, table: &str, id: &Value) -> Result<Option<Row>, AppError> {
        let q = select_by_id(table, id);
        Self::query_one(pool, &q).await
    }

    /// Insert one row, then re-read it so server defaults are included. The re-read uses the
    /// body's `id` when the caller supplied one, else the generated rowid.
    pub async fn create(pool: &SqlitePool, table: &str, body: &Row) -> Result<Row, AppError> {
        let q = insert(table, body);
        let result = Self::execute(pool, &q).await?;
        let id = match body.get(ID_COLUMN) {
            Some(id) if !id.is_null() => id.clone(),
            _ => Value::from(result.last_insert_rowid()),
        };
        Self::read(pool, table, &id).await?.ok_or_else(|| {
            StorageError::MissingAfterInsert {
                table: table.to_string(),
            }
            .into()
        })
    }

    /// Update one row by id and return it re-read. None when the update touched no rows.
    pub async fn update(
        pool: &SqlitePool,
        table: &str,
        id: &Value,
        body: &Row,
    ) -> Result<Option<Row>, AppError> {
        let q = update(table, id, body);
        let result = Self::execute(pool, &q).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::read(pool, table, id).await
    }

    /// Delete one row by id. Returns false when nothing was deleted.
    pub async fn delete(pool: &SqlitePool, table: &str, id: &Value) -> Result<bool, AppError> {
        let q = delete(table, id);
        let result = Self::execute(pool, &q).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn query_one(pool: &SqlitePool, q: &QueryBuf) -> Result<Option<Row>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_params(q).fetch_optional(pool).await?;
        Ok(row.map(|r| row_to_json(&r)))
    }

    async fn query_many(pool: &SqlitePool, q: &QueryBuf) -> Result<Vec<Row>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let rows = bind_params(q).fetch_all(pool).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn execute(pool: &SqlitePool, q: &QueryBuf) -> Result<SqliteQueryResult, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "execute");
        Ok(bind_params(q).execute(pool).await?)
    }
}

fn bind_params(q: &QueryBuf) -> Query<'_, Sqlite, SqliteArguments<'_>> {
    let mut query = sqlx::query(&q.sql);
    for p in &q.params {
        query = query.bind(SqliteBindValue::from(p));
    }
    query
}

fn row_to_json(row: &SqliteRow) -> Row {
    use sqlx::Column;
    use sqlx::Row as _;
    let mut map = Row::new();
    for (idx, col) in row.columns().iter().enumerate() {
        map.insert(col.name().to_string(), cell_to_value(row, idx));
    }
    map
}

/// SQLite values are dynamically typed; take the first storage class the cell decodes as.
fn cell_to_value(row: &SqliteRow, idx: usize) -> Value {
    use sqlx::Row as _;
    use sqlx::{TypeInfo, ValueRef};
    let is_blob = match row.try_get_raw(idx) {
        Ok(raw) if !raw.is_null() => raw.type_info().name() == "BLOB",
        _ => return Value::Null,
    };
    if is_blob {
        if let Ok(bytes) = row.try_get::<Vec<u8>, _>(idx) {
            return Value::Array(bytes.into_iter().map(Value::from).collect());
        }
    }
    if let Ok(n) = row.try_get::<i64, _>(idx) {
        return Value::Number(n.into());
    }
    if let Ok(f) = row.try_get::<f64, _>(idx) {
        if let Some(n) = serde_json::Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    if let Ok(s) = row.try_get::<String, _>(idx) {
        return Value::String(s);
    }
    Value::Null
}
