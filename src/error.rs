//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sqlx::error::{DatabaseError, ErrorKind};
use thiserror::Error;

/// Message returned when an insert or update collides with a unique constraint.
pub const DUPLICATE_VALUE_MESSAGE: &str = "Another record with that value exists";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}'")]
    InvalidValue { var: &'static str, value: String },
    #[error("validation: {0}")]
    Validation(String),
}

/// Storage failures, classified so callers never inspect engine-specific codes.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Duplicate value in a uniquely-constrained column. `constraint` names the
    /// constraint when the engine reports one, else the `table.column` target.
    #[error("Another record with that value exists")]
    UniqueViolation {
        constraint: Option<String>,
        detail: String,
    },
    /// Not-null, foreign-key or check constraint failure; carries the engine message.
    #[error("{detail}")]
    ConstraintViolation { kind: &'static str, detail: String },
    #[error("{0}")]
    Database(sqlx::Error),
    #[error("migration: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    /// Request body is not a column map, so no statement can be built from it.
    #[error("body must be a JSON object")]
    InvalidRow,
    /// The insert committed but the row could not be read back by its key.
    #[error("inserted {table} row could not be read back")]
    MissingAfterInsert { table: String },
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            let constraint_kind = match db.kind() {
                ErrorKind::UniqueViolation => {
                    return StorageError::UniqueViolation {
                        constraint: unique_target(&**db),
                        detail: db.message().to_string(),
                    };
                }
                ErrorKind::NotNullViolation => Some("not_null_violation"),
                ErrorKind::ForeignKeyViolation => Some("foreign_key_violation"),
                ErrorKind::CheckViolation => Some("check_violation"),
                _ => None,
            };
            if let Some(kind) = constraint_kind {
                return StorageError::ConstraintViolation {
                    kind,
                    detail: db.message().to_string(),
                };
            }
        }
        StorageError::Database(err)
    }
}

/// SQLite does not name the constraint; its message ends with `failed: table.column`.
fn unique_target(db: &dyn DatabaseError) -> Option<String> {
    db.constraint().map(str::to_string).or_else(|| {
        db.message()
            .split_once("failed: ")
            .map(|(_, target)| target.trim().to_string())
    })
}

impl StorageError {
    fn code(&self) -> &'static str {
        match self {
            StorageError::UniqueViolation { .. } => "unique_violation",
            StorageError::ConstraintViolation { kind, .. } => *kind,
            StorageError::Database(_) => "database_error",
            StorageError::Migration(_) => "migration_error",
            StorageError::Io(_) => "io_error",
            StorageError::InvalidRow => "invalid_row",
            StorageError::MissingAfterInsert { .. } => "missing_after_insert",
        }
    }

    /// Raw engine message kept behind the friendly duplicate-value text.
    fn detail(&self) -> Option<&str> {
        match self {
            StorageError::UniqueViolation { detail, .. } => Some(detail),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    /// Lookup by id matched zero rows.
    #[error("No {table} data with that id!")]
    RowNotFound { table: String },
    /// Update or delete by id affected zero rows.
    #[error("No {table} item with that id!")]
    NoRowsAffected { table: String },
    #[error("No table named {0} is exposed")]
    TableNotPermitted(String),
    /// Router wiring did not supply the path segments a handler needs.
    #[error("route is missing {0}")]
    Routing(&'static str),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Storage(err.into())
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::RowNotFound { .. } | AppError::NoRowsAffected { .. } | AppError::TableNotPermitted(_) => {
                (StatusCode::NOT_FOUND, None)
            }
            AppError::Routing(_) => {
                tracing::error!(error = %self, "route wiring error");
                (StatusCode::INTERNAL_SERVER_ERROR, Some("routing_error"))
            }
            AppError::Storage(e) => {
                tracing::error!(error = %e, code = e.code(), detail = e.detail(), "storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, Some(e.code()))
            }
        };
        let body = ErrorBody {
            message: self.to_string(),
            code,
        };
        (status, Json(body)).into_response()
    }
}
