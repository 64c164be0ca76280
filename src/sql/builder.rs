//! Builds parameterized SELECT, INSERT, UPDATE, DELETE for a table named at request time.

use crate::service::Row;
use serde_json::Value;

/// Primary-key column every addressed table is expected to expose.
pub const ID_COLUMN: &str = "id";

/// Quote an identifier for SQLite. Names come straight from the URL or body, so embedded quotes are doubled.
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }
}

/// SELECT every row, in storage order.
pub fn select_all(table: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT * FROM {}", quoted(table));
    q
}

pub fn select_by_id(table: &str, id: &Value) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT * FROM {} WHERE {} = ?", quoted(table), quoted(ID_COLUMN));
    q.params.push(id.clone());
    q
}

/// INSERT one row with the body's columns in body order. An empty body inserts all defaults.
pub fn insert(table: &str, body: &Row) -> QueryBuf {
    let mut q = QueryBuf::new();
    if body.is_empty() {
        q.sql = format!("INSERT INTO {} DEFAULT VALUES", quoted(table));
        return q;
    }
    let mut cols = Vec::with_capacity(body.len());
    for (name, val) in body {
        cols.push(quoted(name));
        q.params.push(val.clone());
    }
    let placeholders = vec!["?"; cols.len()].join(", ");
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quoted(table),
        cols.join(", "),
        placeholders
    );
    q
}

/// UPDATE by id: SET every column present in body. An empty body yields a statement
/// SQLite rejects as a syntax error.
pub fn update(table: &str, id: &Value, body: &Row) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::with_capacity(body.len());
    for (name, val) in body {
        sets.push(format!("{} = ?", quoted(name)));
        q.params.push(val.clone());
    }
    q.params.push(id.clone());
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ?",
        quoted(table),
        sets.join(", "),
        quoted(ID_COLUMN)
    );
    q
}

pub fn delete(table: &str, id: &Value) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("DELETE FROM {} WHERE {} = ?", quoted(table), quoted(ID_COLUMN));
    q.params.push(id.clone());
    q
}
