//! CrudService: generic CRUD using the SQL builder.

mod crud;
pub use crud::CrudService;

/// One record: column name to value, in column order.
pub type Row = serde_json::Map<String, serde_json::Value>;
