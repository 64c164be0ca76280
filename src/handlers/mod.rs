//! HTTP handlers for table CRUD.

pub mod table;
pub use table::*;
