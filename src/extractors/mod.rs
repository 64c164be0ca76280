pub mod table;

pub use table::{parse_id, FixedTable, RowPath};
