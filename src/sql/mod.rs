//! SQL identifier sanitization and type mapping

pub mod ident;
pub mod types;

pub use ident::{sanitize_column_name, sanitize_table_name, unique_name};
pub use types::{create_table_sql, insert_sql, quote_ident, SqlType};
