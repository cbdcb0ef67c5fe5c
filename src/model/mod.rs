//! Data model for tabular data representation

mod metadata;
mod record;
mod schema;
mod table;

pub use metadata::FileMetadata;
pub use record::Person;
pub use schema::{CellType, Column};
pub use table::{CellValue, Row, Table};
