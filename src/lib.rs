//! tabport - console import/export between tabular files and SQLite
//!
//! Reads CSV, Excel, and PDF form files into a typed in-memory table,
//! materializes it as a SQLite table, and exports tables back out to
//! CSV, Excel, and PDF forms.

pub mod analyze;
pub mod config;
pub mod convert;
pub mod db;
pub mod error;
pub mod model;
pub mod ops;
pub mod reader;
pub mod report;
pub mod sql;
pub mod writer;

pub use config::Settings;
pub use db::Database;
pub use error::{Result, TabportError};
pub use model::Table;
