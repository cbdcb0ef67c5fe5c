//! Error types shared across the crate

use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, TabportError>;

/// Failure cases that can occur while reading, converting, or persisting
/// tabular data.
#[derive(Debug, Error)]
pub enum TabportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Reading a source file failed; records which file and which operation.
    #[error("failed to {operation} {}: {message}", path.display())]
    FileRead {
        path: PathBuf,
        operation: &'static str,
        message: String,
    },

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid table data: {0}")]
    InvalidTable(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::Error),

    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TabportError {
    /// Wrap a lower-level error as a file-read failure for the given path.
    pub fn file_read(
        path: impl Into<PathBuf>,
        operation: &'static str,
        source: impl std::fmt::Display,
    ) -> Self {
        TabportError::FileRead {
            path: path.into(),
            operation,
            message: source.to_string(),
        }
    }
}
