//! File metadata extraction, validation, and SQL type inference

use std::path::Path;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tracing::debug;

use crate::convert::parse_cell;
use crate::error::{Result, TabportError};
use crate::model::{CellType, FileMetadata};
use crate::reader::line::read_rows;
use crate::sql::{sanitize_column_name, SqlType};

/// Collect metadata and validation findings for a delimited file.
pub fn file_metadata(path: &Path, delimiter: char) -> Result<FileMetadata> {
    let fs_meta = std::fs::metadata(path)
        .map_err(|e| TabportError::file_read(path, "stat", e))?;

    let rows = read_rows(path, delimiter)?;

    let headers: Vec<String> = rows.first().map(|(fields, _)| fields.clone()).unwrap_or_default();
    let data_row_count = rows.len().saturating_sub(1);

    let mut metadata = FileMetadata {
        file_name: path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string(),
        path: path.display().to_string(),
        size_bytes: fs_meta.len(),
        column_count: headers.len(),
        data_row_count,
        headers,
        modified: fs_meta.modified().ok().map(DateTime::<Utc>::from),
        analyzed_at: Some(Utc::now()),
        validation_errors: Vec::new(),
        validation_warnings: Vec::new(),
    };

    if metadata.column_count == 0 {
        metadata.validation_errors.push("no columns found".into());
    }
    if metadata.data_row_count == 0 {
        metadata.validation_errors.push("no data rows found".into());
    }
    if metadata.headers.iter().any(|h| h.trim().is_empty()) {
        metadata
            .validation_warnings
            .push("some column headers are empty".into());
    }

    debug!(file = %metadata.file_name, rows = metadata.data_row_count, "analyzed file");
    Ok(metadata)
}

/// Validate a delimited file's structure; errors become a hard failure,
/// warnings are returned for the caller to surface.
pub fn validate(path: &Path, delimiter: char) -> Result<Vec<String>> {
    let metadata = file_metadata(path, delimiter)?;
    if !metadata.is_valid() {
        return Err(TabportError::InvalidTable(
            metadata.validation_errors.join("; "),
        ));
    }
    Ok(metadata.validation_warnings)
}

/// Infer a SQL type per column by sampling up to `sample_rows` data rows.
/// Keys are sanitized column names in file order.
pub fn infer_sql_types(
    path: &Path,
    delimiter: char,
    sample_rows: usize,
) -> Result<IndexMap<String, SqlType>> {
    let rows = read_rows(path, delimiter)?;
    if rows.is_empty() {
        return Err(TabportError::InvalidTable("file is empty".into()));
    }

    let (headers, _) = &rows[0];
    let sample = &rows[1..rows.len().min(1 + sample_rows)];

    let mut types = IndexMap::with_capacity(headers.len());
    for (col_idx, header) in headers.iter().enumerate() {
        let mut inferred = CellType::Null;
        for (fields, _) in sample {
            if let Some(raw) = fields.get(col_idx) {
                inferred = inferred.widen(parse_cell(raw).cell_type());
            }
        }
        types.insert(sanitize_column_name(header), SqlType::from(inferred));
    }

    Ok(types)
}
