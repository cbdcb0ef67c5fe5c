//! File metadata collected before import

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Metadata about a tabular source file, plus any validation findings.
#[derive(Debug, Default, Clone, Serialize)]
pub struct FileMetadata {
    pub file_name: String,
    pub path: String,
    pub size_bytes: u64,
    pub column_count: usize,
    pub data_row_count: usize,
    pub headers: Vec<String>,
    pub modified: Option<DateTime<Utc>>,
    pub analyzed_at: Option<DateTime<Utc>>,
    pub validation_errors: Vec<String>,
    pub validation_warnings: Vec<String>,
}

impl FileMetadata {
    /// Human-readable file size
    pub fn formatted_size(&self) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;
        match self.size_bytes {
            b if b < KB => format!("{} B", b),
            b if b < MB => format!("{:.1} KB", b as f64 / KB as f64),
            b if b < GB => format!("{:.1} MB", b as f64 / MB as f64),
            b => format!("{:.1} GB", b as f64 / GB as f64),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validation_errors.is_empty()
    }
}

impl std::fmt::Display for FileMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} rows, {} cols, {})",
            self.file_name,
            self.data_row_count,
            self.column_count,
            self.formatted_size()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_formatting() {
        let mut meta = FileMetadata {
            size_bytes: 512,
            ..Default::default()
        };
        assert_eq!(meta.formatted_size(), "512 B");
        meta.size_bytes = 2048;
        assert_eq!(meta.formatted_size(), "2.0 KB");
        meta.size_bytes = 5 * 1024 * 1024;
        assert_eq!(meta.formatted_size(), "5.0 MB");
    }

    #[test]
    fn validity_tracks_errors() {
        let mut meta = FileMetadata::default();
        assert!(meta.is_valid());
        meta.validation_errors.push("no data rows".into());
        assert!(!meta.is_valid());
    }
}
