//! Reader layer for the supported tabular file formats

mod csv;
mod excel;
pub mod line;
pub mod pdf;

use std::path::Path;

use crate::config::ReadOptions;
use crate::error::{Result, TabportError};
use crate::model::Table;
use crate::sql::sanitize_table_name;

pub use self::csv::CsvReader;
pub use self::excel::ExcelReader;
pub use self::pdf::PdfReader;

/// Trait for reading a tabular file into a Table
pub trait TableReader: Send + Sync {
    /// Read a file and return a Table
    fn read(&self, path: &Path, options: &ReadOptions) -> Result<Table>;

    /// Check if this reader handles the given file extension
    fn supports_extension(&self, ext: &str) -> bool;
}

/// Factory selecting a reader by file extension
pub struct ReaderFactory {
    readers: Vec<Box<dyn TableReader>>,
}

impl Default for ReaderFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ReaderFactory {
    pub fn new() -> Self {
        Self {
            readers: vec![
                Box::new(CsvReader),
                Box::new(ExcelReader),
                Box::new(PdfReader),
            ],
        }
    }

    /// Get a reader for the given file path, falling back to content
    /// sniffing when the extension is missing or unknown.
    pub fn get_reader(&self, path: &Path) -> Result<&dyn TableReader> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        if let Some(ext) = &ext {
            if let Some(reader) = self.reader_for(ext) {
                return Ok(reader);
            }
        }

        if let Some(sniffed) = detect_format(path) {
            if let Some(reader) = self.reader_for(sniffed) {
                return Ok(reader);
            }
        }

        Err(TabportError::UnsupportedFormat(
            ext.unwrap_or_else(|| "unknown".to_string()),
        ))
    }

    fn reader_for(&self, ext: &str) -> Option<&dyn TableReader> {
        self.readers
            .iter()
            .find(|r| r.supports_extension(ext))
            .map(|r| r.as_ref())
    }

    /// Read a file using the appropriate reader
    pub fn read(&self, path: &Path, options: &ReadOptions) -> Result<Table> {
        self.get_reader(path)?.read(path, options)
    }
}

/// Detect file format from leading bytes (for files without an extension)
pub fn detect_format(path: &Path) -> Option<&'static str> {
    use std::fs::File;
    use std::io::Read;

    let mut file = File::open(path).ok()?;
    let mut buffer = [0u8; 8];
    let bytes_read = file.read(&mut buffer).ok()?;

    if bytes_read < 4 {
        return None;
    }

    if &buffer[0..4] == b"%PDF" {
        return Some("pdf");
    }

    // xlsx is a ZIP container
    if &buffer[0..4] == b"PK\x03\x04" {
        return Some("xlsx");
    }

    // Legacy xls compound-document magic
    if &buffer[0..4] == b"\xD0\xCF\x11\xE0" {
        return Some("xls");
    }

    Some("csv")
}

/// Destination table name for a file: the explicit option when given,
/// otherwise the sanitized file stem.
pub fn table_name_for(path: &Path, options: &ReadOptions) -> String {
    if let Some(ref name) = options.table_name {
        return sanitize_table_name(name);
    }
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("import");
    sanitize_table_name(stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_name_from_stem() {
        let opts = ReadOptions::default();
        assert_eq!(
            table_name_for(Path::new("/tmp/sales report.csv"), &opts),
            "sales_report"
        );
    }

    #[test]
    fn explicit_table_name_wins() {
        let opts = ReadOptions::default().with_table_name("2024 data");
        assert_eq!(
            table_name_for(Path::new("/tmp/x.csv"), &opts),
            "table_2024_data"
        );
    }

    #[test]
    fn factory_selects_by_extension() {
        let factory = ReaderFactory::new();
        assert!(factory.get_reader(Path::new("a.csv")).is_ok());
        assert!(factory.get_reader(Path::new("a.xlsx")).is_ok());
        assert!(factory.get_reader(Path::new("a.pdf")).is_ok());
    }

    #[test]
    fn unknown_extension_falls_back_to_sniffing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.dat");
        std::fs::write(&path, "a,b\n1,2\n").unwrap();

        let table = ReaderFactory::new()
            .read(&path, &ReadOptions::default())
            .unwrap();
        assert_eq!(table.column_names(), vec!["a", "b"]);
    }

    #[test]
    fn unreadable_unknown_extension_is_rejected() {
        let factory = ReaderFactory::new();
        assert!(factory
            .get_reader(Path::new("/nonexistent/file.zzz"))
            .is_err());
    }

    #[test]
    fn sniffs_pdf_magic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noext");
        std::fs::write(&path, b"%PDF-1.7 rest").unwrap();
        assert_eq!(detect_format(&path), Some("pdf"));
    }
}
