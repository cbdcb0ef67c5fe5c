//! Export writers for the supported output formats

mod csv;
mod excel;
mod pdf;

use std::path::Path;

use crate::error::{Result, TabportError};
use crate::model::Table;

pub use self::csv::CsvWriter;
pub use self::excel::ExcelWriter;
pub use self::pdf::fill_form;

/// Trait for writing a Table out to a file
pub trait TableWriter: Send + Sync {
    /// Write the table to the given path
    fn write(&self, table: &Table, path: &Path) -> Result<()>;

    /// Check if this writer handles the given file extension
    fn supports_extension(&self, ext: &str) -> bool;
}

/// Factory selecting a writer by output file extension
pub struct WriterFactory {
    writers: Vec<Box<dyn TableWriter>>,
}

impl Default for WriterFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl WriterFactory {
    pub fn new() -> Self {
        Self {
            writers: vec![Box::new(CsvWriter), Box::new(ExcelWriter)],
        }
    }

    pub fn get_writer(&self, path: &Path) -> Result<&dyn TableWriter> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        for writer in &self.writers {
            if writer.supports_extension(&ext) {
                return Ok(writer.as_ref());
            }
        }

        Err(TabportError::UnsupportedFormat(ext))
    }

    /// Write a table using the writer matching the output extension
    pub fn write(&self, table: &Table, path: &Path) -> Result<()> {
        self.get_writer(path)?.write(table, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_writer_by_extension() {
        let factory = WriterFactory::new();
        assert!(factory.get_writer(Path::new("out.csv")).is_ok());
        assert!(factory.get_writer(Path::new("out.xlsx")).is_ok());
        assert!(factory.get_writer(Path::new("out.docx")).is_err());
    }
}
