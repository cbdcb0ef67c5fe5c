//! CSV export

use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::model::Table;

use super::TableWriter;

/// Writer producing RFC-style quoted CSV
pub struct CsvWriter;

/// The output delimiter follows the extension, matching the reader side.
fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    }
}

impl TableWriter for CsvWriter {
    fn write(&self, table: &Table, path: &Path) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter_for(path))
            .from_path(path)?;

        writer.write_record(table.column_names())?;
        for row in &table.rows {
            let record: Vec<String> = row.cells.iter().map(|c| c.to_text()).collect();
            writer.write_record(&record)?;
        }
        writer.flush()?;

        info!(file = %path.display(), rows = table.row_count(), "wrote CSV file");
        Ok(())
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext, "csv" | "tsv" | "txt")
    }
}
