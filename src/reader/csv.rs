//! Delimited text reader built on the hand-rolled line scanner

use std::path::Path;

use tracing::info;

use crate::config::ReadOptions;
use crate::convert::rows_to_table;
use crate::error::Result;
use crate::model::Table;

use super::line::read_rows;
use super::{table_name_for, TableReader};

/// Reader for CSV/TSV files
pub struct CsvReader;

impl TableReader for CsvReader {
    fn read(&self, path: &Path, options: &ReadOptions) -> Result<Table> {
        let delimiter = match path.extension().and_then(|e| e.to_str()) {
            Some("tsv") => '\t',
            _ => options.delimiter,
        };

        let rows = read_rows(path, delimiter)?;
        let table = rows_to_table(&table_name_for(path, options), &rows)?;

        info!(
            file = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            "read delimited file"
        );
        Ok(table)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext, "csv" | "tsv" | "txt")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellType, CellValue};
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        tmp.write_all(content.as_bytes()).unwrap();
        tmp.flush().unwrap();
        tmp
    }

    #[test]
    fn reads_quoted_fields_and_infers_types() {
        let tmp = write_csv("name,age,city\n\"Doe, Jane\",34,Leeds\nSam,28,\"York\"\n");
        let table = CsvReader.read(tmp.path(), &ReadOptions::default()).unwrap();

        assert_eq!(table.column_names(), vec!["name", "age", "city"]);
        assert_eq!(table.rows[0].cells[0], CellValue::from("Doe, Jane"));
        assert_eq!(table.columns[1].inferred_type, CellType::Int);
    }

    #[test]
    fn short_rows_are_null_padded() {
        let tmp = write_csv("a,b,c\n1,2\n");
        let table = CsvReader.read(tmp.path(), &ReadOptions::default()).unwrap();
        assert!(table.rows[0].cells[2].is_null());
    }

    #[test]
    fn empty_file_is_an_error() {
        let tmp = write_csv("");
        assert!(CsvReader.read(tmp.path(), &ReadOptions::default()).is_err());
    }

    #[test]
    fn header_only_file_is_an_error() {
        let tmp = write_csv("a,b\n");
        assert!(CsvReader.read(tmp.path(), &ReadOptions::default()).is_err());
    }
}
