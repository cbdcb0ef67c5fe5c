//! Excel export

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};
use tracing::info;

use crate::error::Result;
use crate::model::{CellValue, Table};

use super::TableWriter;

/// Writer producing a single-sheet xlsx workbook
pub struct ExcelWriter;

impl TableWriter for ExcelWriter {
    fn write(&self, table: &Table, path: &Path) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        let header_format = Format::new().set_bold();
        for (col_idx, column) in table.columns.iter().enumerate() {
            worksheet.write_string_with_format(0, col_idx as u16, &column.name, &header_format)?;
        }

        for (row_idx, row) in table.rows.iter().enumerate() {
            let out_row = (row_idx + 1) as u32;
            for (col_idx, cell) in row.cells.iter().enumerate() {
                let col = col_idx as u16;
                match cell {
                    CellValue::Null => {}
                    CellValue::Bool(b) => {
                        worksheet.write_boolean(out_row, col, *b)?;
                    }
                    CellValue::Int(i) => {
                        worksheet.write_number(out_row, col, *i as f64)?;
                    }
                    CellValue::Float(f) => {
                        worksheet.write_number(out_row, col, *f)?;
                    }
                    other => {
                        worksheet.write_string(out_row, col, other.to_text())?;
                    }
                }
            }
        }

        workbook.save(path)?;
        info!(file = %path.display(), rows = table.row_count(), "wrote Excel file");
        Ok(())
    }

    fn supports_extension(&self, ext: &str) -> bool {
        ext == "xlsx"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;

    #[test]
    fn writes_a_loadable_workbook() {
        let mut table = Table::new("t", vec![Column::new("a", 0), Column::new("b", 1)]);
        table.add_row(vec![CellValue::Int(1), CellValue::from("x")], 2);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        ExcelWriter.write(&table, &path).unwrap();

        // xlsx is a ZIP container
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[0..4], b"PK\x03\x04");
    }
}
