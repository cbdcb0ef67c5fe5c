//! Excel workbook reader (xlsx, xls, ods)

use std::collections::HashSet;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use tracing::info;

use crate::config::ReadOptions;
use crate::error::{Result, TabportError};
use crate::model::{CellValue, Column, Table};
use crate::sql::{sanitize_column_name, unique_name};

use super::{table_name_for, TableReader};

/// Reader for Excel workbooks
pub struct ExcelReader;

impl TableReader for ExcelReader {
    fn read(&self, path: &Path, options: &ReadOptions) -> Result<Table> {
        let mut workbook = open_workbook_auto(path)?;

        let sheet_name = match options.sheet {
            Some(ref name) => name.clone(),
            None => {
                let sheets = workbook.sheet_names();
                sheets
                    .first()
                    .cloned()
                    .ok_or_else(|| TabportError::InvalidTable("workbook has no sheets".into()))?
            }
        };

        let range: Range<Data> = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| TabportError::file_read(path, "read sheet from", e))?;

        let table = range_to_table(range, table_name_for(path, options))?;
        info!(
            file = %path.display(),
            sheet = %sheet_name,
            rows = table.row_count(),
            "read Excel sheet"
        );
        Ok(table)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext, "xlsx" | "xls" | "xlsm" | "ods")
    }
}

fn range_to_table(range: Range<Data>, name: String) -> Result<Table> {
    let mut rows = range.rows();

    let header_row = rows
        .next()
        .ok_or_else(|| TabportError::InvalidTable("sheet is empty".into()))?;

    let mut seen = HashSet::new();
    let columns: Vec<Column> = header_row
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let raw = cell_to_string(cell);
            let clean = sanitize_column_name(&raw);
            Column::new(unique_name(&clean, &mut seen), i)
        })
        .collect();

    let mut table = Table::new(name, columns);

    for (idx, row) in rows.enumerate() {
        let cells: Vec<CellValue> = row.iter().map(convert_cell).collect();
        table.add_row(cells, idx + 2); // +2: 1-indexed, after header
    }

    if table.rows.is_empty() {
        return Err(TabportError::InvalidTable(
            "sheet contains a header but no data rows".into(),
        ));
    }

    table.infer_column_types();
    Ok(table)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => format!("{}", dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{:?}", e),
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => {
            if s.trim().is_empty() {
                CellValue::Null
            } else {
                CellValue::String(s.trim().to_string())
            }
        }
        Data::Float(f) => {
            // Whole-valued floats come back as integers
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                CellValue::Int(*f as i64)
            } else {
                CellValue::Float(*f)
            }
        }
        Data::Int(i) => CellValue::Int(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => {
            let s = format!("{}", dt);
            if let Ok(datetime) = chrono::NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S%.f")
            {
                CellValue::DateTime(datetime)
            } else if let Ok(date) = chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
                CellValue::Date(date)
            } else {
                CellValue::String(s)
            }
        }
        Data::DateTimeIso(s) => {
            if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                CellValue::DateTime(dt)
            } else if let Ok(d) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                CellValue::Date(d)
            } else {
                CellValue::String(s.clone())
            }
        }
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(format!("#{:?}", e)),
    }
}
