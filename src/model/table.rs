//! Table, Row, and Cell data structures

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::schema::{CellType, Column};

/// A cell value with type information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// The type tag for this value
    pub fn cell_type(&self) -> CellType {
        match self {
            CellValue::Null => CellType::Null,
            CellValue::Bool(_) => CellType::Bool,
            CellValue::Int(_) => CellType::Int,
            CellValue::Float(_) => CellType::Float,
            CellValue::String(_) => CellType::String,
            CellValue::Date(_) => CellType::Date,
            CellValue::DateTime(_) => CellType::DateTime,
        }
    }

    /// Render the value for text output; null becomes the empty string.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::String(s) => s.clone(),
            CellValue::Date(d) => d.to_string(),
            CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Null => write!(f, "NULL"),
            other => write!(f, "{}", other.to_text()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl<T> From<Option<T>> for CellValue
where
    T: Into<CellValue>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Null,
        }
    }
}

/// A row in the table
#[derive(Debug, Clone)]
pub struct Row {
    /// Cell values in column order
    pub cells: Vec<CellValue>,
    /// Original line/row number in source file (1-indexed)
    pub source_line: usize,
}

impl Row {
    pub fn new(cells: Vec<CellValue>, source_line: usize) -> Self {
        Self { cells, source_line }
    }

    /// Get a cell value by column index
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }

    /// True when every cell in the row is null
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(CellValue::is_null)
    }
}

/// A named table containing columns and rows, the interchange structure
/// between file readers and the database layer.
#[derive(Debug)]
pub struct Table {
    /// Table name used as the SQL destination
    pub name: String,
    /// Column definitions
    pub columns: Vec<Column>,
    /// All rows in the table
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a new empty table with column definitions
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Add a row, padding short rows with nulls to the column count.
    pub fn add_row(&mut self, mut cells: Vec<CellValue>, source_line: usize) {
        if cells.len() < self.columns.len() {
            cells.resize(self.columns.len(), CellValue::Null);
        }
        self.rows.push(Row::new(cells, source_line));
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Column names in order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Count rows where every cell is null
    pub fn empty_row_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_empty()).count()
    }

    /// Infer column types by widening over every row.
    pub fn infer_column_types(&mut self) {
        for col_idx in 0..self.columns.len() {
            let mut inferred = CellType::Null;
            for row in &self.rows {
                if let Some(cell) = row.get(col_idx) {
                    inferred = inferred.widen(cell.cell_type());
                }
            }
            self.columns[col_idx].inferred_type = inferred;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<Column> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| Column::new(*n, i))
            .collect()
    }

    #[test]
    fn short_rows_are_padded() {
        let mut table = Table::new("t", columns(&["a", "b", "c"]));
        table.add_row(vec![CellValue::Int(1)], 2);
        assert_eq!(table.rows[0].cells.len(), 3);
        assert!(table.rows[0].cells[2].is_null());
    }

    #[test]
    fn empty_rows_are_counted() {
        let mut table = Table::new("t", columns(&["a", "b"]));
        table.add_row(vec![CellValue::Null, CellValue::Null], 2);
        table.add_row(vec![CellValue::Int(5), CellValue::Null], 3);
        assert_eq!(table.empty_row_count(), 1);
    }

    #[test]
    fn infer_types_widens_over_rows() {
        let mut table = Table::new("t", columns(&["n", "s"]));
        table.add_row(vec![CellValue::Int(1), CellValue::from("x")], 2);
        table.add_row(vec![CellValue::Float(1.5), CellValue::Null], 3);
        table.infer_column_types();
        assert_eq!(table.columns[0].inferred_type, CellType::Float);
        assert_eq!(table.columns[1].inferred_type, CellType::String);
    }
}
