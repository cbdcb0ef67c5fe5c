//! Conversion of raw string rows into a typed Table

use std::collections::HashSet;

use tracing::debug;

use crate::error::{Result, TabportError};
use crate::model::{CellValue, Column, Table};
use crate::sql::{sanitize_column_name, unique_name};

/// Convert parsed field rows (header first) into a typed table.
///
/// Headers are sanitized for SQL use and made unique; data cells are
/// trimmed, empty cells become null, and column types are inferred by
/// widening over all rows.
pub fn rows_to_table(name: &str, rows: &[(Vec<String>, usize)]) -> Result<Table> {
    if rows.len() < 2 {
        return Err(TabportError::InvalidTable(
            "file must contain a header row and at least one data row".into(),
        ));
    }

    let (header, _) = &rows[0];
    let mut table = Table::new(name, build_columns(header));

    for (fields, line) in &rows[1..] {
        let cells: Vec<CellValue> = fields.iter().map(|f| parse_cell(f)).collect();
        table.add_row(cells, *line);
    }

    table.infer_column_types();
    debug!(
        table = %table.name,
        rows = table.row_count(),
        columns = table.column_count(),
        "converted raw rows to table"
    );
    Ok(table)
}

/// Sanitize header names and resolve duplicates with numeric suffixes.
pub fn build_columns(headers: &[String]) -> Vec<Column> {
    let mut seen = HashSet::new();
    headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let clean = sanitize_column_name(header);
            Column::new(unique_name(&clean, &mut seen), i)
        })
        .collect()
}

/// Parse one raw cell into a typed value.
///
/// Empty, "null", and "NA" cells become null. Booleans, integers, floats,
/// and ISO dates/datetimes are recognized; everything else stays a string.
pub fn parse_cell(raw: &str) -> CellValue {
    let trimmed = raw.trim();

    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") || trimmed == "NA" {
        return CellValue::Null;
    }

    if trimmed.eq_ignore_ascii_case("true") {
        return CellValue::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return CellValue::Bool(false);
    }

    if let Ok(i) = trimmed.parse::<i64>() {
        return CellValue::Int(i);
    }

    if let Ok(f) = trimmed.parse::<f64>() {
        return CellValue::Float(f);
    }

    if let Ok(date) = chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return CellValue::Date(date);
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(trimmed, format) {
            return CellValue::DateTime(dt);
        }
    }

    CellValue::String(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellType;

    fn raw(rows: &[&[&str]]) -> Vec<(Vec<String>, usize)> {
        rows.iter()
            .enumerate()
            .map(|(i, fields)| (fields.iter().map(|s| s.to_string()).collect(), i + 1))
            .collect()
    }

    #[test]
    fn parse_cell_recognizes_types() {
        assert_eq!(parse_cell(""), CellValue::Null);
        assert_eq!(parse_cell("  NULL "), CellValue::Null);
        assert_eq!(parse_cell("NA"), CellValue::Null);
        assert_eq!(parse_cell("true"), CellValue::Bool(true));
        assert_eq!(parse_cell("42"), CellValue::Int(42));
        assert_eq!(parse_cell("3.25"), CellValue::Float(3.25));
        assert_eq!(parse_cell(" padded "), CellValue::from("padded"));
        assert!(matches!(parse_cell("2024-05-01"), CellValue::Date(_)));
        assert!(matches!(
            parse_cell("2024-05-01 10:30:00"),
            CellValue::DateTime(_)
        ));
    }

    #[test]
    fn duplicate_headers_get_suffixes() {
        let headers: Vec<String> = ["id", "id", "Id"].iter().map(|s| s.to_string()).collect();
        let cols = build_columns(&headers);
        assert_eq!(cols[0].name, "id");
        assert_eq!(cols[1].name, "id_1");
        assert_eq!(cols[2].name, "Id_2");
    }

    #[test]
    fn blank_header_becomes_placeholder() {
        let headers: Vec<String> = ["", "x"].iter().map(|s| s.to_string()).collect();
        let cols = build_columns(&headers);
        assert_eq!(cols[0].name, "col_unknown");
    }

    #[test]
    fn header_only_input_is_rejected() {
        let rows = raw(&[&["a", "b"]]);
        assert!(rows_to_table("t", &rows).is_err());
    }

    #[test]
    fn converts_and_infers() {
        let rows = raw(&[
            &["name", "score"],
            &["ann", "10"],
            &["bob", "11.5"],
            &["cam", ""],
        ]);
        let table = rows_to_table("t", &rows).unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.columns[1].inferred_type, CellType::Float);
        assert!(table.rows[2].cells[1].is_null());
    }
}
