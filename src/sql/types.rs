//! SQL type mapping and statement building

use serde::Serialize;

use crate::model::{CellType, Table};

use super::ident::{sanitize_column_name, sanitize_table_name};

/// SQLite column type used when materializing an imported table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SqlType {
    Integer,
    Real,
    Boolean,
    Date,
    DateTime,
    Text,
}

impl SqlType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlType::Integer => "INTEGER",
            SqlType::Real => "REAL",
            SqlType::Boolean => "BOOLEAN",
            SqlType::Date => "DATE",
            SqlType::DateTime => "DATETIME",
            SqlType::Text => "TEXT",
        }
    }
}

impl From<CellType> for SqlType {
    fn from(t: CellType) -> Self {
        match t {
            CellType::Int => SqlType::Integer,
            CellType::Float => SqlType::Real,
            CellType::Bool => SqlType::Boolean,
            CellType::Date => SqlType::Date,
            CellType::DateTime => SqlType::DateTime,
            CellType::Null | CellType::String | CellType::Mixed => SqlType::Text,
        }
    }
}

impl std::fmt::Display for SqlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quote an identifier for SQLite.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Build a `CREATE TABLE IF NOT EXISTS` statement for the table's columns
/// and inferred types.
pub fn create_table_sql(table: &Table) -> String {
    let table_name = sanitize_table_name(&table.name);
    let columns: Vec<String> = table
        .columns
        .iter()
        .map(|col| {
            let name = sanitize_column_name(&col.name);
            let sql_type = SqlType::from(col.inferred_type);
            format!("{} {}", quote_ident(&name), sql_type)
        })
        .collect();

    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quote_ident(&table_name),
        columns.join(", ")
    )
}

/// Build a parameterized INSERT statement matching the table's columns.
pub fn insert_sql(table: &Table) -> String {
    let table_name = sanitize_table_name(&table.name);
    let columns: Vec<String> = table
        .columns
        .iter()
        .map(|c| quote_ident(&sanitize_column_name(&c.name)))
        .collect();
    let placeholders: Vec<&str> = table.columns.iter().map(|_| "?").collect();

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(&table_name),
        columns.join(", "),
        placeholders.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellValue, Column};

    fn sample_table() -> Table {
        let mut table = Table::new(
            "daily report",
            vec![Column::new("id", 0), Column::new("amount", 1)],
        );
        table.add_row(vec![CellValue::Int(1), CellValue::Float(9.5)], 2);
        table.infer_column_types();
        table
    }

    #[test]
    fn create_statement_uses_inferred_types() {
        let sql = create_table_sql(&sample_table());
        assert_eq!(
            sql,
            "CREATE TABLE IF NOT EXISTS \"daily_report\" (\"id\" INTEGER, \"amount\" REAL)"
        );
    }

    #[test]
    fn insert_statement_is_parameterized() {
        let sql = insert_sql(&sample_table());
        assert_eq!(
            sql,
            "INSERT INTO \"daily_report\" (\"id\", \"amount\") VALUES (?, ?)"
        );
    }

    #[test]
    fn mixed_and_null_map_to_text() {
        assert_eq!(SqlType::from(CellType::Mixed), SqlType::Text);
        assert_eq!(SqlType::from(CellType::Null), SqlType::Text);
    }
}
