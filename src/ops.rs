//! High-level operations shared by the CLI and the interactive menu

use std::path::Path;

use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::warn;

use crate::analyze::{file_metadata, infer_sql_types};
use crate::config::{ReadOptions, Settings};
use crate::db::Database;
use crate::error::Result;
use crate::model::{Person, Table};
use crate::reader::ReaderFactory;
use crate::report::Reporter;
use crate::writer::{fill_form, WriterFactory};

/// Import one file into the database.
pub async fn import_file(
    settings: &Settings,
    reporter: &Reporter,
    path: &Path,
    table_name: Option<&str>,
    sheet: Option<&str>,
) -> Result<()> {
    reporter.info(&format!("Reading {}", path.display()));

    let mut options = ReadOptions::default().with_delimiter(settings.delimiter);
    if let Some(name) = table_name {
        options = options.with_table_name(name);
    }
    if let Some(sheet) = sheet {
        options = options.with_sheet(sheet);
    }

    let table = ReaderFactory::new().read(path, &options)?;

    let empty_rows = table.empty_row_count();
    if empty_rows > 0 {
        reporter.warning(&format!("Found {empty_rows} empty rows in the input"));
    }

    let db = Database::connect(&settings.database_url).await?;
    let written = db.import_table(&table).await?;

    reporter.success(&format!(
        "Imported {} rows ({} columns) into table '{}'",
        written,
        table.column_count(),
        table.name
    ));
    Ok(())
}

/// Import several files, skipping the ones that fail.
/// Returns (succeeded, total).
pub async fn batch_import(
    settings: &Settings,
    reporter: &Reporter,
    files: &[std::path::PathBuf],
) -> Result<(usize, usize)> {
    reporter.info(&format!("Starting batch import of {} files", files.len()));

    let mut succeeded = 0;
    for path in files {
        match import_file(settings, reporter, path, None, None).await {
            Ok(()) => succeeded += 1,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "batch item failed");
                reporter.warning(&format!("Skipping {}: {}", path.display(), e));
            }
        }
    }

    reporter.success(&format!(
        "Batch complete: {succeeded}/{} files imported",
        files.len()
    ));
    Ok((succeeded, files.len()))
}

/// Export a database table to a file chosen by extension.
pub async fn export_table(
    settings: &Settings,
    reporter: &Reporter,
    table_name: &str,
    output: &Path,
) -> Result<()> {
    let db = Database::connect(&settings.database_url).await?;
    let table = db.fetch_table(table_name).await?;

    WriterFactory::new().write(&table, output)?;
    reporter.success(&format!(
        "Exported {} rows from '{}' to {}",
        table.row_count(),
        table.name,
        output.display()
    ));
    Ok(())
}

/// Fill a PDF form template from the first row of a database table.
pub async fn export_pdf_form(
    settings: &Settings,
    reporter: &Reporter,
    table_name: &str,
    template: &Path,
    output: &Path,
) -> Result<()> {
    let db = Database::connect(&settings.database_url).await?;
    let table = db.fetch_table(table_name).await?;

    let filled = fill_form(template, output, &table)?;
    reporter.success(&format!(
        "Filled {filled} form fields into {}",
        output.display()
    ));
    Ok(())
}

/// Show metadata and inferred SQL types for a delimited file.
pub fn inspect_file(
    settings: &Settings,
    reporter: &Reporter,
    path: &Path,
    as_json: bool,
) -> Result<()> {
    let metadata = file_metadata(path, settings.delimiter)?;
    let types = infer_sql_types(path, settings.delimiter, settings.sample_rows)?;

    if as_json {
        let doc = serde_json::json!({
            "metadata": &metadata,
            "sql_types": &types,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!("{metadata}");
    for error in &metadata.validation_errors {
        reporter.error(error);
    }
    for warning in &metadata.validation_warnings {
        reporter.warning(warning);
    }

    let mut builder = Builder::default();
    builder.push_record(["column", "sql type"]);
    for (name, sql_type) in &types {
        builder.push_record([name.as_str(), sql_type.as_str()]);
    }
    let mut rendered = builder.build();
    rendered.with(Style::sharp());
    println!("{rendered}");
    Ok(())
}

/// Print the first `limit` rows of a file as a console table.
pub fn preview_file(settings: &Settings, path: &Path, limit: usize) -> Result<()> {
    let options = ReadOptions::default().with_delimiter(settings.delimiter);
    let table = ReaderFactory::new().read(path, &options)?;
    println!("{}", render_table(&table, limit));
    Ok(())
}

/// Render a table's first rows with column headers.
pub fn render_table(table: &Table, limit: usize) -> String {
    let mut builder = Builder::default();
    builder.push_record(table.column_names());
    for row in table.rows.iter().take(limit) {
        builder.push_record(row.cells.iter().map(|c| c.to_text()));
    }
    let mut rendered = builder.build();
    rendered.with(Style::sharp());
    rendered.to_string()
}

/// Typed demo import: file rows become Person records in the people table.
pub async fn people_import(
    settings: &Settings,
    reporter: &Reporter,
    path: &Path,
) -> Result<()> {
    let options = ReadOptions::default().with_delimiter(settings.delimiter);
    let table = ReaderFactory::new().read(path, &options)?;
    let people = Person::from_table(&table)?;

    let db = Database::connect(&settings.database_url).await?;
    let written = db.insert_people(&people).await?;
    reporter.success(&format!("Imported {written} people records"));
    Ok(())
}

/// Update one field of a demo record.
pub async fn people_edit(
    settings: &Settings,
    reporter: &Reporter,
    id: i64,
    field: &str,
    value: &str,
) -> Result<()> {
    let db = Database::connect(&settings.database_url).await?;
    let updated = db.update_person_field(id, field, value).await?;

    if updated > 0 {
        reporter.success(&format!("Updated {field} for record {id}"));
    } else {
        reporter.warning(&format!("No record with id {id}"));
    }
    Ok(())
}

/// List the typed demo records.
pub async fn people_list(settings: &Settings, reporter: &Reporter) -> Result<()> {
    let db = Database::connect(&settings.database_url).await?;
    let people = db.list_people().await?;

    if people.is_empty() {
        reporter.info("No people records yet");
        return Ok(());
    }
    for person in &people {
        println!("{person}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellValue, Column};

    #[test]
    fn render_table_includes_header_and_rows() {
        let mut table = Table::new("t", vec![Column::new("a", 0), Column::new("b", 1)]);
        table.add_row(vec![CellValue::Int(1), CellValue::from("x")], 2);
        table.add_row(vec![CellValue::Int(2), CellValue::from("y")], 3);

        let rendered = render_table(&table, 1);
        assert!(rendered.contains('a'));
        assert!(rendered.contains('x'));
        assert!(!rendered.contains('y')); // beyond the limit
    }
}
