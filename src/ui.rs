//! Interactive console menu

use std::path::PathBuf;

use anyhow::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};

use tabport::config::Settings;
use tabport::db::Database;
use tabport::ops;
use tabport::report::Reporter;

const MENU_ITEMS: &[&str] = &[
    "Import file (CSV / Excel / PDF form)",
    "Batch import files",
    "Inspect file",
    "Preview file",
    "Export table to CSV / Excel",
    "Fill PDF form from table",
    "People: import",
    "People: list",
    "People: edit record",
    "Exit",
];

/// Run the main menu loop until the user exits.
pub async fn run_menu(settings: &Settings, reporter: &Reporter) -> Result<()> {
    reporter.info("Welcome to tabport");

    loop {
        println!();
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Select an operation")
            .items(MENU_ITEMS)
            .default(0)
            .interact()?;

        let outcome = match choice {
            0 => import(settings, reporter).await,
            1 => batch(settings, reporter).await,
            2 => inspect(settings, reporter),
            3 => preview(settings),
            4 => export(settings, reporter).await,
            5 => fill_form(settings, reporter).await,
            6 => people_import(settings, reporter).await,
            7 => ops::people_list(settings, reporter)
                .await
                .map_err(Into::into),
            8 => people_edit(settings, reporter).await,
            _ => {
                reporter.info("Goodbye!");
                return Ok(());
            }
        };

        // A failed operation returns to the menu instead of exiting.
        if let Err(e) = outcome {
            reporter.error(&format!("Operation failed: {e:#}"));
        }
    }
}

fn prompt_path(prompt: &str) -> Result<PathBuf> {
    let raw: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .interact_text()?;
    Ok(PathBuf::from(raw.trim()))
}

fn prompt_string(prompt: &str) -> Result<String> {
    let raw: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .interact_text()?;
    Ok(raw.trim().to_string())
}

async fn import(settings: &Settings, reporter: &Reporter) -> Result<()> {
    let path = prompt_path("File to import")?;
    let table: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Destination table (blank for file stem)")
        .allow_empty(true)
        .interact_text()?;

    let table = table.trim();
    let table = (!table.is_empty()).then_some(table);
    ops::import_file(settings, reporter, &path, table, None).await?;
    Ok(())
}

async fn batch(settings: &Settings, reporter: &Reporter) -> Result<()> {
    let raw = prompt_string("Files to import (separated by spaces)")?;
    let files: Vec<PathBuf> = raw.split_whitespace().map(PathBuf::from).collect();
    if files.is_empty() {
        reporter.warning("No files given");
        return Ok(());
    }
    ops::batch_import(settings, reporter, &files).await?;
    Ok(())
}

fn inspect(settings: &Settings, reporter: &Reporter) -> Result<()> {
    let path = prompt_path("File to inspect")?;
    ops::inspect_file(settings, reporter, &path, false)?;
    Ok(())
}

fn preview(settings: &Settings) -> Result<()> {
    let path = prompt_path("File to preview")?;
    ops::preview_file(settings, &path, 10)?;
    Ok(())
}

async fn export(settings: &Settings, reporter: &Reporter) -> Result<()> {
    let db = Database::connect(&settings.database_url).await?;
    let tables = db.list_tables().await?;
    if tables.is_empty() {
        reporter.warning("The database has no tables yet");
        return Ok(());
    }

    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Table to export")
        .items(&tables)
        .default(0)
        .interact()?;
    let output = prompt_path("Output file (.csv or .xlsx)")?;

    ops::export_table(settings, reporter, &tables[choice], &output).await?;
    Ok(())
}

async fn fill_form(settings: &Settings, reporter: &Reporter) -> Result<()> {
    let template = prompt_path("PDF form template")?;
    let output = prompt_path("Output PDF")?;
    let table = prompt_string("Source table")?;
    ops::export_pdf_form(settings, reporter, &table, &template, &output).await?;
    Ok(())
}

async fn people_import(settings: &Settings, reporter: &Reporter) -> Result<()> {
    let path = prompt_path("File with people records")?;
    ops::people_import(settings, reporter, &path).await?;
    Ok(())
}

async fn people_edit(settings: &Settings, reporter: &Reporter) -> Result<()> {
    let db = Database::connect(&settings.database_url).await?;
    let people = db.list_people().await?;
    if people.is_empty() {
        reporter.warning("No people records to edit");
        return Ok(());
    }

    let labels: Vec<String> = people.iter().map(|p| p.to_string()).collect();
    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Record to edit")
        .items(&labels)
        .default(0)
        .interact()?;

    let fields = ["name", "age", "sex", "colour", "height"];
    let field = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Field to change")
        .items(&fields)
        .default(0)
        .interact()?;

    let value = prompt_string("New value")?;
    ops::people_edit(settings, reporter, people[choice].id, fields[field], &value).await?;
    Ok(())
}
