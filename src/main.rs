//! tabport - console import/export between tabular files and SQLite

mod ui;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use tabport::config::Settings;
use tabport::ops;
use tabport::report::Reporter;

/// Import and export tabular data between CSV, Excel, and PDF files and a
/// SQLite database.
#[derive(Parser, Debug)]
#[command(name = "tabport")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Override the configured database URL
    #[arg(long, global = true)]
    database: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a CSV, Excel, or PDF form file into the database
    Import {
        /// File to import
        file: PathBuf,
        /// Destination table name (defaults to the file stem)
        #[arg(short, long)]
        table: Option<String>,
        /// For Excel files: which sheet to read
        #[arg(long)]
        sheet: Option<String>,
    },
    /// Import several files, skipping any that fail
    Batch {
        /// Files to import
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Export a database table to CSV or Excel
    Export {
        /// Source table name
        table: String,
        /// Output file; the extension selects the format
        output: PathBuf,
    },
    /// Show metadata, validation findings, and inferred SQL types
    Inspect {
        /// File to analyze
        file: PathBuf,
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: InspectFormat,
    },
    /// Print the first rows of a file as a table
    Preview {
        /// File to preview
        file: PathBuf,
        /// Maximum number of rows to show
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Fill a PDF form template from the first row of a table
    FillForm {
        /// PDF template containing form fields
        template: PathBuf,
        /// Output PDF path
        output: PathBuf,
        /// Source table name
        #[arg(short, long)]
        table: String,
    },
    /// Typed demo records (name, age, sex, colour, height)
    People {
        #[command(subcommand)]
        command: PeopleCommand,
    },
}

#[derive(Subcommand, Debug)]
enum PeopleCommand {
    /// Import a file into the people table
    Import { file: PathBuf },
    /// List all people records
    List,
    /// Update one field of a record by id
    Edit {
        /// Record id
        id: i64,
        /// Field to change (name, age, sex, colour, height)
        field: String,
        /// New value
        value: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum InspectFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::load().context("failed to load configuration")?;
    if let Some(url) = cli.database {
        settings.database_url = url;
    }

    let reporter = Reporter::new();

    match cli.command {
        None => ui::run_menu(&settings, &reporter).await,
        Some(Command::Import { file, table, sheet }) => {
            ops::import_file(
                &settings,
                &reporter,
                &file,
                table.as_deref(),
                sheet.as_deref(),
            )
            .await
            .with_context(|| format!("failed to import {}", file.display()))
        }
        Some(Command::Batch { files }) => {
            ops::batch_import(&settings, &reporter, &files).await?;
            Ok(())
        }
        Some(Command::Export { table, output }) => {
            ops::export_table(&settings, &reporter, &table, &output)
                .await
                .with_context(|| format!("failed to export table '{table}'"))
        }
        Some(Command::Inspect { file, format }) => ops::inspect_file(
            &settings,
            &reporter,
            &file,
            matches!(format, InspectFormat::Json),
        )
        .with_context(|| format!("failed to inspect {}", file.display())),
        Some(Command::Preview { file, limit }) => {
            ops::preview_file(&settings, &file, limit)
                .with_context(|| format!("failed to preview {}", file.display()))
        }
        Some(Command::FillForm {
            template,
            output,
            table,
        }) => ops::export_pdf_form(&settings, &reporter, &table, &template, &output)
            .await
            .context("failed to fill PDF form"),
        Some(Command::People { command }) => match command {
            PeopleCommand::Import { file } => {
                ops::people_import(&settings, &reporter, &file).await?;
                Ok(())
            }
            PeopleCommand::List => {
                ops::people_list(&settings, &reporter).await?;
                Ok(())
            }
            PeopleCommand::Edit { id, field, value } => {
                ops::people_edit(&settings, &reporter, id, &field, &value).await?;
                Ok(())
            }
        },
    }
}
