//! Configuration handling for tabport

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Application settings, merged from built-in defaults, an optional
/// `tabport.toml` in the working directory, and `TABPORT_*` environment
/// variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// SQLite connection string.
    pub database_url: String,
    /// Number of data rows sampled when inferring SQL column types.
    pub sample_rows: usize,
    /// Field delimiter used by the CSV scanner.
    pub delimiter: char,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://tabport.db".to_string(),
            sample_rows: 100,
            delimiter: ',',
        }
    }
}

impl Settings {
    /// Load settings from defaults, `tabport.toml`, and the environment.
    pub fn load() -> Result<Self> {
        let settings = Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file("tabport.toml"))
            .merge(Env::prefixed("TABPORT_"))
            .extract()?;
        Ok(settings)
    }
}

/// Per-operation options passed down to the file readers.
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Destination table name; readers use it to label the parsed table.
    pub table_name: Option<String>,
    /// For Excel files: which sheet to read (first sheet when unset).
    pub sheet: Option<String>,
    /// Field delimiter for delimited text.
    pub delimiter: char,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            table_name: None,
            sheet: None,
            delimiter: ',',
        }
    }
}

impl ReadOptions {
    pub fn with_table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = Some(name.into());
        self
    }

    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }
}
