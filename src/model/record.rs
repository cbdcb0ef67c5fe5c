//! Typed demo record for the `people` import path

use serde::{Deserialize, Serialize};

use crate::error::{Result, TabportError};

use super::table::{CellValue, Table};

/// The one strongly-typed entity in the system, used by the demo import:
/// a flat person record with name, age, sex, colour, and height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Person {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub sex: String,
    pub colour: String,
    pub height: String,
}

impl Person {
    /// Build records from a generic table whose columns include
    /// name, age, sex, colour, and height (case-insensitive).
    pub fn from_table(table: &Table) -> Result<Vec<Person>> {
        let find = |wanted: &str| -> Result<usize> {
            table
                .columns
                .iter()
                .position(|c| c.name.eq_ignore_ascii_case(wanted))
                .ok_or_else(|| {
                    TabportError::InvalidTable(format!("missing required column '{wanted}'"))
                })
        };

        let name_idx = find("name")?;
        let age_idx = find("age")?;
        let sex_idx = find("sex")?;
        let colour_idx = find("colour")?;
        let height_idx = find("height")?;

        table
            .rows
            .iter()
            .map(|row| {
                let age = match row.get(age_idx) {
                    Some(CellValue::Int(i)) => *i,
                    Some(other) => other.to_text().trim().parse().map_err(|_| {
                        TabportError::InvalidTable(format!(
                            "line {}: age must be an integer, got '{}'",
                            row.source_line,
                            other.to_text()
                        ))
                    })?,
                    None => {
                        return Err(TabportError::InvalidTable(format!(
                            "line {}: missing age value",
                            row.source_line
                        )))
                    }
                };

                let text = |idx: usize| {
                    row.get(idx)
                        .map(CellValue::to_text)
                        .unwrap_or_default()
                };

                Ok(Person {
                    id: 0,
                    name: text(name_idx),
                    age,
                    sex: text(sex_idx),
                    colour: text(colour_idx),
                    height: text(height_idx),
                })
            })
            .collect()
    }
}

impl std::fmt::Display for Person {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {} (age {}, {}, {}, {})",
            self.id, self.name, self.age, self.sex, self.colour, self.height
        )
    }
}
