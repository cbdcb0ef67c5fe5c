//! SQLite persistence layer

use std::str::FromStr;

use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePool, SqliteRow};
use sqlx::{Row as _, Sqlite, TypeInfo, ValueRef};
use tracing::{debug, info};

use crate::error::{Result, TabportError};
use crate::model::{CellValue, Column, Person, Table};
use crate::sql::{create_table_sql, insert_sql, quote_ident, sanitize_table_name};

type SqlQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// Handle to the application database.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database, creating the file when missing.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;
        debug!(url = database_url, "connected to database");
        Ok(Self { pool })
    }

    /// Create the destination table if needed and insert every row.
    /// Runs in a single transaction; returns the number of rows written.
    pub async fn import_table(&self, table: &Table) -> Result<u64> {
        let create = create_table_sql(table);
        let insert = insert_sql(table);

        let mut tx = self.pool.begin().await?;
        sqlx::query(&create).execute(&mut *tx).await?;

        let mut written = 0u64;
        for row in &table.rows {
            let mut query = sqlx::query(&insert);
            for cell in &row.cells {
                query = bind_cell(query, cell);
            }
            written += query.execute(&mut *tx).await?.rows_affected();
        }
        tx.commit().await?;

        info!(table = %table.name, rows = written, "imported table");
        Ok(written)
    }

    /// Read an entire table back into the in-memory representation.
    pub async fn fetch_table(&self, name: &str) -> Result<Table> {
        let table_name = sanitize_table_name(name);

        let pragma = format!("PRAGMA table_info({})", quote_ident(&table_name));
        let info_rows = sqlx::query(&pragma).fetch_all(&self.pool).await?;
        if info_rows.is_empty() {
            return Err(TabportError::InvalidTable(format!(
                "table '{table_name}' does not exist"
            )));
        }

        let columns: Vec<Column> = info_rows
            .iter()
            .enumerate()
            .map(|(i, row)| Ok(Column::new(row.try_get::<String, _>("name")?, i)))
            .collect::<Result<_>>()?;

        let select = format!("SELECT * FROM {}", quote_ident(&table_name));
        let rows = sqlx::query(&select).fetch_all(&self.pool).await?;

        let mut table = Table::new(table_name, columns);
        for (idx, row) in rows.iter().enumerate() {
            let cells: Vec<CellValue> = (0..row.columns().len())
                .map(|i| decode_cell(row, i))
                .collect::<Result<_>>()?;
            table.add_row(cells, idx + 1);
        }
        table.infer_column_types();
        Ok(table)
    }

    /// Names of user tables in the database.
    pub async fn list_tables(&self) -> Result<Vec<String>> {
        let rows = sqlx::query(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("name").map_err(Into::into))
            .collect()
    }

    /// Create the typed demo table.
    pub async fn ensure_people_table(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS people (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                age INTEGER NOT NULL,
                sex TEXT NOT NULL,
                colour TEXT NOT NULL,
                height TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Insert demo records; returns the number written.
    pub async fn insert_people(&self, people: &[Person]) -> Result<u64> {
        self.ensure_people_table().await?;

        let mut tx = self.pool.begin().await?;
        let mut written = 0u64;
        for person in people {
            written += sqlx::query(
                "INSERT INTO people (name, age, sex, colour, height) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&person.name)
            .bind(person.age)
            .bind(&person.sex)
            .bind(&person.colour)
            .bind(&person.height)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }
        tx.commit().await?;

        info!(rows = written, "imported people records");
        Ok(written)
    }

    /// All demo records, ordered by id.
    pub async fn list_people(&self) -> Result<Vec<Person>> {
        self.ensure_people_table().await?;
        let people = sqlx::query_as::<_, Person>(
            "SELECT id, name, age, sex, colour, height FROM people ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(people)
    }

    /// Update one field of one demo record. The field name is checked
    /// against the known columns before any SQL is built.
    pub async fn update_person_field(&self, id: i64, field: &str, value: &str) -> Result<u64> {
        let sql = match field {
            "name" => "UPDATE people SET name = ? WHERE id = ?",
            "age" => "UPDATE people SET age = ? WHERE id = ?",
            "sex" => "UPDATE people SET sex = ? WHERE id = ?",
            "colour" => "UPDATE people SET colour = ? WHERE id = ?",
            "height" => "UPDATE people SET height = ? WHERE id = ?",
            other => {
                return Err(TabportError::InvalidTable(format!(
                    "unknown person field '{other}'"
                )))
            }
        };

        let query = if field == "age" {
            let age: i64 = value.trim().parse().map_err(|_| {
                TabportError::InvalidTable(format!("age must be an integer, got '{value}'"))
            })?;
            sqlx::query(sql).bind(age)
        } else {
            sqlx::query(sql).bind(value.to_string())
        };

        let affected = query.bind(id).execute(&self.pool).await?.rows_affected();
        Ok(affected)
    }
}

fn bind_cell<'q>(query: SqlQuery<'q>, cell: &'q CellValue) -> SqlQuery<'q> {
    match cell {
        CellValue::Null => query.bind(Option::<String>::None),
        CellValue::Bool(b) => query.bind(*b),
        CellValue::Int(i) => query.bind(*i),
        CellValue::Float(f) => query.bind(*f),
        CellValue::String(s) => query.bind(s.as_str()),
        CellValue::Date(d) => query.bind(*d),
        CellValue::DateTime(dt) => query.bind(*dt),
    }
}

/// Decode one stored value by its SQLite storage class.
fn decode_cell(row: &SqliteRow, idx: usize) -> Result<CellValue> {
    let raw = row.try_get_raw(idx)?;
    if raw.is_null() {
        return Ok(CellValue::Null);
    }

    let cell = match raw.type_info().name() {
        "INTEGER" | "BOOLEAN" => CellValue::Int(row.try_get::<i64, _>(idx)?),
        "REAL" => CellValue::Float(row.try_get::<f64, _>(idx)?),
        "BLOB" => {
            let bytes: Vec<u8> = row.try_get(idx)?;
            CellValue::String(String::from_utf8_lossy(&bytes).into_owned())
        }
        _ => CellValue::String(row.try_get::<String, _>(idx)?),
    };
    Ok(cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellType;

    async fn test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("test.db").display());
        let db = Database::connect(&url).await.unwrap();
        (dir, db)
    }

    fn sample_table() -> Table {
        let mut table = Table::new(
            "imported",
            vec![
                Column::new("name", 0),
                Column::new("score", 1),
                Column::new("note", 2),
            ],
        );
        table.add_row(
            vec![
                CellValue::from("ann"),
                CellValue::Int(10),
                CellValue::Null,
            ],
            2,
        );
        table.add_row(
            vec![
                CellValue::from("bob"),
                CellValue::Float(11.5),
                CellValue::from("late"),
            ],
            3,
        );
        table.infer_column_types();
        table
    }

    #[tokio::test]
    async fn import_and_fetch_round_trip() {
        let (_dir, db) = test_db().await;
        let table = sample_table();

        let written = db.import_table(&table).await.unwrap();
        assert_eq!(written, 2);

        let fetched = db.fetch_table("imported").await.unwrap();
        assert_eq!(fetched.column_names(), vec!["name", "score", "note"]);
        assert_eq!(fetched.row_count(), 2);
        assert_eq!(fetched.rows[0].cells[0], CellValue::from("ann"));
        assert!(fetched.rows[0].cells[2].is_null());
        assert_eq!(fetched.columns[1].inferred_type, CellType::Float);
    }

    #[tokio::test]
    async fn import_is_append_on_existing_table() {
        let (_dir, db) = test_db().await;
        let table = sample_table();
        db.import_table(&table).await.unwrap();
        db.import_table(&table).await.unwrap();
        assert_eq!(db.fetch_table("imported").await.unwrap().row_count(), 4);
    }

    #[tokio::test]
    async fn list_tables_sees_imports() {
        let (_dir, db) = test_db().await;
        db.import_table(&sample_table()).await.unwrap();
        let tables = db.list_tables().await.unwrap();
        assert!(tables.contains(&"imported".to_string()));
    }

    #[tokio::test]
    async fn fetch_missing_table_errors() {
        let (_dir, db) = test_db().await;
        assert!(db.fetch_table("nope").await.is_err());
    }

    #[tokio::test]
    async fn people_insert_list_update() {
        let (_dir, db) = test_db().await;
        let people = vec![Person {
            id: 0,
            name: "Jo".into(),
            age: 30,
            sex: "F".into(),
            colour: "green".into(),
            height: "170cm".into(),
        }];

        assert_eq!(db.insert_people(&people).await.unwrap(), 1);

        let listed = db.list_people().await.unwrap();
        assert_eq!(listed.len(), 1);
        let id = listed[0].id;

        assert_eq!(db.update_person_field(id, "age", "31").await.unwrap(), 1);
        assert_eq!(db.list_people().await.unwrap()[0].age, 31);

        assert!(db.update_person_field(id, "bogus", "x").await.is_err());
        assert!(db.update_person_field(id, "age", "old").await.is_err());
    }
}
