//! SQLite destination store.
//!
//! The destination's own primary-key constraint is the collision safety
//! mechanism under concurrent uploads: inserts run with
//! `ON CONFLICT DO NOTHING` and report absorbed collisions per batch.

use std::collections::BTreeSet;
use std::path::Path;

use rusqlite::{Connection, types::Value};
use tracing::{debug, info};

use fieldmap_model::{CellValue, CleanedRow, FieldType, TableSchema, TargetField};

use crate::error::{Result, StoreError};
use crate::{InsertOutcome, KeyStore};

/// Store bound to one destination table.
pub struct SqliteStore {
    conn: Connection,
    schema: TableSchema,
}

impl SqliteStore {
    /// Opens (or creates) the database file and ensures the destination
    /// table exists with the schema's shape.
    pub fn open(path: impl AsRef<Path>, schema: TableSchema) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn, schema)
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory(schema: TableSchema) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, schema)
    }

    fn with_connection(conn: Connection, schema: TableSchema) -> Result<Self> {
        validate_table_name(schema.table())?;
        let store = Self { conn, schema };
        store.ensure_table()?;
        store.verify_table_shape()?;
        Ok(store)
    }

    /// `CREATE TABLE IF NOT EXISTS` for the bound schema.
    fn ensure_table(&self) -> Result<()> {
        let columns: Vec<String> = self
            .schema
            .fields()
            .iter()
            .map(|field| {
                let mut column = format!("{} {}", field.name, sql_type(field.field_type));
                if field.is_primary_key {
                    column.push_str(" PRIMARY KEY");
                }
                column
            })
            .collect();
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.schema.table(),
            columns.join(", ")
        );
        debug!(table = self.schema.table(), "ensuring destination table");
        self.conn.execute(&ddl, [])?;
        Ok(())
    }

    /// A pre-existing destination table must match the bound schema, field
    /// for field. A mismatched table would silently null out or mistype
    /// columns on insert, so the open fails instead.
    fn verify_table_shape(&self) -> Result<()> {
        let derived = Self::schema_of(&self.conn, self.schema.table())?;
        if derived != self.schema {
            return Err(StoreError::InvalidSchema(format!(
                "existing table '{}' does not match the expected shape",
                self.schema.table()
            )));
        }
        Ok(())
    }

    /// Reads the shape of an existing table back as a [`TableSchema`].
    ///
    /// Mirrors what `DESCRIBE` gave the original service; backs the
    /// pre-existing-destination check in [`SqliteStore::open`].
    pub fn schema_of(conn: &Connection, table: &str) -> Result<TableSchema> {
        validate_table_name(table)?;
        let mut statement = conn.prepare(&format!("PRAGMA table_info({table})"))?;
        let mut rows = statement.query([])?;
        let mut fields = Vec::new();
        while let Some(row) = rows.next()? {
            let name: String = row.get("name")?;
            let declared: String = row.get("type")?;
            let pk: i64 = row.get("pk")?;
            let field_type =
                declared
                    .parse::<FieldType>()
                    .map_err(|_| StoreError::UnsupportedType {
                        column: name.clone(),
                        column_type: declared,
                    })?;
            let mut field = TargetField::new(name, field_type);
            if pk > 0 {
                field = field.primary_key();
            }
            fields.push(field);
        }
        TableSchema::new(table, fields).map_err(|err| StoreError::InvalidSchema(err.to_string()))
    }
}

impl KeyStore for SqliteStore {
    fn existing_keys(&mut self) -> Result<BTreeSet<String>> {
        let query = format!(
            "SELECT CAST({} AS TEXT) FROM {}",
            self.schema.primary_key().name,
            self.schema.table()
        );
        let mut statement = self.conn.prepare(&query)?;
        let keys = statement
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<BTreeSet<String>>>()?;
        Ok(keys)
    }

    fn insert_rows(&mut self, rows: &[CleanedRow]) -> Result<InsertOutcome> {
        let fields = self.schema.fields();
        let column_list: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        let placeholders: Vec<String> = (1..=fields.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT({}) DO NOTHING",
            self.schema.table(),
            column_list.join(", "),
            placeholders.join(", "),
            self.schema.primary_key().name
        );

        let mut outcome = InsertOutcome::default();
        let tx = self.conn.transaction()?;
        {
            let mut statement = tx.prepare(&sql)?;
            for row in rows {
                let params: Vec<Value> = fields
                    .iter()
                    .map(|field| bind_value(row.values.get(&field.name)))
                    .collect();
                let changed = statement.execute(rusqlite::params_from_iter(params))?;
                if changed == 0 {
                    outcome.collided += 1;
                } else {
                    outcome.inserted += 1;
                }
            }
        }
        tx.commit()?;
        info!(
            table = self.schema.table(),
            inserted = outcome.inserted,
            collided = outcome.collided,
            "batch insert committed"
        );
        Ok(outcome)
    }
}

fn sql_type(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Text => "TEXT",
        FieldType::Float => "REAL",
        FieldType::Integer => "INTEGER",
        FieldType::Timestamp => "TIMESTAMP",
    }
}

fn bind_value(value: Option<&CellValue>) -> Value {
    match value {
        Some(CellValue::Text(s)) => Value::Text(s.clone()),
        Some(CellValue::Integer(n)) => Value::Integer(*n),
        Some(CellValue::Float(x)) => Value::Real(*x),
        Some(CellValue::Timestamp(dt)) => Value::Text(dt.to_rfc3339()),
        Some(CellValue::Missing) | None => Value::Null,
    }
}

/// Table names are interpolated into SQL, so only plain identifiers pass.
fn validate_table_name(table: &str) -> Result<()> {
    let mut chars = table.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidTableName(table.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;

    use super::*;

    fn cleaned(key: &str, year: Option<i64>) -> CleanedRow {
        let mut values = BTreeMap::new();
        values.insert("client_id".to_string(), CellValue::Text(key.to_string()));
        values.insert(
            "year".to_string(),
            year.map_or(CellValue::Missing, CellValue::Integer),
        );
        values.insert("created_at".to_string(), CellValue::Timestamp(Utc::now()));
        CleanedRow {
            key: key.to_string(),
            values,
        }
    }

    #[test]
    fn creates_table_and_inserts() {
        let mut store = SqliteStore::open_in_memory(TableSchema::builtin("llm_mapping")).unwrap();
        let outcome = store
            .insert_rows(&[cleaned("1001", Some(2021)), cleaned("1002", None)])
            .unwrap();
        assert_eq!(outcome, InsertOutcome { inserted: 2, collided: 0 });
        assert_eq!(store.existing_keys().unwrap().len(), 2);
    }

    #[test]
    fn colliding_keys_are_absorbed_not_errors() {
        let mut store = SqliteStore::open_in_memory(TableSchema::builtin("llm_mapping")).unwrap();
        store.insert_rows(&[cleaned("1001", None)]).unwrap();
        let outcome = store
            .insert_rows(&[cleaned("1001", Some(2020)), cleaned("1002", None)])
            .unwrap();
        assert_eq!(outcome, InsertOutcome { inserted: 1, collided: 1 });
    }

    #[test]
    fn schema_round_trips_through_pragma() {
        let store = SqliteStore::open_in_memory(TableSchema::builtin("clients")).unwrap();
        let derived = SqliteStore::schema_of(&store.conn, "clients").unwrap();
        assert_eq!(derived.primary_key().name, "client_id");
        assert_eq!(derived.field("year").unwrap().field_type, FieldType::Integer);
        assert_eq!(
            derived.field("created_at").unwrap().field_type,
            FieldType::Timestamp
        );
    }

    #[test]
    fn rejects_existing_table_with_mismatched_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intake.db");
        {
            let narrow = TableSchema::new(
                "llm_mapping",
                vec![TargetField::new("client_id", FieldType::Text).primary_key()],
            )
            .unwrap();
            SqliteStore::open(&path, narrow).unwrap();
        }
        assert!(matches!(
            SqliteStore::open(&path, TableSchema::builtin("llm_mapping")),
            Err(StoreError::InvalidSchema(_))
        ));
    }

    #[test]
    fn rejects_hostile_table_names() {
        let schema = TableSchema::builtin("clients; DROP TABLE x");
        assert!(matches!(
            SqliteStore::open_in_memory(schema),
            Err(StoreError::InvalidTableName(_))
        ));
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intake.db");
        {
            let mut store =
                SqliteStore::open(&path, TableSchema::builtin("llm_mapping")).unwrap();
            store.insert_rows(&[cleaned("1001", Some(2021))]).unwrap();
        }
        let mut store = SqliteStore::open(&path, TableSchema::builtin("llm_mapping")).unwrap();
        assert!(store.existing_keys().unwrap().contains("1001"));
    }
}
