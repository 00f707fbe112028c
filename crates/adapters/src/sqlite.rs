//! Embedded SQL driver backed by SQLite.
//!
//! Serves both relational adapter variants in dev and test setups; SQLite
//! accepts both `$n` and `?` placeholder styles with positional binding.
//! Database operations run on a background thread via tokio-rusqlite.

use std::path::Path;

use async_trait::async_trait;
use tokio_rusqlite::{Connection, rusqlite};

use crate::driver::{DriverError, SqlDriver, SqlRow, SqlValue};

/// SQLite-backed implementation of [`SqlDriver`].
#[derive(Clone)]
pub struct SqliteDriver {
    conn: Connection,
}

impl SqliteDriver {
    /// Open a database at the specified path, creating it if absent.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, DriverError> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| DriverError::Unavailable(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Open an in-memory database for testing.
    pub async fn open_in_memory() -> Result<Self, DriverError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| DriverError::Unavailable(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Execute a statement batch, for schema setup and seeding.
    pub async fn execute_batch(&self, sql: &str) -> Result<(), DriverError> {
        let sql = sql.to_string();
        self.conn
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch(&sql)?;
                Ok(())
            })
            .await
            .map_err(|e| DriverError::Query(e.to_string()))
    }
}

fn to_sqlite(value: &SqlValue) -> rusqlite::types::Value {
    use rusqlite::types::Value;
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Bool(b) => Value::Integer(i64::from(*b)),
        SqlValue::Int(i) => Value::Integer(*i),
        SqlValue::Float(f) => Value::Real(*f),
        SqlValue::Text(s) => Value::Text(s.clone()),
        SqlValue::Timestamp(ts) => Value::Text(ts.to_rfc3339()),
    }
}

fn from_sqlite(value: rusqlite::types::ValueRef<'_>) -> SqlValue {
    use rusqlite::types::ValueRef;
    match value {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Integer(i) => SqlValue::Int(i),
        ValueRef::Real(f) => SqlValue::Float(f),
        ValueRef::Text(t) => SqlValue::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => SqlValue::Text(String::from_utf8_lossy(b).into_owned()),
    }
}

#[async_trait]
impl SqlDriver for SqliteDriver {
    async fn run(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<SqlRow>, DriverError> {
        let sql = sql.to_string();
        let params: Vec<rusqlite::types::Value> = params.iter().map(to_sqlite).collect();

        self.conn
            .call(move |conn| -> Result<Vec<SqlRow>, rusqlite::Error> {
                let mut stmt = conn.prepare(&sql)?;
                let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

                let mut rows = stmt.query(rusqlite::params_from_iter(params))?;
                let mut out = Vec::new();
                while let Some(row) = rows.next()? {
                    let mut record = SqlRow::with_capacity(columns.len());
                    for (i, column) in columns.iter().enumerate() {
                        record.push((column.clone(), from_sqlite(row.get_ref(i)?)));
                    }
                    out.push(record);
                }
                Ok(out)
            })
            .await
            .map_err(|e| DriverError::Query(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded_driver() -> SqliteDriver {
        let driver = SqliteDriver::open_in_memory().await.unwrap();
        driver
            .execute_batch(
                "CREATE TABLE users (username TEXT, role TEXT, created_at TEXT);
                 INSERT INTO users VALUES ('alice', 'admin', '2024-01-01T00:00:00+00:00');
                 INSERT INTO users VALUES ('bob', 'viewer', '2024-02-01T00:00:00+00:00');",
            )
            .await
            .unwrap();
        driver
    }

    #[tokio::test]
    async fn test_parameterized_select() {
        let driver = seeded_driver().await;

        let rows = driver
            .run("SELECT * FROM users WHERE username = $1", &[SqlValue::Text("alice".into())])
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], ("username".to_string(), SqlValue::Text("alice".into())));
        assert_eq!(rows[0][1], ("role".to_string(), SqlValue::Text("admin".into())));
    }

    #[tokio::test]
    async fn test_question_mark_placeholders() {
        let driver = seeded_driver().await;

        let rows = driver
            .run("SELECT username FROM users WHERE role = ?", &[SqlValue::Text("viewer".into())])
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0].1, SqlValue::Text("bob".into()));
    }

    #[tokio::test]
    async fn test_no_match_returns_empty() {
        let driver = seeded_driver().await;
        let rows = driver
            .run("SELECT * FROM users WHERE username = $1", &[SqlValue::Text("nobody".into())])
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_bad_sql_is_query_error() {
        let driver = seeded_driver().await;
        let err = driver.run("SELECT * FROM missing_table", &[]).await.unwrap_err();
        assert!(matches!(err, DriverError::Query(_)));
    }
}
