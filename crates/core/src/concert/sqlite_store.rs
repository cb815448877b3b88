//! SQLite-backed concert store implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, types::Type, Connection, ErrorCode};

use super::{stored_precision, Concert, ConcertStore, NewConcert, StoreError};

const SELECT_COLUMNS: &str = "SELECT id, name, band, concert_date, is_deleted FROM concerts";

/// SQLite-backed concert store.
///
/// Ticket availability has no column: it is decoration, not data.
pub struct SqliteConcertStore {
    conn: Mutex<Connection>,
}

impl SqliteConcertStore {
    /// Create a new SQLite concert store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite concert store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS concerts (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                band TEXT NOT NULL,
                concert_date TEXT NOT NULL,
                is_deleted INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_concerts_name ON concerts(name);
            CREATE INDEX IF NOT EXISTS idx_concerts_date ON concerts(concert_date);
            "#,
        )
        .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Database("connection lock poisoned".to_string()))
    }

    fn row_to_concert(row: &rusqlite::Row) -> rusqlite::Result<Concert> {
        let id: String = row.get(0)?;
        let name: String = row.get(1)?;
        let band: String = row.get(2)?;
        let concert_date_str: String = row.get(3)?;
        let is_deleted: bool = row.get(4)?;

        let concert_date = DateTime::parse_from_rfc3339(&concert_date_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

        Ok(Concert {
            id,
            name,
            band,
            concert_date,
            available_tickets: None,
            is_deleted,
        })
    }

    fn query_concerts(
        conn: &Connection,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Concert>, StoreError> {
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let concerts = stmt
            .query_map(params, Self::row_to_concert)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(concerts)
    }
}

/// Fixed-width timestamps so that text ordering matches time ordering.
fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Build a LIKE pattern matching `fragment` anywhere, with wildcards escaped.
fn like_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl ConcertStore for SqliteConcertStore {
    async fn insert(&self, concert: NewConcert) -> Result<Concert, StoreError> {
        let conn = self.conn()?;

        let id = concert
            .id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let concert_date = stored_precision(concert.concert_date);

        let result = conn.execute(
            "INSERT INTO concerts (id, name, band, concert_date, is_deleted) VALUES (?, ?, ?, ?, 0)",
            params![id, concert.name, concert.band, format_date(&concert_date)],
        );

        match result {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                return Err(StoreError::Conflict(id));
            }
            Err(e) => return Err(StoreError::Database(e.to_string())),
        }

        Ok(Concert {
            id,
            name: concert.name,
            band: concert.band,
            concert_date,
            available_tickets: None,
            is_deleted: false,
        })
    }

    async fn find_all(&self) -> Result<Vec<Concert>, StoreError> {
        let conn = self.conn()?;
        let sql = format!("{} ORDER BY concert_date ASC, id ASC", SELECT_COLUMNS);
        Self::query_concerts(&conn, &sql, params![])
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Concert>, StoreError> {
        let conn = self.conn()?;
        let sql = format!("{} WHERE id = ?", SELECT_COLUMNS);

        match conn.query_row(&sql, params![id], Self::row_to_concert) {
            Ok(concert) => Ok(Some(concert)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Database(e.to_string())),
        }
    }

    async fn find_by_name(&self, fragment: &str) -> Result<Vec<Concert>, StoreError> {
        let conn = self.conn()?;
        let sql = format!(
            "{} WHERE name LIKE ? ESCAPE '\\' ORDER BY concert_date ASC, id ASC",
            SELECT_COLUMNS
        );
        Self::query_concerts(&conn, &sql, params![like_pattern(fragment)])
    }

    async fn save(&self, concert: &Concert) -> Result<Concert, StoreError> {
        let conn = self.conn()?;
        let mut stored = concert.clone().undecorated();
        stored.concert_date = stored_precision(stored.concert_date);

        conn.execute(
            r#"
            INSERT INTO concerts (id, name, band, concert_date, is_deleted)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                band = excluded.band,
                concert_date = excluded.concert_date,
                is_deleted = excluded.is_deleted
            "#,
            params![
                stored.id,
                stored.name,
                stored.band,
                format_date(&stored.concert_date),
                stored.is_deleted,
            ],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(stored)
    }
}
