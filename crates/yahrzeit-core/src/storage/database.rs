//! SQLite-backed entry storage.
//!
//! Dates are stored as text: `death_date` as `YYYY-MM-DD`, timestamps as
//! RFC 3339. The Hebrew fields are read leniently so damage there still loads
//! and is reported by the scheduler. Any other undecodable row is handed back
//! by [`EntryStore::scan`] as a [`CorruptRecord`] instead of failing the list.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{data_dir, migrations, CorruptRecord, EntryStore};
use crate::entry::YahrzeitEntry;
use crate::error::{DatabaseError, Result};

const SELECT_ENTRY: &str = "SELECT id, name, hebrew_name, death_date, hebrew_day, hebrew_month,
            hebrew_year, notify_days_before, created_at, updated_at
     FROM entries";

/// SQLite database for yahrzeit entries.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/yahrzeit/yahrzeit.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("yahrzeit.db");
        Self::open_at(&path)
    }

    /// Open (or create) a database file at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "opened entry database");
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        migrations::migrate(&conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<YahrzeitEntry> {
        let death_date: String = row.get(3)?;
        let created_at: String = row.get(8)?;
        let updated_at: String = row.get(9)?;

        Ok(YahrzeitEntry {
            id: row.get(0)?,
            name: row.get(1)?,
            hebrew_name: row.get(2)?,
            death_date: parse_date(3, &death_date)?,
            hebrew_day: small_int(row.get(4)?),
            hebrew_month: small_int(row.get(5)?),
            hebrew_year: hebrew_year(row.get(6)?),
            notify_days_before: row.get(7)?,
            created_at: parse_timestamp(8, &created_at)?,
            // Rows migrated from v1 may carry an empty updated_at.
            updated_at: if updated_at.is_empty() {
                parse_timestamp(8, &created_at)?
            } else {
                parse_timestamp(9, &updated_at)?
            },
        })
    }
}

/// Out-of-range or non-integer values become `u8::MAX`, which no month or
/// day uses.
fn small_int(value: Value) -> u8 {
    match value {
        Value::Integer(v) => u8::try_from(v).unwrap_or(u8::MAX),
        _ => u8::MAX,
    }
}

/// Unreadable years become 0, which is outside the Hebrew era.
fn hebrew_year(value: Value) -> i32 {
    match value {
        Value::Integer(v) => i32::try_from(v).unwrap_or(0),
        _ => 0,
    }
}

fn parse_date(column: usize, value: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

fn parse_timestamp(column: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

impl EntryStore for Database {
    fn insert(&self, entry: &YahrzeitEntry) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO entries (name, hebrew_name, death_date, hebrew_day, hebrew_month,
                                  hebrew_year, notify_days_before, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                entry.name,
                entry.hebrew_name,
                entry.death_date.format("%Y-%m-%d").to_string(),
                entry.hebrew_day,
                entry.hebrew_month,
                entry.hebrew_year,
                entry.notify_days_before,
                entry.created_at.to_rfc3339(),
                entry.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get(&self, id: i64) -> Result<Option<YahrzeitEntry>> {
        let entry = self
            .conn
            .query_row(
                &format!("{SELECT_ENTRY} WHERE id = ?1"),
                params![id],
                Self::row_to_entry,
            )
            .optional()?;
        Ok(entry)
    }

    /// Decodable entries only; see [`EntryStore::scan`] for the rest.
    fn list(&self) -> Result<Vec<YahrzeitEntry>> {
        Ok(self.scan()?.0)
    }

    fn scan(&self) -> Result<(Vec<YahrzeitEntry>, Vec<CorruptRecord>)> {
        let mut stmt = self.conn.prepare(&format!("{SELECT_ENTRY} ORDER BY id"))?;
        let mut rows = stmt.query([])?;

        let mut entries = Vec::new();
        let mut corrupt = Vec::new();
        while let Some(row) = rows.next()? {
            match Self::row_to_entry(row) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    let id: i64 = row.get(0)?;
                    tracing::warn!(entry_id = id, error = %e, "undecodable entry row");
                    corrupt.push(CorruptRecord {
                        id,
                        reason: format!("stored entry is unreadable: {e}"),
                    });
                }
            }
        }
        Ok((entries, corrupt))
    }

    fn update(&self, entry: &YahrzeitEntry) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE entries
             SET name = ?2, hebrew_name = ?3, death_date = ?4, hebrew_day = ?5,
                 hebrew_month = ?6, hebrew_year = ?7, notify_days_before = ?8,
                 updated_at = ?9
             WHERE id = ?1",
            params![
                entry.id,
                entry.name,
                entry.hebrew_name,
                entry.death_date.format("%Y-%m-%d").to_string(),
                entry.hebrew_day,
                entry.hebrew_month,
                entry.hebrew_year,
                entry.notify_days_before,
                entry.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(changed > 0)
    }

    fn delete(&self, id: i64) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM entries WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }
}
