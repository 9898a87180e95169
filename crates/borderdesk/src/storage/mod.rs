//! Storage layer for borderdesk.
//!
//! This module provides `SQLite`-based persistent storage for flight records
//! and reminders. Records are stored as JSON documents keyed by id, with a
//! secondary index column used for time ordering.

pub mod identity;
pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::record::{FlightRecord, Reminder};

pub use identity::{RecordIdentity, SystemIdentity};

/// Storage engine for flight records and reminders.
///
/// Every method is a single statement or a single transaction against one
/// collection. Saves are upserts: a second save with the same id replaces
/// the first.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
    /// Source of ids and creation times for new records.
    identity: Arc<dyn RecordIdentity>,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist,
    /// then brings the schema up to date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self {
            path,
            conn,
            identity: Arc::new(SystemIdentity),
        })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
            identity: Arc::new(SystemIdentity),
        })
    }

    /// Replace the id and clock source used for new records.
    #[must_use]
    pub fn with_identity(mut self, identity: Arc<dyn RecordIdentity>) -> Self {
        self.identity = identity;
        self
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The schema version recorded in the database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn schema_version(&self) -> Result<i32> {
        migrations::get_schema_version(&self.conn)
    }

    /// Insert or replace a flight record, returning its id.
    ///
    /// A record without an id (or with a blank one) gets a fresh id and a
    /// `created_at` of now. A record with an id keeps it; if a record with
    /// that id is already stored, its `created_at` and author fields win over
    /// the incoming ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn save_flight(&self, record: &FlightRecord) -> Result<String> {
        let mut record = record.clone();
        let tx = self.conn.unchecked_transaction()?;

        let existing_id = record
            .id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .map(str::to_string);

        let (id, created_at) = match existing_id {
            None => (self.identity.new_id(), self.identity.now()),
            Some(id) => {
                let mut created_at = record.created_at;
                if let Some(stored) = Self::fetch_flight(&tx, &id)? {
                    created_at = stored.created_at.or(created_at);
                    record.created_by = stored.created_by;
                    record.created_by_category = stored.created_by_category;
                }
                let created_at = created_at.unwrap_or_else(|| self.identity.now());
                (id, created_at)
            }
        };

        record.id = Some(id.clone());
        record.created_at = Some(created_at);
        let json = serde_json::to_string(&record)?;

        tx.execute(
            r"
            INSERT INTO flights (id, created_at, record) VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET created_at = excluded.created_at, record = excluded.record
            ",
            params![id, created_at.timestamp_micros(), json],
        )?;
        tx.commit()?;

        debug!("Saved flight {}", id);
        Ok(id)
    }

    /// Get a flight record by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_flight(&self, id: &str) -> Result<Option<FlightRecord>> {
        Self::fetch_flight(&self.conn, id)
    }

    fn fetch_flight(conn: &Connection, id: &str) -> Result<Option<FlightRecord>> {
        let json: Option<String> = conn
            .query_row("SELECT record FROM flights WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .optional()?;
        json.map(|json| serde_json::from_str(&json).map_err(Error::from))
            .transpose()
    }

    /// Get every flight record, newest first by `created_at`.
    ///
    /// Records sharing a timestamp come back in scan order.
    ///
    /// Rows whose document cannot be decoded are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_flights(&self) -> Result<Vec<FlightRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, record FROM flights ORDER BY created_at DESC")?;

        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(decode_rows(rows, "flight"))
    }

    /// Delete a flight record by id.
    ///
    /// Returns `true` if a record was deleted, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_flight(&self, id: &str) -> Result<bool> {
        let affected = self.conn.execute("DELETE FROM flights WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    /// Insert or replace a reminder, returning its id.
    ///
    /// A reminder without an id (or with a blank one) gets a fresh id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn save_reminder(&self, reminder: &Reminder) -> Result<String> {
        let mut reminder = reminder.clone();
        let id = match reminder.id.as_deref() {
            Some(id) if !id.trim().is_empty() => id.to_string(),
            _ => self.identity.new_id(),
        };
        reminder.id = Some(id.clone());
        let json = serde_json::to_string(&reminder)?;

        self.conn.execute(
            r"
            INSERT INTO reminders (id, date, record) VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET date = excluded.date, record = excluded.record
            ",
            params![id, reminder.date.timestamp_micros(), json],
        )?;

        debug!("Saved reminder {}", id);
        Ok(id)
    }

    /// Get a reminder by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_reminder(&self, id: &str) -> Result<Option<Reminder>> {
        let json: Option<String> = self
            .conn
            .query_row("SELECT record FROM reminders WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .optional()?;
        json.map(|json| serde_json::from_str(&json).map_err(Error::from))
            .transpose()
    }

    /// Get every reminder, in no particular order.
    ///
    /// Rows whose document cannot be decoded are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_reminders(&self) -> Result<Vec<Reminder>> {
        let mut stmt = self.conn.prepare("SELECT id, record FROM reminders")?;

        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(decode_rows(rows, "reminder"))
    }

    /// Delete a reminder by id.
    ///
    /// Returns `true` if a reminder was deleted, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_reminder(&self, id: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM reminders WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails or the database file
    /// cannot be inspected.
    pub fn stats(&self) -> Result<StorageStats> {
        let total_flights: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM flights", [], |row| row.get(0))?;
        let total_reminders: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM reminders", [], |row| row.get(0))?;
        let newest: Option<i64> = self
            .conn
            .query_row("SELECT MAX(created_at) FROM flights", [], |row| row.get(0))?;

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path)?.len()
        };

        Ok(StorageStats {
            total_flights,
            total_reminders,
            newest_flight: newest.and_then(DateTime::<Utc>::from_timestamp_micros),
            schema_version: self.schema_version()?,
            db_size_bytes,
        })
    }
}

/// Decode `(id, document)` rows, dropping the ones that fail.
fn decode_rows<T: DeserializeOwned>(rows: Vec<(String, String)>, kind: &str) -> Vec<T> {
    rows.into_iter()
        .filter_map(|(id, json)| match serde_json::from_str(&json) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!("Skipping undecodable {} {}: {}", kind, id, err);
                None
            }
        })
        .collect()
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StorageStats {
    /// Number of flight records stored.
    pub total_flights: i64,
    /// Number of reminders stored.
    pub total_reminders: i64,
    /// Creation time of the newest flight record.
    pub newest_flight: Option<DateTime<Utc>>,
    /// Schema version recorded in the database.
    pub schema_version: i32,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}
