//! Asynchronous record store.
//!
//! [`RecordStore`] is the interface the form controller talks to.
//! [`FlightStore`] implements it on top of [`Storage`], running every
//! operation as one unit of work on the blocking thread pool. The database is
//! opened on first use; if that fails the operation reports
//! [`Error::StorageUnavailable`] and the next operation tries again.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::record::{FlightRecord, Reminder};
use crate::storage::{RecordIdentity, Storage, StorageStats, SystemIdentity};

/// Persistence operations for flights and reminders.
///
/// Saves are upserts. Deleting an id that does not exist succeeds. Concurrent
/// saves of the same id are last-write-wins.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert or replace a flight record, returning its id.
    async fn save_flight(&self, record: FlightRecord) -> Result<String>;

    /// Every flight record, newest first.
    async fn get_flights(&self) -> Result<Vec<FlightRecord>>;

    /// One flight record by id.
    async fn get_flight(&self, id: &str) -> Result<Option<FlightRecord>>;

    /// Remove a flight record. Missing ids are not an error.
    async fn delete_flight(&self, id: &str) -> Result<()>;

    /// Insert or replace a reminder, returning its id.
    async fn save_reminder(&self, reminder: Reminder) -> Result<String>;

    /// Every reminder, unordered.
    async fn get_reminders(&self) -> Result<Vec<Reminder>>;

    /// One reminder by id.
    async fn get_reminder(&self, id: &str) -> Result<Option<Reminder>>;

    /// Remove a reminder. Missing ids are not an error.
    async fn delete_reminder(&self, id: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
enum Location {
    File(PathBuf),
    Memory,
}

impl Location {
    fn display_path(&self) -> PathBuf {
        match self {
            Self::File(path) => path.clone(),
            Self::Memory => PathBuf::from(":memory:"),
        }
    }
}

#[derive(Debug)]
struct Inner {
    location: Location,
    identity: Arc<dyn RecordIdentity>,
    storage: Mutex<Option<Storage>>,
}

impl Inner {
    fn open(&self) -> Result<Storage> {
        let opened = match &self.location {
            Location::File(path) => Storage::open(path),
            Location::Memory => Storage::open_in_memory(),
        };
        match opened {
            Ok(storage) => Ok(storage.with_identity(Arc::clone(&self.identity))),
            Err(err) => {
                warn!("Storage unavailable: {}", err);
                Err(Error::storage_unavailable(
                    self.location.display_path(),
                    err.to_string(),
                ))
            }
        }
    }

    fn with_storage<T>(&self, op: impl FnOnce(&Storage) -> Result<T>) -> Result<T> {
        let mut guard = self
            .storage
            .lock()
            .map_err(|_| Error::internal("storage lock poisoned"))?;
        if guard.is_none() {
            *guard = Some(self.open()?);
        }
        let Some(storage) = guard.as_ref() else {
            return Err(Error::internal("storage not initialized"));
        };
        op(storage)
    }
}

/// Cloneable handle to the local record database.
#[derive(Debug, Clone)]
pub struct FlightStore {
    inner: Arc<Inner>,
}

impl FlightStore {
    /// A store backed by the database file at `path`, opened on first use.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_location(Location::File(path.as_ref().to_path_buf()))
    }

    /// A store backed by a private in-memory database.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::with_location(Location::Memory)
    }

    fn with_location(location: Location) -> Self {
        Self {
            inner: Arc::new(Inner {
                location,
                identity: Arc::new(SystemIdentity),
                storage: Mutex::new(None),
            }),
        }
    }

    /// Replace the id and clock source used for new records.
    ///
    /// The returned handle opens its own connection; an in-memory database
    /// is not shared with `self`.
    #[must_use]
    pub fn with_identity(self, identity: Arc<dyn RecordIdentity>) -> Self {
        Self {
            inner: Arc::new(Inner {
                location: self.inner.location.clone(),
                identity,
                storage: Mutex::new(None),
            }),
        }
    }

    /// Location of the backing database.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.inner.location.display_path()
    }

    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Storage) -> Result<T> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || inner.with_storage(op))
            .await
            .map_err(|e| Error::internal(format!("storage task failed: {e}")))?
    }

    /// Set a reminder's completed flag. Returns `false` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if storage is unavailable or the operation fails.
    pub async fn set_reminder_completed(&self, id: &str, completed: bool) -> Result<bool> {
        let id = id.to_string();
        self.run(move |storage| {
            let Some(mut reminder) = storage.get_reminder(&id)? else {
                return Ok(false);
            };
            reminder.completed = completed;
            storage.save_reminder(&reminder)?;
            Ok(true)
        })
        .await
    }

    /// Counts and schema information.
    ///
    /// # Errors
    ///
    /// Returns an error if storage is unavailable or the operation fails.
    pub async fn stats(&self) -> Result<StorageStats> {
        self.run(Storage::stats).await
    }
}

#[async_trait::async_trait]
impl RecordStore for FlightStore {
    async fn save_flight(&self, record: FlightRecord) -> Result<String> {
        self.run(move |storage| storage.save_flight(&record)).await
    }

    async fn get_flights(&self) -> Result<Vec<FlightRecord>> {
        self.run(Storage::get_flights).await
    }

    async fn get_flight(&self, id: &str) -> Result<Option<FlightRecord>> {
        let id = id.to_string();
        self.run(move |storage| storage.get_flight(&id)).await
    }

    async fn delete_flight(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.run(move |storage| {
            if !storage.delete_flight(&id)? {
                debug!("Delete of missing flight {} ignored", id);
            }
            Ok(())
        })
        .await
    }

    async fn save_reminder(&self, reminder: Reminder) -> Result<String> {
        self.run(move |storage| storage.save_reminder(&reminder)).await
    }

    async fn get_reminders(&self) -> Result<Vec<Reminder>> {
        self.run(Storage::get_reminders).await
    }

    async fn get_reminder(&self, id: &str) -> Result<Option<Reminder>> {
        let id = id.to_string();
        self.run(move |storage| storage.get_reminder(&id)).await
    }

    async fn delete_reminder(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.run(move |storage| {
            if !storage.delete_reminder(&id)? {
                debug!("Delete of missing reminder {} ignored", id);
            }
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::record::ReminderType;

    fn unavailable_path(temp_dir: &tempfile::TempDir) -> PathBuf {
        // A regular file cannot be used as a directory.
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        blocker.join("nested").join("desk.db")
    }

    #[tokio::test]
    async fn test_flight_round_trip() {
        let store = FlightStore::in_memory();
        let mut record = FlightRecord::draft("Ana", "inspector");
        record.flight_number = "TP1699".to_string();

        let id = store.save_flight(record).await.unwrap();
        let flights = store.get_flights().await.unwrap();
        assert_eq!(flights.len(), 1);
        assert_eq!(flights[0].id.as_deref(), Some(id.as_str()));
        assert!(store.get_flight(&id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_clones_share_database() {
        let store = FlightStore::in_memory();
        let other = store.clone();

        store
            .save_flight(FlightRecord::draft("Ana", "inspector"))
            .await
            .unwrap();
        assert_eq!(other.get_flights().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let store = FlightStore::in_memory();
        store.delete_flight("missing").await.unwrap();
        store.delete_reminder("missing").await.unwrap();
        assert!(store.get_flights().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reminder_completion() {
        let store = FlightStore::in_memory();
        let id = store
            .save_reminder(Reminder::new("Brief", Utc::now(), ReminderType::Meeting))
            .await
            .unwrap();

        assert!(store.set_reminder_completed(&id, true).await.unwrap());
        assert!(store.get_reminder(&id).await.unwrap().unwrap().completed);
        assert!(!store.set_reminder_completed("missing", true).await.unwrap());
    }

    #[tokio::test]
    async fn test_unavailable_storage_fails_every_operation() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FlightStore::new(unavailable_path(&temp_dir));

        let err = store.get_flights().await.unwrap_err();
        assert!(err.is_storage_unavailable());
        let err = store
            .save_flight(FlightRecord::default())
            .await
            .unwrap_err();
        assert!(err.is_storage_unavailable());
        let err = store.delete_reminder("x").await.unwrap_err();
        assert!(err.is_storage_unavailable());
    }

    #[tokio::test]
    async fn test_stats() {
        let store = FlightStore::in_memory();
        store
            .save_flight(FlightRecord::draft("Ana", "inspector"))
            .await
            .unwrap();
        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total_flights, 1);
        assert_eq!(stats.total_reminders, 0);
        assert_eq!(store.path(), PathBuf::from(":memory:"));
    }
}
