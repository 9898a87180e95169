//! Error types for borderdesk.
//!
//! Validation problems are not errors: they are reported as a
//! [`ValidationErrors`](crate::validation::ValidationErrors) value. This enum
//! covers storage, configuration and state-machine failures.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for borderdesk operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// The storage engine could not be opened for this operation.
    #[error("storage unavailable at {path}: {message}")]
    StorageUnavailable {
        /// Location the store tried to open.
        path: PathBuf,
        /// Why opening failed.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Record Errors ===
    /// A checklist item id is not part of the leg's catalog.
    #[error("unknown {leg} checklist item '{item}'")]
    UnknownChecklistItem {
        /// Leg whose catalog was consulted.
        leg: &'static str,
        /// The rejected item id.
        item: String,
    },

    /// A form action was invoked from a state that does not allow it.
    #[error("cannot {action} while the form is {state}")]
    InvalidTransition {
        /// The attempted action.
        action: &'static str,
        /// The state the form was in.
        state: &'static str,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for borderdesk operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a storage-unavailable error for the given location.
    #[must_use]
    pub fn storage_unavailable(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Check if this error means the storage engine could not be opened.
    #[must_use]
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, Self::StorageUnavailable { .. })
    }

    /// Check if this error is a rejected form transition.
    #[must_use]
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }
}
