//! `SQLite` schema definitions for borderdesk.
//!
//! Each logical collection is one table keyed by `id`, holding the record as
//! a JSON document plus the column its secondary index orders by. Index
//! columns hold microseconds since the Unix epoch.

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// SQL statement to create the flights collection.
pub const CREATE_FLIGHTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS flights (
    id TEXT PRIMARY KEY NOT NULL,
    created_at INTEGER NOT NULL,
    record TEXT NOT NULL
)
";

/// SQL statement to create the non-unique `created_at` index on flights.
pub const CREATE_FLIGHTS_CREATED_AT_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_flights_created_at ON flights(created_at)
";

/// SQL statement to create the reminders collection.
pub const CREATE_REMINDERS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS reminders (
    id TEXT PRIMARY KEY NOT NULL,
    date INTEGER NOT NULL,
    record TEXT NOT NULL
)
";

/// SQL statement to create the non-unique `date` index on reminders.
pub const CREATE_REMINDERS_DATE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_reminders_date ON reminders(date)
";

/// Statements that must exist before any migration runs.
pub const BASE_STATEMENTS: &[&str] = &[CREATE_METADATA_TABLE];

/// Statements of schema version 1: the flights collection.
pub const V1_STATEMENTS: &[&str] = &[CREATE_FLIGHTS_TABLE, CREATE_FLIGHTS_CREATED_AT_INDEX];

/// Statements of schema version 2: the reminders collection.
pub const V2_STATEMENTS: &[&str] = &[CREATE_REMINDERS_TABLE, CREATE_REMINDERS_DATE_INDEX];
