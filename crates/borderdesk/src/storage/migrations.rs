//! Database migration system for borderdesk.
//!
//! Migrations are forward-only. Every step only creates what is missing, so
//! rerunning a step against a database that already has it is harmless, and
//! tables the code does not know about are left alone.

use rusqlite::Connection;
use tracing::info;

use crate::error::{Error, Result};

use super::schema::{BASE_STATEMENTS, V1_STATEMENTS, V2_STATEMENTS};

/// The current schema version.
pub const CURRENT_VERSION: i32 = 2;

/// Key used to store the schema version in the metadata table.
const VERSION_KEY: &str = "schema_version";

/// Initialize the database schema.
///
/// Creates the metadata table, then runs every migration between the stored
/// version and [`CURRENT_VERSION`].
///
/// # Errors
///
/// Returns an error if a statement fails, or if the database was written by a
/// newer schema version than this code understands.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    for statement in BASE_STATEMENTS {
        conn.execute(statement, [])?;
    }

    let version = get_schema_version(conn)?;
    if version > CURRENT_VERSION {
        return Err(Error::DatabaseMigration {
            message: format!(
                "database schema version {version} is newer than supported version {CURRENT_VERSION}"
            ),
        });
    }
    if version < CURRENT_VERSION {
        run_migrations(conn, version)?;
    }

    Ok(())
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (fresh database).
///
/// # Errors
///
/// Returns an error if the metadata table cannot be read or holds a
/// non-numeric version.
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    let result: std::result::Result<String, rusqlite::Error> = conn.query_row(
        "SELECT value FROM metadata WHERE key = ?1",
        [VERSION_KEY],
        |row| row.get(0),
    );

    match result {
        Ok(value) => value.parse().map_err(|_| Error::DatabaseMigration {
            message: format!("invalid schema version: {value}"),
        }),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(e.into()),
    }
}

/// Set the schema version in the database.
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, version.to_string()),
    )?;
    Ok(())
}

/// Run migrations from the given version to the current version.
///
/// All steps and the version bump share one transaction.
fn run_migrations(conn: &Connection, from_version: i32) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    let mut current = from_version;

    while current < CURRENT_VERSION {
        current += 1;
        run_migration(&tx, current)?;
    }

    set_schema_version(&tx, CURRENT_VERSION)?;
    tx.commit()?;
    info!(
        "Migrated database schema from version {} to {}",
        from_version, CURRENT_VERSION
    );
    Ok(())
}

/// Run a specific migration version.
fn run_migration(conn: &Connection, version: i32) -> Result<()> {
    let statements = match version {
        1 => V1_STATEMENTS,
        2 => V2_STATEMENTS,
        _ => {
            return Err(Error::DatabaseMigration {
                message: format!("unknown migration version: {version}"),
            })
        }
    };
    for statement in statements {
        conn.execute(statement, [])?;
    }
    Ok(())
}
