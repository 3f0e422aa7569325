//! # plug-db
//!
//! Persistence layer for the waitlist service.
//! Manages the single SQLite database at `$PLUG_DATA_DIR/waitlist.db`.
//!
//! ## Schema
//!
//! - `waitlist`: one row per entrant, unique on email and referral code
//! - `referral_visits`: append-only log of `?ref=` landings
//! - `analytics_events`: append-only log of signup events
//!
//! Conventions:
//! - WAL mode
//! - All timestamps are Unix epoch seconds (u64)
//! - Emails are stored lowercased
//! - Schema version stored in `PRAGMA user_version`

pub mod migrations;
pub mod queries;
pub mod schema;

use rusqlite::Connection;
use std::path::Path;

/// Current schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Database error types.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Open or create the waitlist database at the given path.
///
/// Configures WAL mode and runs any pending migrations.
pub fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    configure(&conn)?;
    migrations::run(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (for testing).
pub fn open_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure(&conn)?;
    migrations::run(&conn)?;
    Ok(conn)
}

/// Configure SQLite pragmas.
fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;
         PRAGMA synchronous = NORMAL;",
    )?;
    Ok(())
}

/// Map a unique-constraint failure to [`DbError::Constraint`].
pub(crate) fn classify(err: rusqlite::Error, what: &str) -> DbError {
    match err {
        rusqlite::Error::SqliteFailure(ref inner, ref msg)
            if inner.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            DbError::Constraint(
                msg.clone()
                    .unwrap_or_else(|| format!("{what} violates a constraint")),
            )
        }
        other => DbError::Sqlite(other),
    }
}
