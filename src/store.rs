//! SQLite-backed persistence for user records.
//!
//! The merge logic in [`crate::reconcile`] is pure; this module is the only
//! place state actually changes. Per-user writes go through an optimistic
//! version check so concurrent reconciliations of the same user surface as
//! [`Error::Conflict`](crate::error::Error::Conflict) instead of silently
//! losing updates.

use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;

mod friends;
mod schema;
mod users;

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens (creating if necessary) the database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let store = Self {
            conn: Connection::open(path)?,
        };
        store.initialize()?;
        Ok(store)
    }

    /// In-memory database, used by the test suite.
    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> Result<()> {
        log::debug!("[initialize] creating Users table...");
        self.conn.execute(schema::USERS_SCHEMA, [])?;

        log::debug!("[initialize] creating SolvedProblems table...");
        self.conn.execute(schema::SOLVED_PROBLEMS_SCHEMA, [])?;

        log::debug!("[initialize] creating Friends table...");
        self.conn.execute(schema::FRIENDS_SCHEMA, [])?;

        Ok(())
    }
}

/// Maps a UNIQUE-constraint violation to `Ok(false)` ("nothing newly
/// inserted") and lets every other error through.
fn swallow_constraint_violation(err: rusqlite::Error) -> Result<bool> {
    match err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Ok(false)
        }
        other => Err(other.into()),
    }
}
