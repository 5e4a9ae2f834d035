//! Database connection pool.
//!
//! A single mutex-guarded SQLite connection shared across the process. The
//! connection's transaction scope is the only concurrency control the store
//! offers: each submission runs inside one `with_tx` unit of work that
//! commits on success and rolls back on error.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Transaction};
use thiserror::Error;

/// Database error types.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Connection lock poisoned")]
    Poisoned,
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Shared handle to the SQLite store.
#[derive(Clone)]
pub struct DbPool {
    conn: Arc<Mutex<Connection>>,
}

impl DbPool {
    /// Open (or create) a database file and apply migrations.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database. Used by tests.
    pub fn in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> DbResult<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        let pool = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        crate::migrations::run_migrations(&pool)?;
        Ok(pool)
    }

    /// Run a read-only closure against the connection.
    pub fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> DbResult<T>) -> DbResult<T> {
        let guard = self.conn.lock().map_err(|_| DbError::Poisoned)?;
        f(&guard)
    }

    /// Run a closure that needs a mutable connection (migrations).
    pub fn with_conn_mut<T>(&self, f: impl FnOnce(&mut Connection) -> DbResult<T>) -> DbResult<T> {
        let mut guard = self.conn.lock().map_err(|_| DbError::Poisoned)?;
        f(&mut guard)
    }

    /// Run a closure inside a transaction: commit on `Ok`, roll back on `Err`.
    ///
    /// The error type is generic so callers higher up the stack can run
    /// their own fallible logic inside the scope without re-wrapping.
    pub fn with_tx<T, E>(&self, f: impl FnOnce(&Transaction<'_>) -> Result<T, E>) -> Result<T, E>
    where
        E: From<DbError>,
    {
        let mut guard = self.conn.lock().map_err(|_| E::from(DbError::Poisoned))?;
        let tx = guard.transaction().map_err(DbError::from)?;
        let out = f(&tx)?;
        tx.commit().map_err(DbError::from)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rollback_on_error() {
        let pool = DbPool::in_memory().unwrap();
        let result: Result<(), DbError> = pool.with_tx(|tx| {
            tx.execute("INSERT INTO qualities (id, name, category, nature) VALUES (1, 'Shadowy', 'BasicAbility', 'Status')", [])?;
            Err(DbError::Migration("forced".into()))
        });
        assert!(result.is_err());

        pool.with_conn(|conn| {
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM qualities", [], |row| row.get(0))?;
            assert_eq!(count, 0);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_commit_on_ok() {
        let pool = DbPool::in_memory().unwrap();
        pool.with_tx(|tx| -> DbResult<()> {
            tx.execute("INSERT INTO qualities (id, name, category, nature) VALUES (1, 'Shadowy', 'BasicAbility', 'Status')", [])?;
            Ok(())
        })
        .unwrap();

        pool.with_conn(|conn| {
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM qualities", [], |row| row.get(0))?;
            assert_eq!(count, 1);
            Ok(())
        })
        .unwrap();
    }
}
