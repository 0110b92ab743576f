//! Storage handle owning the one pets database connection.
//!
//! # Responsibility
//! - Open the database at a fixed location and ensure the schema once.
//! - Hand out read/write access to the same connection.
//!
//! # Invariants
//! - One helper per process; it exclusively owns the connection.
//! - `open_for_read`/`open_for_write` never re-run schema creation.

use super::schema::ensure_schema;
use super::{open_db, open_db_in_memory, DbError, DbResult};
use rusqlite::Connection;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Owner of the pets database connection.
#[derive(Debug)]
pub struct PetDbHelper {
    location: Option<PathBuf>,
    conn: Mutex<Connection>,
}

/// Exclusive access to the helper's connection for one operation.
pub struct DatabaseGuard<'a> {
    conn: MutexGuard<'a, Connection>,
}

impl Deref for DatabaseGuard<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}

impl PetDbHelper {
    /// Opens the database file at `path`, creating it and the schema if needed.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref();
        let conn = open_db(path)?;
        Ok(Self {
            location: Some(path.to_path_buf()),
            conn: Mutex::new(conn),
        })
    }

    /// Opens a private in-memory database with the schema applied.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self {
            location: None,
            conn: Mutex::new(open_db_in_memory()?),
        })
    }

    /// File backing this helper, `None` for in-memory databases.
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    /// Re-checks the schema. Safe to call any number of times.
    pub fn ensure_schema(&self) -> DbResult<()> {
        let mut conn = self.lock()?;
        ensure_schema(&mut conn)
    }

    /// Returns the connection for queries.
    pub fn open_for_read(&self) -> DbResult<DatabaseGuard<'_>> {
        Ok(DatabaseGuard { conn: self.lock()? })
    }

    /// Returns the connection for mutations.
    pub fn open_for_write(&self) -> DbResult<DatabaseGuard<'_>> {
        Ok(DatabaseGuard { conn: self.lock()? })
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::LockPoisoned)
    }
}

#[cfg(test)]
mod tests {
    use super::PetDbHelper;

    #[test]
    fn read_and_write_handles_share_one_table() {
        let helper = PetDbHelper::open_in_memory().expect("open helper");
        {
            let writer = helper.open_for_write().expect("write handle");
            writer
                .execute(
                    "INSERT INTO pets (name, gender) VALUES ('Rex', 1);",
                    [],
                )
                .expect("insert through write handle");
        }

        let reader = helper.open_for_read().expect("read handle");
        let count: i64 = reader
            .query_row("SELECT COUNT(*) FROM pets;", [], |row| row.get(0))
            .expect("count through read handle");
        assert_eq!(count, 1);
        assert!(helper.location().is_none());
    }

    #[test]
    fn ensure_schema_is_repeatable() {
        let helper = PetDbHelper::open_in_memory().expect("open helper");
        helper.ensure_schema().expect("first re-check");
        helper.ensure_schema().expect("second re-check");
    }
}
