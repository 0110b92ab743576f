//! SQLite storage handle and schema bootstrap.
//!
//! # Responsibility
//! - Open and configure the single pets database connection.
//! - Create the schema once and run the (no-op) upgrade hook.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - No caller can obtain a connection before `ensure_schema` succeeded.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod helper;
mod open;
pub mod schema;

pub use helper::{DatabaseGuard, PetDbHelper};
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// A previous holder of the connection panicked mid-operation.
    LockPoisoned,
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::LockPoisoned => write!(f, "database connection lock is poisoned"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::LockPoisoned => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
