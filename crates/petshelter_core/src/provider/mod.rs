//! Address-routed CRUD front for the pets table.
//!
//! # Responsibility
//! - Resolve content addresses to collection or item operations.
//! - Validate field values before any write reaches storage.
//! - Signal observers after each committed write.
//!
//! # Invariants
//! - `PetProvider` is the only path from callers to the pets table.
//! - Rejected input never produces a partial write.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod cursor;
mod matcher;
mod pet_provider;
mod uri;
mod values;

pub use cursor::{Cursor, CursorRow};
pub use matcher::{UriMatcher, UriMatcherBuilder};
pub use pet_provider::{pets_uri_matcher, PetProvider, PetRoute, PetUriMatch, Selection};
pub use uri::{ContentUri, UriParseError};
pub use values::ContentValues;

pub type ProviderResult<T> = Result<T, ProviderError>;

#[derive(Debug)]
pub enum ProviderError {
    /// Unsupported address, missing or empty required field, or an
    /// out-of-range value.
    InvalidArgument(String),
    /// Type lookup on an address no route knows.
    InvalidState(String),
    Db(DbError),
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::InvalidState(message) => write!(f, "invalid state: {message}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProviderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidArgument(_) | Self::InvalidState(_) => None,
        }
    }
}

impl From<DbError> for ProviderError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for ProviderError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
