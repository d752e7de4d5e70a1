//! Note store connection layer.
//!
//! `open_db*` is the only way to obtain a `Connection` for the repository
//! layer; it prepares the file location, sets pragmas and runs
//! [`migrations::apply_migrations`].
//!
//! # Invariants
//! - A connection handed out always carries the latest `notes` schema.
//! - Stores written by a newer binary are refused rather than rewritten.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure to open or upgrade the note store.
#[derive(Debug)]
pub enum DbError {
    /// SQLite rejected a statement or pragma.
    Sqlite(rusqlite::Error),
    /// The store's parent directory could not be created.
    Io { path: PathBuf, message: String },
    /// The store's `user_version` is ahead of this binary.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "note store error: {err}"),
            Self::Io { path, message } => write!(
                f,
                "cannot create note store directory `{}`: {message}",
                path.display()
            ),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "note store schema v{db_version} was written by a newer release (this build reads up to v{latest_supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Io { .. } | Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
