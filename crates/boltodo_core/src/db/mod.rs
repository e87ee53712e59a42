//! SQLite storage bootstrap and the ordered key-value bucket engine.
//!
//! # Responsibility
//! - Open and configure SQLite connections.
//! - Apply storage schema migrations in deterministic order.
//! - Expose named buckets of ordered byte keys with a native sequence.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Bucket reads/writes happen only on migrated connections.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod bucket;
pub mod migrations;
mod open;

pub use bucket::Bucket;
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    BucketNotFound(&'static str),
    SequenceExhausted(&'static str),
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
            Self::BucketNotFound(name) => write!(f, "bucket `{name}` does not exist"),
            Self::SequenceExhausted(name) => {
                write!(f, "sequence of bucket `{name}` is exhausted")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. }
            | Self::BucketNotFound(_)
            | Self::SequenceExhausted(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
