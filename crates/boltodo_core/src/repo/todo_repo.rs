//! Todo repository contract and SQLite bucket implementation.
//!
//! # Responsibility
//! - Provide transactional CRUD over the `todos` bucket.
//! - Assign ids from the bucket sequence, never from callers.
//!
//! # Invariants
//! - Every operation runs inside exactly one SQLite transaction.
//! - Id allocation and the first write of a record share one transaction.
//! - Read paths reject undecodable bytes instead of masking them.
//! - `list` reports corrupt entries and keeps going.

use crate::codec::{decode_key, decode_todo, encode_key, encode_todo, CodecError};
use crate::db::{Bucket, DbError};
use crate::model::todo::{Todo, TodoId};
use log::{debug, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Name of the single bucket holding all todo records.
pub const TODOS_BUCKET: &str = "todos";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for todo persistence operations.
#[derive(Debug)]
pub enum RepoError {
    /// No record is stored under this id.
    NotFound(TodoId),
    /// Stored bytes for this id could not be decoded.
    Format { id: TodoId, source: CodecError },
    /// Storage engine or transaction failure.
    Db(DbError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::Format { id, source } => write!(f, "corrupt todo {id}: {source}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Format { source, .. } => Some(source),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Stored entry that could not be turned into a `Todo`.
#[derive(Debug)]
pub struct CorruptEntry {
    /// Raw bucket key of the entry.
    pub key: Vec<u8>,
    /// Decoded id, when the key itself was well-formed.
    pub id: Option<TodoId>,
    pub error: CodecError,
}

impl Display for CorruptEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "corrupt todo {id}: {}", self.error),
            None => write!(f, "corrupt key {:02x?}: {}", self.key, self.error),
        }
    }
}

/// One listed entry: a decoded record, or the reason it could not be read.
pub type ListEntry = Result<Todo, CorruptEntry>;

/// Point-in-time listing of the bucket.
#[derive(Debug, Default)]
pub struct TodoListing {
    /// Every stored entry in ascending key order; corrupt entries keep their
    /// position between the records around them.
    pub entries: Vec<ListEntry>,
}

impl TodoListing {
    /// Decoded records in ascending id order.
    pub fn todos(&self) -> impl Iterator<Item = &Todo> + '_ {
        self.entries.iter().filter_map(|entry| entry.as_ref().ok())
    }

    /// Entries that failed to decode, in key order.
    pub fn corrupt(&self) -> impl Iterator<Item = &CorruptEntry> + '_ {
        self.entries.iter().filter_map(|entry| entry.as_ref().err())
    }

    pub fn is_clean(&self) -> bool {
        self.corrupt().next().is_none()
    }
}

/// Repository interface for todo CRUD operations.
///
/// Ids are only handed out by `create`, which advances the sequence and
/// writes the record in one transaction.
pub trait TodoRepository {
    /// Writes `todo` under its id, overwriting any existing value.
    fn put(&self, todo: &Todo) -> RepoResult<()>;
    /// Allocates a fresh id and stores `text` under it atomically.
    fn create(&self, text: &str) -> RepoResult<Todo>;
    /// Overwrites an existing record; fails with `NotFound` otherwise.
    fn update(&self, todo: &Todo) -> RepoResult<()>;
    fn get(&self, id: TodoId) -> RepoResult<Todo>;
    /// Removes `id`. Returns `false` when it was already absent.
    fn delete(&self, id: TodoId) -> RepoResult<bool>;
    fn list(&self) -> RepoResult<TodoListing>;
}

/// SQLite-backed todo repository.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    /// Constructs a repository on a migrated connection, creating the
    /// `todos` bucket on first use.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Bucket::create_if_missing(conn, TODOS_BUCKET)?;
        Ok(Self { conn })
    }

    fn read_tx(&self) -> RepoResult<Transaction<'conn>> {
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Deferred,
        )?)
    }

    fn write_tx(&self) -> RepoResult<Transaction<'conn>> {
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Immediate,
        )?)
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn put(&self, todo: &Todo) -> RepoResult<()> {
        let tx = self.write_tx()?;
        put_in_tx(&Bucket::open(&tx, TODOS_BUCKET)?, todo)?;
        tx.commit()?;
        Ok(())
    }

    fn create(&self, text: &str) -> RepoResult<Todo> {
        let tx = self.write_tx()?;
        let bucket = Bucket::open(&tx, TODOS_BUCKET)?;
        let todo = Todo::new(next_id(&bucket)?, text);
        put_in_tx(&bucket, &todo)?;
        tx.commit()?;

        debug!("event=todo_create module=repo status=ok id={}", todo.id);
        Ok(todo)
    }

    fn update(&self, todo: &Todo) -> RepoResult<()> {
        let tx = self.write_tx()?;
        let bucket = Bucket::open(&tx, TODOS_BUCKET)?;
        if !bucket.contains(&encode_key(todo.id))? {
            return Err(RepoError::NotFound(todo.id));
        }
        put_in_tx(&bucket, todo)?;
        tx.commit()?;

        debug!("event=todo_update module=repo status=ok id={}", todo.id);
        Ok(())
    }

    fn get(&self, id: TodoId) -> RepoResult<Todo> {
        let tx = self.read_tx()?;
        let value = Bucket::open(&tx, TODOS_BUCKET)?
            .get(&encode_key(id))?
            .ok_or(RepoError::NotFound(id))?;
        tx.commit()?;

        decode_stored(id, &value).map_err(|source| RepoError::Format { id, source })
    }

    fn delete(&self, id: TodoId) -> RepoResult<bool> {
        let tx = self.write_tx()?;
        let removed = Bucket::open(&tx, TODOS_BUCKET)?.delete(&encode_key(id))?;
        tx.commit()?;

        debug!("event=todo_delete module=repo status=ok id={id} removed={removed}");
        Ok(removed)
    }

    fn list(&self) -> RepoResult<TodoListing> {
        let tx = self.read_tx()?;
        let entries = Bucket::open(&tx, TODOS_BUCKET)?.entries()?;
        tx.commit()?;

        let listing = TodoListing {
            entries: entries
                .into_iter()
                .map(|(key, value)| decode_entry(key, &value))
                .collect(),
        };

        if !listing.is_clean() {
            warn!(
                "event=todo_list module=repo status=degraded ok_count={} corrupt_count={}",
                listing.todos().count(),
                listing.corrupt().count()
            );
        }
        Ok(listing)
    }
}

/// Advances the bucket sequence for a record about to be written.
///
/// Must run on the same transaction as the record's first `put`, so an
/// aborted create also returns its id to the sequence.
fn next_id(bucket: &Bucket<'_>) -> RepoResult<TodoId> {
    Ok(bucket.next_sequence()?)
}

fn decode_entry(key: Vec<u8>, value: &[u8]) -> ListEntry {
    let id = match decode_key(&key) {
        Ok(id) => id,
        Err(error) => {
            return Err(CorruptEntry {
                key,
                id: None,
                error,
            });
        }
    };
    decode_stored(id, value).map_err(|error| CorruptEntry {
        key,
        id: Some(id),
        error,
    })
}

fn put_in_tx(bucket: &Bucket<'_>, todo: &Todo) -> RepoResult<()> {
    let value = encode_todo(todo).map_err(|source| RepoError::Format {
        id: todo.id,
        source,
    })?;
    bucket.put(&encode_key(todo.id), &value)?;
    Ok(())
}

/// Decodes a stored value and checks it belongs under `id`.
fn decode_stored(id: TodoId, value: &[u8]) -> Result<Todo, CodecError> {
    let todo = decode_todo(value)?;
    if todo.id != id {
        return Err(CodecError::KeyMismatch {
            key_id: id,
            record_id: todo.id,
        });
    }
    Ok(todo)
}
