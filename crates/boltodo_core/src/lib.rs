//! Core domain logic for boltodo.
//! This crate is the single source of truth for record and id invariants.

pub mod codec;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use codec::CodecError;
pub use db::{open_db, open_db_in_memory, DbError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::todo::{Todo, TodoId};
pub use repo::todo_repo::{
    CorruptEntry, ListEntry, RepoError, RepoResult, SqliteTodoRepository, TodoListing,
    TodoRepository, TODOS_BUCKET,
};
pub use service::todo_service::{RemoveOutcome, TodoService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
