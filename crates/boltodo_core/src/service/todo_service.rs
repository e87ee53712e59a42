//! Todo use-case service.
//!
//! # Responsibility
//! - Provide add/get/edit/remove/list entry points for command callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Edit never fabricates ids; only `add` consumes the id sequence.
//! - Service layer remains storage-agnostic.

use crate::model::todo::{Todo, TodoId};
use crate::repo::todo_repo::{RepoResult, TodoListing, TodoRepository};

/// Use-case service wrapper for todo operations.
pub struct TodoService<R: TodoRepository> {
    repo: R,
}

/// Outcome of a remove request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// Nothing was stored under the id; treated as success.
    AlreadyAbsent,
}

impl<R: TodoRepository> TodoService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a todo with a freshly assigned id.
    pub fn add(&self, text: impl AsRef<str>) -> RepoResult<Todo> {
        self.repo.create(text.as_ref())
    }

    pub fn get(&self, id: TodoId) -> RepoResult<Todo> {
        self.repo.get(id)
    }

    /// Replaces the text of an existing todo.
    ///
    /// Returns `RepoError::NotFound` when `id` holds no record; nothing is
    /// written in that case.
    pub fn edit(&self, id: TodoId, text: impl Into<String>) -> RepoResult<Todo> {
        let todo = Todo::new(id, text);
        self.repo.update(&todo)?;
        Ok(todo)
    }

    /// Removes a todo. Removing an absent id is a no-op.
    pub fn remove(&self, id: TodoId) -> RepoResult<RemoveOutcome> {
        if self.repo.delete(id)? {
            Ok(RemoveOutcome::Removed)
        } else {
            Ok(RemoveOutcome::AlreadyAbsent)
        }
    }

    /// Lists all todos in ascending id order, with corrupt entries reported
    /// alongside.
    pub fn list(&self) -> RepoResult<TodoListing> {
        self.repo.list()
    }
}
