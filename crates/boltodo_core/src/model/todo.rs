//! Todo record model.
//!
//! # Responsibility
//! - Define the canonical `(id, text)` record persisted by the store.
//!
//! # Invariants
//! - `id` is assigned once by the store sequence and never changes.
//! - `text` carries no constraints; empty and multi-line values are valid.

use std::fmt::{Display, Formatter};

/// Store-assigned identifier of a todo record.
///
/// Ids come from a monotonic per-store counter starting at 1.
pub type TodoId = u64;

/// One todo item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    /// Counter-assigned id, immutable once persisted.
    pub id: TodoId,
    /// User-supplied text, replaced wholesale on edit.
    pub text: String,
}

impl Todo {
    pub fn new(id: TodoId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }

    /// Returns a copy of this record carrying `text` under the same id.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self::new(self.id, text)
    }
}

impl Display for Todo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}) {}", self.id, self.text)
    }
}
