//! Todo domain model.
//!
//! # Responsibility
//! - Define the record shape shared by storage, codec and CLI layers.
//!
//! # Invariants
//! - Every persisted record is identified by a counter-assigned `TodoId`.
//! - Deletion is a hard delete; ids are never handed out again.

pub mod todo;
