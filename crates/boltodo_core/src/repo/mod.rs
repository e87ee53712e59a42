//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate bucket/SQLite details from service orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `Format`) in
//!   addition to storage transport errors.

pub mod todo_repo;
