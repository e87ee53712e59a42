//! Use-case services over repository contracts.
//!
//! # Responsibility
//! - Offer the five user operations as storage-agnostic entry points.

pub mod todo_service;
