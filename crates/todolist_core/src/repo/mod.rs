//! Repository layer between transfer objects and the task store.
//!
//! # Responsibility
//! - Translate `TaskDto` values to store records and back.
//! - Enforce id preconditions before touching storage.
//!
//! # Invariants
//! - Each repository call maps to exactly one store call.
//! - Store errors are wrapped, never reinterpreted.

pub mod task_repo;
