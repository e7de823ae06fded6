//! Persisted task record store.
//!
//! # Responsibility
//! - Own the SQL for the `tasks` and `reminders` tables.
//! - Expose batch writes and point/filtered reads over task records.
//!
//! # Invariants
//! - Every task row has exactly one reminder row with the same id.
//! - Multi-record writes are all-or-nothing.

pub mod task_store;
