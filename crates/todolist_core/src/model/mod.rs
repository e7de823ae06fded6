//! Task domain model.
//!
//! # Responsibility
//! - Define the transfer object carried across the reconciliation boundary.
//! - Stay a leaf: projections in `presentation` and `store` convert into and
//!   out of these types, never the other way round.
//!
//! # Invariants
//! - Task ids are assigned by the store; `0` means "not yet persisted".

pub mod task;
