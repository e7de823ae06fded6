//! Presentation state for the main task list screen.
//!
//! # Responsibility
//! - Hold one immutable snapshot of the screen and republish it on change.
//! - Translate UI events into reconciliation and reload calls.
//!
//! # Invariants
//! - Exactly one snapshot is current; observers only see whole snapshots.
//! - Events are handled one at a time by the single writer.

pub mod item;
pub mod main_page;
