//! Core use-case services.
//!
//! # Responsibility
//! - Turn tagged task changes into repository calls.
//! - Keep presentation/FFI layers decoupled from storage details.

pub mod reconcile;
