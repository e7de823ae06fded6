//! Core domain logic for the to-do list app.
//! Owns task persistence, task-state reconciliation and main page state.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod presentation;
pub mod repo;
pub mod service;
pub mod store;

pub use config::CoreConfig;
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::task::{Reminder, TaskDto, TaskId, TaskState, UNASSIGNED_TASK_ID};
pub use presentation::item::TaskItem;
pub use presentation::main_page::{MainPageEvent, MainPageState, MainPageViewModel, Toast};
pub use repo::task_repo::{LocalTaskRepository, RepoError, RepoResult, TaskRepository};
pub use service::reconcile::{TaskError, TaskReconciler};
pub use store::task_store::{SqliteTaskStore, StoreError, StoreResult, TaskRecord, TaskStore};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
