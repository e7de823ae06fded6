//! Task-state reconciliation.
//!
//! # Responsibility
//! - Dispatch a tagged task change to the matching repository operation.
//! - Load the task lists shown by the main page.
//! - Collapse repository failures into the flat [`TaskError`] taxonomy.
//!
//! # Invariants
//! - `New -> add`, `Updated -> update`, `Same -> update`,
//!   `Completed -> remove`.
//! - Store failures become the category of the attempted operation; any
//!   other repository failure becomes `Unknown`.
//! - The original cause is logged here and never returned.

use crate::model::task::{Reminder, TaskDto, TaskState};
use crate::repo::task_repo::{RepoError, TaskRepository};
use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Categorized failure surfaced to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskError {
    LoadData,
    AddTask,
    UpdateTask,
    RemoveTask,
    Unknown,
}

impl TaskError {
    /// Stable error code used in log lines.
    pub fn code(self) -> &'static str {
        match self {
            Self::LoadData => "load_data_failed",
            Self::AddTask => "add_task_failed",
            Self::UpdateTask => "update_task_failed",
            Self::RemoveTask => "remove_task_failed",
            Self::Unknown => "unknown",
        }
    }

    /// Category reported when the operation for `state` cannot complete.
    pub fn for_intent(state: TaskState) -> Self {
        match state {
            TaskState::New => Self::AddTask,
            TaskState::Updated | TaskState::Same => Self::UpdateTask,
            TaskState::Completed => Self::RemoveTask,
        }
    }
}

impl Display for TaskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoadData => write!(f, "failed to load tasks"),
            Self::AddTask => write!(f, "failed to add task"),
            Self::UpdateTask => write!(f, "failed to update task"),
            Self::RemoveTask => write!(f, "failed to remove task"),
            Self::Unknown => write!(f, "unknown task error"),
        }
    }
}

impl Error for TaskError {}

/// Reconciles task changes against a repository.
pub struct TaskReconciler<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskReconciler<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Applies one tagged task change.
    ///
    /// # Errors
    /// Returns the category of the attempted operation; no retry happens.
    pub fn apply(&self, task: &TaskDto) -> Result<(), TaskError> {
        debug!(
            "event=task_reconcile module=service status=start state={} task_id={}",
            task.state.as_str(),
            task.id
        );

        let (operation, result) = match task.state {
            TaskState::New => ("add", self.repo.add(task).map(|_| ())),
            TaskState::Updated | TaskState::Same => ("update", self.repo.update(task)),
            TaskState::Completed => ("remove", self.repo.remove(task)),
        };

        let category = TaskError::for_intent(task.state);
        result.map_err(|err| categorize("task_reconcile", operation, category, &err))?;
        debug!(
            "event=task_reconcile module=service status=ok op={operation} task_id={}",
            task.id
        );
        Ok(())
    }

    /// Loads upcoming tasks followed by completed tasks.
    pub fn load(&self) -> Result<Vec<TaskDto>, TaskError> {
        let mut tasks = self
            .repo
            .list_upcoming()
            .map_err(|err| categorize("task_load", "list_upcoming", TaskError::LoadData, &err))?;
        let completed = self
            .repo
            .list_completed()
            .map_err(|err| categorize("task_load", "list_completed", TaskError::LoadData, &err))?;
        tasks.extend(completed);

        debug!(
            "event=task_load module=service status=ok count={}",
            tasks.len()
        );
        Ok(tasks)
    }

    /// Rewrites reminder completion flags without editing task fields.
    pub fn set_completion(&self, reminders: &[Reminder]) -> Result<(), TaskError> {
        self.repo.update_reminders(reminders).map_err(|err| {
            categorize(
                "task_reconcile",
                "update_reminders",
                TaskError::UpdateTask,
                &err,
            )
        })
    }
}

fn categorize(
    event: &'static str,
    operation: &'static str,
    category: TaskError,
    err: &RepoError,
) -> TaskError {
    let mapped = match err {
        RepoError::Store(_) => category,
        RepoError::MissingId { .. } => TaskError::Unknown,
    };
    error!(
        "event={event} module=service status=error op={operation} error_code={} error={err}",
        mapped.code()
    );
    mapped
}
