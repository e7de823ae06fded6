//! Task repository contract and store-backed implementation.
//!
//! # Invariants
//! - `update`/`remove` require a store-assigned id.
//! - `add` discards any caller-supplied id.
//! - Mutations are applied immediately; nothing is staged.

use crate::model::task::{Reminder, TaskDto, TaskId, UNASSIGNED_TASK_ID};
use crate::store::task_store::{StoreError, TaskRecord, TaskStore};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for task operations.
#[derive(Debug)]
pub enum RepoError {
    /// Store-layer failure, passed through unchanged.
    Store(StoreError),
    /// `update`/`remove` called with a task the store never assigned an id.
    MissingId { operation: &'static str },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::MissingId { operation } => {
                write!(f, "task {operation} requires a store-assigned id")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::MissingId { .. } => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Use-case level task persistence.
pub trait TaskRepository {
    /// Persists a new task and returns its assigned id.
    fn add(&self, task: &TaskDto) -> RepoResult<TaskId>;
    fn update(&self, task: &TaskDto) -> RepoResult<()>;
    fn remove(&self, task: &TaskDto) -> RepoResult<()>;
    fn list_upcoming(&self) -> RepoResult<Vec<TaskDto>>;
    fn list_completed(&self) -> RepoResult<Vec<TaskDto>>;
    fn get_by_id(&self, id: TaskId) -> RepoResult<Option<TaskDto>>;
    /// Rewrites completion flags only.
    fn update_reminders(&self, reminders: &[Reminder]) -> RepoResult<()>;
}

impl<R: TaskRepository + ?Sized> TaskRepository for &R {
    fn add(&self, task: &TaskDto) -> RepoResult<TaskId> {
        (**self).add(task)
    }

    fn update(&self, task: &TaskDto) -> RepoResult<()> {
        (**self).update(task)
    }

    fn remove(&self, task: &TaskDto) -> RepoResult<()> {
        (**self).remove(task)
    }

    fn list_upcoming(&self) -> RepoResult<Vec<TaskDto>> {
        (**self).list_upcoming()
    }

    fn list_completed(&self) -> RepoResult<Vec<TaskDto>> {
        (**self).list_completed()
    }

    fn get_by_id(&self, id: TaskId) -> RepoResult<Option<TaskDto>> {
        (**self).get_by_id(id)
    }

    fn update_reminders(&self, reminders: &[Reminder]) -> RepoResult<()> {
        (**self).update_reminders(reminders)
    }
}

/// Repository over a local [`TaskStore`].
pub struct LocalTaskRepository<S: TaskStore> {
    store: S,
}

impl<S: TaskStore> LocalTaskRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: TaskStore> TaskRepository for LocalTaskRepository<S> {
    fn add(&self, task: &TaskDto) -> RepoResult<TaskId> {
        let mut record = TaskRecord::from(task);
        record.id = UNASSIGNED_TASK_ID;

        let ids = self.store.insert_tasks(std::slice::from_ref(&record))?;
        ids.first().copied().ok_or_else(|| {
            RepoError::Store(StoreError::InvalidData(
                "insert returned no task id".to_string(),
            ))
        })
    }

    fn update(&self, task: &TaskDto) -> RepoResult<()> {
        require_assigned_id(task, "update")?;
        self.store.update_tasks(&[TaskRecord::from(task)])?;
        Ok(())
    }

    fn remove(&self, task: &TaskDto) -> RepoResult<()> {
        require_assigned_id(task, "remove")?;
        self.store.delete_tasks(&[TaskRecord::from(task)])?;
        Ok(())
    }

    fn list_upcoming(&self) -> RepoResult<Vec<TaskDto>> {
        let records = self.store.get_upcoming()?;
        Ok(records.into_iter().map(TaskDto::from).collect())
    }

    fn list_completed(&self) -> RepoResult<Vec<TaskDto>> {
        let records = self.store.get_completed()?;
        Ok(records.into_iter().map(TaskDto::from).collect())
    }

    fn get_by_id(&self, id: TaskId) -> RepoResult<Option<TaskDto>> {
        Ok(self.store.get_by_id(id)?.map(TaskDto::from))
    }

    fn update_reminders(&self, reminders: &[Reminder]) -> RepoResult<()> {
        self.store.update_reminders(reminders)?;
        Ok(())
    }
}

fn require_assigned_id(task: &TaskDto, operation: &'static str) -> RepoResult<()> {
    if task.has_assigned_id() {
        Ok(())
    } else {
        Err(RepoError::MissingId { operation })
    }
}
