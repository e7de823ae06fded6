//! Task transfer objects and intents.
//!
//! # Responsibility
//! - Describe one task change together with the caller's intended operation.
//! - Describe reminder completion flags shared with the store.
//!
//! # Invariants
//! - `id == UNASSIGNED_TASK_ID` until the store assigns one on insert.
//! - A reminder shares its id with the task it belongs to.

use serde::{Deserialize, Serialize};

/// Store-assigned task identifier.
pub type TaskId = i64;

/// Placeholder id carried by tasks that were never persisted.
pub const UNASSIGNED_TASK_ID: TaskId = 0;

/// Caller intent attached to a task change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Never persisted; will be inserted.
    #[default]
    New,
    /// Edited by the user.
    Updated,
    /// Checked off; the task is removed from storage.
    Completed,
    /// Unchanged since it was loaded.
    Same,
}

impl TaskState {
    /// Stable lowercase label used by FFI and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Updated => "updated",
            Self::Completed => "completed",
            Self::Same => "same",
        }
    }

    /// Parses a label produced by [`TaskState::as_str`].
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "new" => Some(Self::New),
            "updated" => Some(Self::Updated),
            "completed" => Some(Self::Completed),
            "same" => Some(Self::Same),
            _ => None,
        }
    }
}

/// Transfer object for one task change.
///
/// Constructed per user action, consumed by reconciliation and then dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDto {
    pub id: TaskId,
    pub title: String,
    pub note: String,
    /// Free-form date text as entered by the user.
    pub date: String,
    /// Free-form time text as entered by the user.
    pub time: String,
    pub is_completed: bool,
    pub state: TaskState,
}

impl TaskDto {
    /// Creates an unsaved task tagged [`TaskState::New`].
    pub fn new(
        title: impl Into<String>,
        note: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            id: UNASSIGNED_TASK_ID,
            title: title.into(),
            note: note.into(),
            date: date.into(),
            time: time.into(),
            is_completed: false,
            state: TaskState::New,
        }
    }

    /// Returns a copy tagged with another intent.
    pub fn with_state(mut self, state: TaskState) -> Self {
        self.state = state;
        self
    }

    /// Returns whether the store already assigned this task an id.
    pub fn has_assigned_id(&self) -> bool {
        self.id != UNASSIGNED_TASK_ID
    }
}

/// Completion flag persisted next to every task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: TaskId,
    pub is_completed: bool,
}

#[cfg(test)]
mod tests {
    use super::{TaskDto, TaskState, UNASSIGNED_TASK_ID};

    #[test]
    fn new_task_is_unassigned_and_tagged_new() {
        let task = TaskDto::new("Buy milk", "", "2024-01-01", "");
        assert_eq!(task.id, UNASSIGNED_TASK_ID);
        assert!(!task.has_assigned_id());
        assert_eq!(task.state, TaskState::New);
    }

    #[test]
    fn state_labels_parse_back() {
        for state in [
            TaskState::New,
            TaskState::Updated,
            TaskState::Completed,
            TaskState::Same,
        ] {
            assert_eq!(TaskState::parse(state.as_str()), Some(state));
        }
        assert_eq!(TaskState::parse("done"), None);
    }

    #[test]
    fn state_serializes_as_snake_case() {
        let json = serde_json::to_string(&TaskState::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
    }
}
