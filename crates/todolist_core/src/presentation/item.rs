//! Presentation item for one task row (and for the new-task draft).

use crate::model::task::{TaskDto, TaskId, TaskState};
use serde::{Deserialize, Serialize};

/// One task as rendered by the list, or the in-progress draft.
///
/// `TaskItem::default()` is the empty draft: unsaved, all text empty,
/// tagged [`TaskState::New`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    pub id: TaskId,
    pub title: String,
    pub note: String,
    pub date: String,
    pub time: String,
    pub is_completed: bool,
    pub item_state: TaskState,
}

impl TaskItem {
    /// Applies draft input where empty strings mean "keep the current value".
    pub fn with_draft_input(&self, title: &str, note: &str, date: &str, time: &str) -> Self {
        Self {
            title: non_empty_or(title, &self.title),
            note: non_empty_or(note, &self.note),
            date: non_empty_or(date, &self.date),
            time: non_empty_or(time, &self.time),
            ..self.clone()
        }
    }
}

impl From<&TaskItem> for TaskDto {
    fn from(item: &TaskItem) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            note: item.note.clone(),
            date: item.date.clone(),
            time: item.time.clone(),
            is_completed: item.is_completed,
            state: item.item_state,
        }
    }
}

impl From<TaskDto> for TaskItem {
    fn from(dto: TaskDto) -> Self {
        Self {
            id: dto.id,
            title: dto.title,
            note: dto.note,
            date: dto.date,
            time: dto.time,
            is_completed: dto.is_completed,
            item_state: dto.state,
        }
    }
}

fn non_empty_or(input: &str, current: &str) -> String {
    if input.is_empty() {
        current.to_string()
    } else {
        input.to_string()
    }
}
