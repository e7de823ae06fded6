//! Main page state holder.
//!
//! # Responsibility
//! - Own the current [`MainPageState`] and publish every replacement
//!   through a `watch` channel.
//! - Handle [`MainPageEvent`]s: save a task, toggle completion, edit the
//!   new-task draft.
//!
//! # Invariants
//! - Snapshots are replaced wholesale, never patched in place.
//! - `is_loading` is set before every reconciliation and reload and is
//!   cleared once the result (or failure) arrives.
//! - A successful reload always resets the draft.

use crate::model::task::{Reminder, TaskDto, TaskId};
use crate::presentation::item::TaskItem;
use crate::repo::task_repo::TaskRepository;
use crate::service::reconcile::{TaskError, TaskReconciler};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

pub const LOAD_TASK_ERROR: &str = "Could not load tasks";
pub const ADD_TASK_ERROR: &str = "Could not add the task";
pub const UPDATE_TASK_ERROR: &str = "Could not update the task";
pub const REMOVE_TASK_ERROR: &str = "Could not remove the task";
pub const UNKNOWN_ERROR: &str = "Something went wrong";

/// User-visible error notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Toast {
    LoadTaskError,
    AddTaskError,
    UpdateTaskError,
    RemoveTaskError,
    UnknownError,
}

impl Toast {
    /// Fixed message shown to the user.
    pub fn message(self) -> &'static str {
        match self {
            Self::LoadTaskError => LOAD_TASK_ERROR,
            Self::AddTaskError => ADD_TASK_ERROR,
            Self::UpdateTaskError => UPDATE_TASK_ERROR,
            Self::RemoveTaskError => REMOVE_TASK_ERROR,
            Self::UnknownError => UNKNOWN_ERROR,
        }
    }

    /// Stable code for crossing the FFI boundary.
    pub fn code(self) -> &'static str {
        match self {
            Self::LoadTaskError => "load_task_error",
            Self::AddTaskError => "add_task_error",
            Self::UpdateTaskError => "update_task_error",
            Self::RemoveTaskError => "remove_task_error",
            Self::UnknownError => "unknown_error",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "load_task_error" => Some(Self::LoadTaskError),
            "add_task_error" => Some(Self::AddTaskError),
            "update_task_error" => Some(Self::UpdateTaskError),
            "remove_task_error" => Some(Self::RemoveTaskError),
            "unknown_error" => Some(Self::UnknownError),
            _ => None,
        }
    }
}

impl From<TaskError> for Toast {
    fn from(value: TaskError) -> Self {
        match value {
            TaskError::LoadData => Self::LoadTaskError,
            TaskError::AddTask => Self::AddTaskError,
            TaskError::UpdateTask => Self::UpdateTaskError,
            TaskError::RemoveTask => Self::RemoveTaskError,
            TaskError::Unknown => Self::UnknownError,
        }
    }
}

/// Whole observable state of the main page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainPageState {
    pub tasks: Vec<TaskItem>,
    pub is_loading: bool,
    /// In-progress new-task draft.
    pub new_task: TaskItem,
    pub toast: Option<Toast>,
}

impl MainPageState {
    /// Returns this snapshot with draft input applied to `new_task`.
    ///
    /// Empty strings keep the matching draft field.
    pub fn with_draft_input(&self, title: &str, note: &str, date: &str, time: &str) -> Self {
        Self {
            new_task: self.new_task.with_draft_input(title, note, date, time),
            ..self.clone()
        }
    }
}

/// Discrete UI events accepted by [`MainPageViewModel::handle_event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MainPageEvent {
    SaveNewTask(TaskItem),
    /// Flips the reminder flag of a stored task, then reloads.
    SetCompletion { id: TaskId, is_completed: bool },
    /// Empty strings leave the matching draft field unchanged.
    UpdateNewTaskInfo {
        title: String,
        note: String,
        date: String,
        time: String,
    },
}

/// Single-writer state holder for the main page.
pub struct MainPageViewModel<R: TaskRepository> {
    reconciler: TaskReconciler<R>,
    state_tx: watch::Sender<MainPageState>,
}

impl<R: TaskRepository> MainPageViewModel<R> {
    /// Creates the holder and performs the initial reload.
    pub fn new(reconciler: TaskReconciler<R>) -> Self {
        let mut view_model = Self::with_state(reconciler, MainPageState::default());
        view_model.reload();
        view_model
    }

    /// Resumes from an existing snapshot without reloading.
    pub fn with_state(reconciler: TaskReconciler<R>, state: MainPageState) -> Self {
        let (state_tx, _) = watch::channel(state);
        Self {
            reconciler,
            state_tx,
        }
    }

    /// Subscribes to snapshot replacements.
    ///
    /// The receiver starts at the current snapshot; use
    /// `receiver.changed().await` to wait for the next one.
    pub fn subscribe(&self) -> watch::Receiver<MainPageState> {
        self.state_tx.subscribe()
    }

    /// Returns a copy of the current snapshot.
    pub fn state(&self) -> MainPageState {
        self.state_tx.borrow().clone()
    }

    pub fn handle_event(&mut self, event: MainPageEvent) {
        match event {
            MainPageEvent::SaveNewTask(task) => self.save_task(&task),
            MainPageEvent::SetCompletion { id, is_completed } => {
                self.set_completion(id, is_completed)
            }
            MainPageEvent::UpdateNewTaskInfo {
                title,
                note,
                date,
                time,
            } => self.update_new_task_info(&title, &note, &date, &time),
        }
    }

    /// Clears the toast once the UI has shown it.
    pub fn consume_toast(&mut self) {
        let current = self.state();
        if current.toast.is_some() {
            self.publish(MainPageState {
                toast: None,
                ..current
            });
        }
    }

    /// Reloads the task list from storage.
    pub fn reload(&mut self) {
        self.publish(MainPageState {
            is_loading: true,
            ..self.state()
        });

        match self.reconciler.load() {
            Ok(tasks) => {
                debug!(
                    "event=main_page_reload module=presentation status=ok count={}",
                    tasks.len()
                );
                self.publish(MainPageState {
                    tasks: tasks.into_iter().map(TaskItem::from).collect(),
                    is_loading: false,
                    new_task: TaskItem::default(),
                    ..self.state()
                });
            }
            Err(err) => self.handle_error(err),
        }
    }

    fn save_task(&mut self, task: &TaskItem) {
        debug!(
            "event=main_page_save module=presentation status=start state={} task_id={}",
            task.item_state.as_str(),
            task.id
        );
        self.publish(MainPageState {
            is_loading: true,
            ..self.state()
        });

        match self.reconciler.apply(&TaskDto::from(task)) {
            Ok(()) => self.reload(),
            Err(err) => self.handle_error(err),
        }
    }

    fn set_completion(&mut self, id: TaskId, is_completed: bool) {
        debug!(
            "event=main_page_set_completion module=presentation status=start task_id={id} is_completed={is_completed}"
        );
        self.publish(MainPageState {
            is_loading: true,
            ..self.state()
        });

        match self
            .reconciler
            .set_completion(&[Reminder { id, is_completed }])
        {
            Ok(()) => self.reload(),
            Err(err) => self.handle_error(err),
        }
    }

    fn update_new_task_info(&mut self, title: &str, note: &str, date: &str, time: &str) {
        let current = self.state();
        let next = current.with_draft_input(title, note, date, time);
        if next != current {
            self.publish(next);
        }
    }

    fn handle_error(&mut self, err: TaskError) {
        warn!(
            "event=main_page_error module=presentation status=error error_code={}",
            err.code()
        );
        self.publish(MainPageState {
            is_loading: false,
            toast: Some(Toast::from(err)),
            ..self.state()
        });
    }

    fn publish(&self, next: MainPageState) {
        self.state_tx.send_replace(next);
    }
}
