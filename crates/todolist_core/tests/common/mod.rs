#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use todolist_core::{
    MainPageState, RepoError, RepoResult, Reminder, StoreError, TaskDto, TaskId, TaskRepository,
    TaskState,
};
use tokio::sync::watch;

/// In-memory repository that records every call and can fail on demand.
#[derive(Default)]
pub struct RecordingRepository {
    pub calls: RefCell<Vec<&'static str>>,
    pub tasks: RefCell<Vec<TaskDto>>,
    pub failing: RefCell<Vec<&'static str>>,
    /// Loading flag observed through `observer` at each call.
    pub loading_seen: RefCell<Vec<(&'static str, bool)>>,
    pub observer: RefCell<Option<watch::Receiver<MainPageState>>>,
    next_id: Cell<TaskId>,
}

impl RecordingRepository {
    pub fn fail_on(&self, operation: &'static str) {
        self.failing.borrow_mut().push(operation);
    }

    pub fn observe(&self, receiver: watch::Receiver<MainPageState>) {
        *self.observer.borrow_mut() = Some(receiver);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    pub fn seed(&self, title: &str) -> TaskDto {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let mut task = TaskDto::new(title, "", "", "").with_state(TaskState::Same);
        task.id = id;
        self.tasks.borrow_mut().push(task.clone());
        task
    }

    fn enter(&self, operation: &'static str) -> RepoResult<()> {
        self.calls.borrow_mut().push(operation);
        if let Some(receiver) = self.observer.borrow().as_ref() {
            let is_loading = receiver.borrow().is_loading;
            self.loading_seen.borrow_mut().push((operation, is_loading));
        }
        if self.failing.borrow().contains(&operation) {
            return Err(RepoError::Store(StoreError::InvalidData(format!(
                "injected {operation} failure"
            ))));
        }
        Ok(())
    }
}

impl TaskRepository for RecordingRepository {
    fn add(&self, task: &TaskDto) -> RepoResult<TaskId> {
        self.enter("add")?;
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let mut stored = task.clone().with_state(TaskState::Same);
        stored.id = id;
        self.tasks.borrow_mut().push(stored);
        Ok(id)
    }

    fn update(&self, task: &TaskDto) -> RepoResult<()> {
        self.enter("update")?;
        if let Some(stored) = self
            .tasks
            .borrow_mut()
            .iter_mut()
            .find(|stored| stored.id == task.id)
        {
            *stored = task.clone().with_state(TaskState::Same);
        }
        Ok(())
    }

    fn remove(&self, task: &TaskDto) -> RepoResult<()> {
        self.enter("remove")?;
        self.tasks.borrow_mut().retain(|stored| stored.id != task.id);
        Ok(())
    }

    fn list_upcoming(&self) -> RepoResult<Vec<TaskDto>> {
        self.enter("list_upcoming")?;
        Ok(self
            .tasks
            .borrow()
            .iter()
            .filter(|task| !task.is_completed)
            .cloned()
            .collect())
    }

    fn list_completed(&self) -> RepoResult<Vec<TaskDto>> {
        self.enter("list_completed")?;
        Ok(self
            .tasks
            .borrow()
            .iter()
            .filter(|task| task.is_completed)
            .cloned()
            .collect())
    }

    fn get_by_id(&self, id: TaskId) -> RepoResult<Option<TaskDto>> {
        self.enter("get_by_id")?;
        Ok(self.tasks.borrow().iter().find(|task| task.id == id).cloned())
    }

    fn update_reminders(&self, reminders: &[Reminder]) -> RepoResult<()> {
        self.enter("update_reminders")?;
        for reminder in reminders {
            if let Some(stored) = self
                .tasks
                .borrow_mut()
                .iter_mut()
                .find(|stored| stored.id == reminder.id)
            {
                stored.is_completed = reminder.is_completed;
            }
        }
        Ok(())
    }
}
