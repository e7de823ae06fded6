//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the main page events and snapshot to Dart via FRB.
//! - Keep the Dart side stateless with respect to storage: every call opens
//!   the configured database, applies one event and returns the next
//!   snapshot.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Failures are reported through the snapshot toast, never thrown.

use log::warn;
use std::path::Path;
use std::sync::OnceLock;
use todolist_core::db::open_db;
use todolist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    CoreConfig, LocalTaskRepository, MainPageEvent, MainPageState, MainPageViewModel,
    SqliteTaskStore, TaskError, TaskId, TaskItem, TaskReconciler, TaskState, Toast,
};

static CONFIG: OnceLock<CoreConfig> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One task row (or the draft) as seen by Dart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskItemView {
    pub id: i64,
    pub title: String,
    pub note: String,
    pub date: String,
    pub time: String,
    pub is_completed: bool,
    /// One of `new|updated|completed|same`.
    pub item_state: String,
}

/// Main page snapshot as seen by Dart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MainPageSnapshot {
    pub tasks: Vec<TaskItemView>,
    pub is_loading: bool,
    pub new_task: TaskItemView,
    /// Stable toast code, e.g. `update_task_error`.
    pub toast_code: Option<String>,
    /// User-facing toast text matching `toast_code`.
    pub toast_message: Option<String>,
}

/// Opens the main page: loads all tasks into a fresh snapshot.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - DB open failure yields an idle snapshot with the load toast.
#[flutter_rust_bridge::frb(sync)]
pub fn main_page_open() -> MainPageSnapshot {
    open_page_at(&resolve_config().db_path)
}

/// Saves one task (intent taken from `task.item_state`) and reloads.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Invalid `item_state` values yield the unknown-error toast.
/// - DB open failure yields the toast of the requested intent.
#[flutter_rust_bridge::frb(sync)]
pub fn main_page_save_task(snapshot: MainPageSnapshot, task: TaskItemView) -> MainPageSnapshot {
    save_task_at(&resolve_config().db_path, snapshot, task)
}

/// Marks a stored task completed (or not) and reloads.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Unknown `task_id` or DB open failure yields the update toast.
#[flutter_rust_bridge::frb(sync)]
pub fn main_page_set_completion(
    snapshot: MainPageSnapshot,
    task_id: i64,
    is_completed: bool,
) -> MainPageSnapshot {
    set_completion_at(&resolve_config().db_path, snapshot, task_id, is_completed)
}

/// Applies draft input; empty strings keep the current draft field.
///
/// # FFI contract
/// - Sync call, no DB access.
#[flutter_rust_bridge::frb(sync)]
pub fn main_page_update_new_task_info(
    snapshot: MainPageSnapshot,
    title: String,
    note: String,
    date: String,
    time: String,
) -> MainPageSnapshot {
    match to_state(&snapshot) {
        Ok(state) => to_snapshot(&state.with_draft_input(&title, &note, &date, &time)),
        Err(err) => {
            warn!("event=ffi_main_page_draft module=ffi status=error error={err}");
            with_toast(snapshot, Toast::UnknownError)
        }
    }
}

/// Clears the toast after Dart has shown it.
#[flutter_rust_bridge::frb(sync)]
pub fn main_page_consume_toast(snapshot: MainPageSnapshot) -> MainPageSnapshot {
    MainPageSnapshot {
        toast_code: None,
        toast_message: None,
        ..snapshot
    }
}

fn open_page_at(db_path: &Path) -> MainPageSnapshot {
    let conn = match open_db(db_path) {
        Ok(conn) => conn,
        Err(err) => {
            warn!("event=ffi_main_page_open module=ffi status=error error={err}");
            return failure_snapshot(MainPageState::default(), Toast::LoadTaskError);
        }
    };

    let repo = LocalTaskRepository::new(SqliteTaskStore::new(&conn));
    let view_model = MainPageViewModel::new(TaskReconciler::new(repo));
    to_snapshot(&view_model.state())
}

fn save_task_at(
    db_path: &Path,
    snapshot: MainPageSnapshot,
    task: TaskItemView,
) -> MainPageSnapshot {
    let (state, task) = match (to_state(&snapshot), to_item(&task)) {
        (Ok(state), Ok(task)) => (state, task),
        (Err(err), _) | (_, Err(err)) => {
            warn!("event=ffi_main_page_save module=ffi status=error error={err}");
            return with_toast(snapshot, Toast::UnknownError);
        }
    };

    let open_failure = Toast::from(TaskError::for_intent(task.item_state));
    apply_event_at(
        db_path,
        "ffi_main_page_save",
        state,
        MainPageEvent::SaveNewTask(task),
        open_failure,
    )
}

fn set_completion_at(
    db_path: &Path,
    snapshot: MainPageSnapshot,
    task_id: TaskId,
    is_completed: bool,
) -> MainPageSnapshot {
    let state = match to_state(&snapshot) {
        Ok(state) => state,
        Err(err) => {
            warn!("event=ffi_main_page_set_completion module=ffi status=error error={err}");
            return with_toast(snapshot, Toast::UnknownError);
        }
    };

    apply_event_at(
        db_path,
        "ffi_main_page_set_completion",
        state,
        MainPageEvent::SetCompletion {
            id: task_id,
            is_completed,
        },
        Toast::UpdateTaskError,
    )
}

fn apply_event_at(
    db_path: &Path,
    log_event: &'static str,
    state: MainPageState,
    event: MainPageEvent,
    open_failure: Toast,
) -> MainPageSnapshot {
    let conn = match open_db(db_path) {
        Ok(conn) => conn,
        Err(err) => {
            warn!(
                "event={log_event} module=ffi status=error error_code={} error={err}",
                open_failure.code()
            );
            return failure_snapshot(state, open_failure);
        }
    };

    let repo = LocalTaskRepository::new(SqliteTaskStore::new(&conn));
    let mut view_model = MainPageViewModel::with_state(TaskReconciler::new(repo), state);
    view_model.handle_event(event);
    to_snapshot(&view_model.state())
}

fn resolve_config() -> &'static CoreConfig {
    CONFIG.get_or_init(CoreConfig::from_env)
}

fn to_item(view: &TaskItemView) -> Result<TaskItem, String> {
    let item_state = TaskState::parse(view.item_state.trim())
        .ok_or_else(|| format!("unsupported item_state `{}`", view.item_state))?;
    Ok(TaskItem {
        id: view.id,
        title: view.title.clone(),
        note: view.note.clone(),
        date: view.date.clone(),
        time: view.time.clone(),
        is_completed: view.is_completed,
        item_state,
    })
}

fn to_view(item: &TaskItem) -> TaskItemView {
    TaskItemView {
        id: item.id,
        title: item.title.clone(),
        note: item.note.clone(),
        date: item.date.clone(),
        time: item.time.clone(),
        is_completed: item.is_completed,
        item_state: item.item_state.as_str().to_string(),
    }
}

fn to_state(snapshot: &MainPageSnapshot) -> Result<MainPageState, String> {
    let tasks = snapshot
        .tasks
        .iter()
        .map(to_item)
        .collect::<Result<Vec<_>, _>>()?;
    let new_task = if snapshot.new_task.item_state.is_empty() {
        TaskItem::default()
    } else {
        to_item(&snapshot.new_task)?
    };
    Ok(MainPageState {
        tasks,
        is_loading: snapshot.is_loading,
        new_task,
        toast: snapshot.toast_code.as_deref().and_then(Toast::from_code),
    })
}

fn to_snapshot(state: &MainPageState) -> MainPageSnapshot {
    MainPageSnapshot {
        tasks: state.tasks.iter().map(to_view).collect(),
        is_loading: state.is_loading,
        new_task: to_view(&state.new_task),
        toast_code: state.toast.map(|toast| toast.code().to_string()),
        toast_message: state.toast.map(|toast| toast.message().to_string()),
    }
}

fn failure_snapshot(state: MainPageState, toast: Toast) -> MainPageSnapshot {
    to_snapshot(&MainPageState {
        is_loading: false,
        toast: Some(toast),
        ..state
    })
}

fn with_toast(snapshot: MainPageSnapshot, toast: Toast) -> MainPageSnapshot {
    MainPageSnapshot {
        is_loading: false,
        toast_code: Some(toast.code().to_string()),
        toast_message: Some(toast.message().to_string()),
        ..snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, main_page_consume_toast, main_page_open,
        main_page_save_task, main_page_set_completion, main_page_update_new_task_info,
        open_page_at, ping, resolve_config, save_task_at, set_completion_at, MainPageSnapshot,
        TaskItemView,
    };
    use std::time::{SystemTime, UNIX_EPOCH};
    use todolist_core::db::open_db;

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(error.contains("verbose"));
    }

    #[test]
    fn draft_update_keeps_fields_for_empty_input() {
        let opened = MainPageSnapshot::default();
        let first = main_page_update_new_task_info(
            opened,
            "Buy milk".to_string(),
            String::new(),
            "2024-01-01".to_string(),
            String::new(),
        );
        let second = main_page_update_new_task_info(
            first.clone(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        );

        assert_eq!(first.new_task.title, "Buy milk");
        assert_eq!(first.new_task.date, "2024-01-01");
        assert_eq!(second, first);
    }

    #[test]
    fn save_new_task_persists_and_resets_draft() {
        let title = unique_token("ffi-save");
        let opened = main_page_open();
        let draft = TaskItemView {
            title: title.clone(),
            item_state: "new".to_string(),
            ..TaskItemView::default()
        };

        let saved = main_page_save_task(opened, draft);

        assert_eq!(saved.toast_code, None);
        assert!(!saved.is_loading);
        assert_eq!(saved.new_task.title, "");
        let item = saved
            .tasks
            .iter()
            .find(|item| item.title == title)
            .expect("saved task should be listed");
        assert_eq!(item.item_state, "same");

        let conn = open_db(&resolve_config().db_path).expect("open db");
        let stored: String = conn
            .query_row("SELECT title FROM tasks WHERE id = ?1", [item.id], |row| {
                row.get(0)
            })
            .expect("query task row");
        assert_eq!(stored, title);
    }

    #[test]
    fn save_with_unknown_state_reports_unknown_error() {
        let task = TaskItemView {
            title: "bad".to_string(),
            item_state: "archived".to_string(),
            ..TaskItemView::default()
        };

        let response = main_page_save_task(MainPageSnapshot::default(), task);
        assert_eq!(response.toast_code.as_deref(), Some("unknown_error"));
        assert!(response.toast_message.is_some());
    }

    #[test]
    fn updating_missing_task_reports_update_error_and_can_be_consumed() {
        let task = TaskItemView {
            id: i64::MAX,
            title: unique_token("ffi-missing"),
            item_state: "updated".to_string(),
            ..TaskItemView::default()
        };

        let response = main_page_save_task(MainPageSnapshot::default(), task);
        assert_eq!(response.toast_code.as_deref(), Some("update_task_error"));

        let consumed = main_page_consume_toast(response);
        assert_eq!(consumed.toast_code, None);
        assert_eq!(consumed.toast_message, None);
    }

    #[test]
    fn draft_update_keeps_listed_tasks_and_toast() {
        let snapshot = MainPageSnapshot {
            tasks: vec![TaskItemView {
                id: 7,
                title: "listed".to_string(),
                item_state: "same".to_string(),
                ..TaskItemView::default()
            }],
            toast_code: Some("add_task_error".to_string()),
            toast_message: Some("Could not add the task".to_string()),
            ..MainPageSnapshot::default()
        };

        let updated = main_page_update_new_task_info(
            snapshot.clone(),
            String::new(),
            "note".to_string(),
            String::new(),
            "09:00".to_string(),
        );

        assert_eq!(updated.tasks, snapshot.tasks);
        assert_eq!(updated.toast_code, snapshot.toast_code);
        assert_eq!(updated.new_task.note, "note");
        assert_eq!(updated.new_task.time, "09:00");
        assert_eq!(updated.new_task.item_state, "new");
    }

    #[test]
    fn failed_open_reports_load_toast() {
        let dir = tempfile::tempdir().unwrap();

        let opened = open_page_at(dir.path());

        assert_eq!(opened.toast_code.as_deref(), Some("load_task_error"));
        assert!(!opened.is_loading);
        assert!(opened.tasks.is_empty());
    }

    #[test]
    fn failed_open_during_save_reports_toast_of_the_intent() {
        let dir = tempfile::tempdir().unwrap();
        let listed = MainPageSnapshot {
            tasks: vec![TaskItemView {
                id: 3,
                title: "listed".to_string(),
                item_state: "same".to_string(),
                ..TaskItemView::default()
            }],
            ..MainPageSnapshot::default()
        };
        let cases = [
            ("new", "add_task_error"),
            ("updated", "update_task_error"),
            ("same", "update_task_error"),
            ("completed", "remove_task_error"),
        ];

        for (item_state, expected) in cases {
            let task = TaskItemView {
                id: 3,
                title: "listed".to_string(),
                item_state: item_state.to_string(),
                ..TaskItemView::default()
            };

            let response = save_task_at(dir.path(), listed.clone(), task);

            assert_eq!(
                response.toast_code.as_deref(),
                Some(expected),
                "item_state {item_state}"
            );
            assert!(!response.is_loading);
            assert_eq!(response.tasks, listed.tasks);
        }
    }

    #[test]
    fn failed_open_during_completion_toggle_reports_update_toast() {
        let dir = tempfile::tempdir().unwrap();

        let response = set_completion_at(dir.path(), MainPageSnapshot::default(), 1, true);

        assert_eq!(response.toast_code.as_deref(), Some("update_task_error"));
        assert!(!response.is_loading);
    }

    #[test]
    fn completion_toggle_persists_and_reloads() {
        let title = unique_token("ffi-complete");
        let draft = TaskItemView {
            title: title.clone(),
            item_state: "new".to_string(),
            ..TaskItemView::default()
        };
        let saved = main_page_save_task(main_page_open(), draft);
        let id = saved
            .tasks
            .iter()
            .find(|item| item.title == title)
            .expect("saved task should be listed")
            .id;

        let toggled = main_page_set_completion(saved, id, true);

        assert_eq!(toggled.toast_code, None);
        let item = toggled
            .tasks
            .iter()
            .find(|item| item.id == id)
            .expect("toggled task should stay listed");
        assert!(item.is_completed);
    }

    #[test]
    fn completion_toggle_of_missing_task_reports_update_toast() {
        let response = main_page_set_completion(MainPageSnapshot::default(), i64::MAX, true);
        assert_eq!(response.toast_code.as_deref(), Some("update_task_error"));
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
