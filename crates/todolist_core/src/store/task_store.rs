//! Task store contract and SQLite implementation.
//!
//! # Responsibility
//! - Insert, update and delete one or more task records per call.
//! - Read tasks by id or by reminder completion flag.
//!
//! # Invariants
//! - Inserts ignore caller-supplied ids; SQLite assigns them.
//! - Updates and deletes of unknown ids fail with `NotFound` and roll back
//!   the whole batch.
//! - Read paths reject invalid persisted flags instead of masking them.

use crate::db::DbError;
use crate::model::task::{Reminder, TaskDto, TaskId, TaskState};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TASK_SELECT_SQL: &str = "SELECT
    t.id,
    t.title,
    t.note,
    t.date,
    t.time,
    COALESCE(r.is_completed, 0) AS is_completed
FROM tasks t
LEFT JOIN reminders r ON r.id = t.id";

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level failure for task persistence and queries.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    NotFound(TaskId),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Row view of one task joined with its reminder flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskRecord {
    pub id: TaskId,
    pub title: String,
    pub note: String,
    pub date: String,
    pub time: String,
    pub is_completed: bool,
}

/// Drops the intent tag; the store never persists it.
impl From<&TaskDto> for TaskRecord {
    fn from(dto: &TaskDto) -> Self {
        Self {
            id: dto.id,
            title: dto.title.clone(),
            note: dto.note.clone(),
            date: dto.date.clone(),
            time: dto.time.clone(),
            is_completed: dto.is_completed,
        }
    }
}

/// Loaded tasks are unchanged since they were read, hence [`TaskState::Same`].
impl From<TaskRecord> for TaskDto {
    fn from(record: TaskRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            note: record.note,
            date: record.date,
            time: record.time,
            is_completed: record.is_completed,
            state: TaskState::Same,
        }
    }
}

/// Persistence contract for task records.
pub trait TaskStore {
    /// Inserts records and returns the assigned ids in input order.
    fn insert_tasks(&self, records: &[TaskRecord]) -> StoreResult<Vec<TaskId>>;
    /// Rewrites task fields and completion flags by id.
    fn update_tasks(&self, records: &[TaskRecord]) -> StoreResult<()>;
    /// Deletes tasks (and their reminders) by id.
    fn delete_tasks(&self, records: &[TaskRecord]) -> StoreResult<()>;
    /// Tasks whose reminder is not completed, ordered by id.
    fn get_upcoming(&self) -> StoreResult<Vec<TaskRecord>>;
    /// Tasks whose reminder is completed, ordered by id.
    fn get_completed(&self) -> StoreResult<Vec<TaskRecord>>;
    fn get_by_id(&self, id: TaskId) -> StoreResult<Option<TaskRecord>>;
    /// Rewrites completion flags without touching task fields.
    fn update_reminders(&self, reminders: &[Reminder]) -> StoreResult<()>;
}

impl<S: TaskStore + ?Sized> TaskStore for &S {
    fn insert_tasks(&self, records: &[TaskRecord]) -> StoreResult<Vec<TaskId>> {
        (**self).insert_tasks(records)
    }

    fn update_tasks(&self, records: &[TaskRecord]) -> StoreResult<()> {
        (**self).update_tasks(records)
    }

    fn delete_tasks(&self, records: &[TaskRecord]) -> StoreResult<()> {
        (**self).delete_tasks(records)
    }

    fn get_upcoming(&self) -> StoreResult<Vec<TaskRecord>> {
        (**self).get_upcoming()
    }

    fn get_completed(&self) -> StoreResult<Vec<TaskRecord>> {
        (**self).get_completed()
    }

    fn get_by_id(&self, id: TaskId) -> StoreResult<Option<TaskRecord>> {
        (**self).get_by_id(id)
    }

    fn update_reminders(&self, reminders: &[Reminder]) -> StoreResult<()> {
        (**self).update_reminders(reminders)
    }
}

/// SQLite-backed task store.
pub struct SqliteTaskStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskStore<'conn> {
    /// Wraps a connection returned by [`crate::db::open_db`].
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskStore for SqliteTaskStore<'_> {
    fn insert_tasks(&self, records: &[TaskRecord]) -> StoreResult<Vec<TaskId>> {
        let tx = self.conn.unchecked_transaction()?;
        let mut ids = Vec::with_capacity(records.len());
        {
            let mut insert_task = tx.prepare(
                "INSERT INTO tasks (title, note, date, time)
                 VALUES (?1, ?2, ?3, ?4);",
            )?;
            let mut insert_reminder = tx.prepare(
                "INSERT INTO reminders (id, is_completed)
                 VALUES (?1, ?2);",
            )?;

            for record in records {
                insert_task.execute(params![
                    record.title.as_str(),
                    record.note.as_str(),
                    record.date.as_str(),
                    record.time.as_str(),
                ])?;
                let id = tx.last_insert_rowid();
                insert_reminder.execute(params![id, bool_to_int(record.is_completed)])?;
                ids.push(id);
            }
        }
        tx.commit()?;
        Ok(ids)
    }

    fn update_tasks(&self, records: &[TaskRecord]) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut update_task = tx.prepare(
                "UPDATE tasks
                 SET
                    title = ?2,
                    note = ?3,
                    date = ?4,
                    time = ?5,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?1;",
            )?;
            let mut upsert_reminder = tx.prepare(UPSERT_REMINDER_SQL)?;

            for record in records {
                let changed = update_task.execute(params![
                    record.id,
                    record.title.as_str(),
                    record.note.as_str(),
                    record.date.as_str(),
                    record.time.as_str(),
                ])?;
                if changed == 0 {
                    return Err(StoreError::NotFound(record.id));
                }
                upsert_reminder.execute(params![record.id, bool_to_int(record.is_completed)])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn delete_tasks(&self, records: &[TaskRecord]) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut delete_task = tx.prepare("DELETE FROM tasks WHERE id = ?1;")?;
            for record in records {
                if delete_task.execute([record.id])? == 0 {
                    return Err(StoreError::NotFound(record.id));
                }
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn get_upcoming(&self) -> StoreResult<Vec<TaskRecord>> {
        self.query_by_completion(false)
    }

    fn get_completed(&self) -> StoreResult<Vec<TaskRecord>> {
        self.query_by_completion(true)
    }

    fn get_by_id(&self, id: TaskId) -> StoreResult<Option<TaskRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE t.id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }
        Ok(None)
    }

    fn update_reminders(&self, reminders: &[Reminder]) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut task_exists = tx.prepare("SELECT EXISTS(SELECT 1 FROM tasks WHERE id = ?1);")?;
            let mut upsert_reminder = tx.prepare(UPSERT_REMINDER_SQL)?;
            for reminder in reminders {
                let exists: bool = task_exists.query_row([reminder.id], |row| row.get(0))?;
                if !exists {
                    return Err(StoreError::NotFound(reminder.id));
                }
                upsert_reminder.execute(params![reminder.id, bool_to_int(reminder.is_completed)])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

const UPSERT_REMINDER_SQL: &str = "INSERT INTO reminders (id, is_completed)
    VALUES (?1, ?2)
    ON CONFLICT(id) DO UPDATE SET is_completed = excluded.is_completed;";

impl SqliteTaskStore<'_> {
    fn query_by_completion(&self, is_completed: bool) -> StoreResult<Vec<TaskRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE COALESCE(r.is_completed, 0) = ?1
             ORDER BY t.id ASC;"
        ))?;
        let mut rows = stmt.query([bool_to_int(is_completed)])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_task_row(row)?);
        }
        Ok(records)
    }
}

fn parse_task_row(row: &Row<'_>) -> StoreResult<TaskRecord> {
    let id: TaskId = row.get("id")?;
    let is_completed = match row.get::<_, i64>("is_completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(StoreError::InvalidData(format!(
                "invalid is_completed value `{other}` in reminders.is_completed for task {id}"
            )));
        }
    };

    Ok(TaskRecord {
        id,
        title: row.get("title")?,
        note: row.get("note")?,
        date: row.get("date")?,
        time: row.get("time")?,
        is_completed,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
