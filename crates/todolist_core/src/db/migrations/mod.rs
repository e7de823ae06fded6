//! Embedded schema steps for the task database.
//!
//! Each step is `(version, sql)`; versions strictly increase and the last
//! applied one is stored in `PRAGMA user_version`. Pending steps share one
//! transaction, so a failing step leaves the file at its previous version.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

const SCHEMA_STEPS: &[(u32, &str)] = &[
    (1, include_str!("0001_tasks.sql")),
    (2, include_str!("0002_reminders.sql")),
];

/// Schema version written by this build.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |(version, _)| *version)
}

/// Brings the connection's schema up to [`latest_version`].
///
/// # Errors
/// - [`DbError::UnsupportedSchemaVersion`] when the file is newer than
///   this build.
/// - [`DbError::Migration`] naming the step that failed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let to_version = latest_version();

    if from_version > to_version {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: to_version,
        });
    }
    if from_version == to_version {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for &(version, sql) in SCHEMA_STEPS.iter().skip_while(|(version, _)| *version <= from_version) {
        tx.execute_batch(sql)
            .and_then(|()| tx.pragma_update(None, "user_version", version))
            .map_err(|source| DbError::Migration { version, source })?;
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={from_version} to_version={to_version}");
    Ok(())
}
