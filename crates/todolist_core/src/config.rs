//! Runtime configuration resolved from the environment.
//!
//! | Variable              | Meaning                         | Default                         |
//! |-----------------------|---------------------------------|---------------------------------|
//! | `TODOLIST_DB_PATH`    | SQLite database file            | `<temp>/todolist.sqlite3`       |
//! | `TODOLIST_LOG_LEVEL`  | `trace\|debug\|info\|warn\|error` | [`default_log_level`]           |
//! | `TODOLIST_LOG_DIR`    | absolute log directory          | unset (file logging disabled)   |
//!
//! Blank values count as unset. An unsupported level falls back to the
//! build-mode default.

use crate::logging::{default_log_level, normalize_level};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "TODOLIST_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "TODOLIST_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "TODOLIST_LOG_DIR";
pub const DEFAULT_DB_FILE_NAME: &str = "todolist.sqlite3";

/// Resolved core configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    pub log_dir: Option<PathBuf>,
}

impl CoreConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = read(DB_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
        let log_level = read(LOG_LEVEL_ENV)
            .and_then(|level| normalize_level(&level).ok())
            .unwrap_or_else(default_log_level);
        let log_dir = read(LOG_DIR_ENV).map(PathBuf::from);

        Self {
            db_path,
            log_level,
            log_dir,
        }
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
