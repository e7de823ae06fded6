//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `todolist_core` linkage without the Flutter/FFI runtime.
//! - Print upcoming and completed tasks from the configured database.

use std::process::ExitCode;
use todolist_core::db::open_db;
use todolist_core::{
    init_logging_from_config, CoreConfig, LocalTaskRepository, SqliteTaskStore, TaskDto,
    TaskRepository,
};

fn main() -> ExitCode {
    println!("todolist_core ping={}", todolist_core::ping());
    println!("todolist_core version={}", todolist_core::core_version());

    let config = CoreConfig::from_env();
    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("logging disabled: {err}");
    }

    match print_tasks(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_tasks(config: &CoreConfig) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db(&config.db_path)?;
    let repo = LocalTaskRepository::new(SqliteTaskStore::new(&conn));

    println!("db={}", config.db_path.display());
    print_section("upcoming", &repo.list_upcoming()?);
    print_section("completed", &repo.list_completed()?);
    Ok(())
}

fn print_section(label: &str, tasks: &[TaskDto]) {
    println!("{label} ({}):", tasks.len());
    for task in tasks {
        println!(
            "  #{:<4} {}  {} {}",
            task.id, task.title, task.date, task.time
        );
    }
}
