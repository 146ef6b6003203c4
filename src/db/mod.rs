//! SQLite-backed task store.

mod migrations;
pub mod queries;


use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use thiserror::Error;

use crate::tasks::{Task, TaskStore};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("migration failed: {0}")]
    Migration(String),
    #[error("not found: {0}")]
    NotFound(String),
}

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a database file at `path`, enable WAL mode, and run migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open an in-memory database. Contents vanish with the value.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, DbError> {
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire a lock on the connection for queries.
    pub fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }
}

impl TaskStore for Database {
    fn insert(&self, task: &Task) -> Result<(), DbError> {
        queries::insert_task(self, &queries::TaskRow::from(task))
    }

    fn list(&self) -> Result<Vec<Task>, DbError> {
        Ok(queries::list_tasks(self)?.into_iter().map(Task::from).collect())
    }

    fn get(&self, id: &str) -> Result<Option<Task>, DbError> {
        Ok(queries::get_task(self, id)?.map(Task::from))
    }

    fn set_completed(&self, id: &str, completed: bool) -> Result<bool, DbError> {
        queries::update_task_completed(self, id, completed)
    }

    fn delete(&self, id: &str) -> Result<bool, DbError> {
        queries::delete_task(self, id)
    }
}
