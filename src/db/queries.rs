use rusqlite::{params, Row};
use serde::Serialize;

use super::{Database, DbError};
use crate::tasks::{Category, Task};

// ---------------------------------------------------------------------------
// Row types — flat structs that map directly to table columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct TaskRow {
    pub id: String,
    pub title: String,
    pub is_completed: bool,
    pub category: String,
    pub deadline_at: Option<String>,
    pub created_at: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            is_completed: task.is_completed,
            category: task.category.as_str().to_string(),
            deadline_at: task.deadline_at.clone(),
            created_at: task.created_at.clone(),
        }
    }
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Self {
            category: Category::from_stored(&row.category),
            id: row.id,
            title: row.title,
            is_completed: row.is_completed,
            deadline_at: row.deadline_at,
            created_at: row.created_at,
        }
    }
}

fn task_row(row: &Row<'_>) -> rusqlite::Result<TaskRow> {
    Ok(TaskRow {
        id: row.get(0)?,
        title: row.get(1)?,
        is_completed: row.get(2)?,
        category: row.get(3)?,
        deadline_at: row.get(4)?,
        created_at: row.get(5)?,
    })
}

// ---------------------------------------------------------------------------
// Task queries
// ---------------------------------------------------------------------------

pub fn insert_task(db: &Database, row: &TaskRow) -> Result<(), DbError> {
    let conn = db.conn();
    conn.execute(
        "INSERT INTO tasks (id, title, is_completed, category, deadline_at, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            row.id,
            row.title,
            row.is_completed,
            row.category,
            row.deadline_at,
            row.created_at
        ],
    )?;
    Ok(())
}

pub fn list_tasks(db: &Database) -> Result<Vec<TaskRow>, DbError> {
    let conn = db.conn();
    let mut stmt = conn.prepare(
        "SELECT id, title, is_completed, category, deadline_at, created_at
         FROM tasks ORDER BY created_at DESC, rowid DESC",
    )?;
    let rows = stmt
        .query_map([], task_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn get_task(db: &Database, id: &str) -> Result<Option<TaskRow>, DbError> {
    let conn = db.conn();
    let mut stmt = conn.prepare(
        "SELECT id, title, is_completed, category, deadline_at, created_at FROM tasks WHERE id = ?1",
    )?;
    let mut rows = stmt.query_map(params![id], task_row)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

pub fn update_task_completed(db: &Database, id: &str, completed: bool) -> Result<bool, DbError> {
    let conn = db.conn();
    let changed = conn.execute(
        "UPDATE tasks SET is_completed = ?1 WHERE id = ?2",
        params![completed, id],
    )?;
    Ok(changed > 0)
}

pub fn delete_task(db: &Database, id: &str) -> Result<bool, DbError> {
    let conn = db.conn();
    let changed = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
    Ok(changed > 0)
}
