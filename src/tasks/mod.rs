//! To-do items, their categories and the store they live in.

pub mod stats;

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::DbError;

#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("task title is empty")]
    EmptyTitle,
    #[error("invalid deadline {0:?}: expected an RFC 3339 timestamp")]
    InvalidDeadline(String),
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Store(#[from] DbError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Study,
    Work,
    Life,
    Other,
}

impl Category {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Study => "study",
            Self::Work => "work",
            Self::Life => "life",
            Self::Other => "other",
        }
    }

    /// Choices offered when adding a task, default first.
    pub const fn selectable() -> &'static [Category] {
        &[Category::Study, Category::Work, Category::Life]
    }

    /// Lenient read of a stored value; anything unknown counts as Other.
    pub fn from_stored(value: &str) -> Self {
        value.parse().unwrap_or(Self::Other)
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::Study
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "study" => Ok(Self::Study),
            "work" => Ok(Self::Work),
            "life" => Ok(Self::Life),
            "other" => Ok(Self::Other),
            _ => Err(format!("unknown task category: {value}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub is_completed: bool,
    pub category: Category,
    /// RFC 3339 timestamp; `None` when the user skipped the date picker.
    pub deadline_at: Option<String>,
    pub created_at: String,
}

impl Task {
    /// Build a new open task. Blank titles are refused, and a deadline
    /// must parse as RFC 3339 (blank means no deadline).
    pub fn new(title: &str, category: Category, deadline_at: Option<&str>) -> Result<Self, TaskError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TaskError::EmptyTitle);
        }
        let deadline_at = match deadline_at.map(str::trim).filter(|raw| !raw.is_empty()) {
            Some(raw) => Some(parse_deadline(raw)?.to_rfc3339()),
            None => None,
        };
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            is_completed: false,
            category,
            deadline_at,
            created_at: Utc::now().to_rfc3339(),
        })
    }

    /// List-row caption for the deadline, e.g. `DDL: 2026/11/03`.
    pub fn deadline_label(&self) -> String {
        match self.deadline_at.as_deref().map(parse_deadline) {
            Some(Ok(deadline)) => format!("DDL: {}", deadline.format("%Y/%m/%d")),
            Some(Err(_)) | None => "DDL: not set".to_string(),
        }
    }
}

fn parse_deadline(raw: &str) -> Result<DateTime<FixedOffset>, TaskError> {
    DateTime::parse_from_rfc3339(raw).map_err(|_| TaskError::InvalidDeadline(raw.to_string()))
}

/// Document store holding the task collection. Injected wherever tasks are
/// read or written.
pub trait TaskStore: Send + Sync {
    fn insert(&self, task: &Task) -> Result<(), DbError>;
    /// All tasks, newest first.
    fn list(&self) -> Result<Vec<Task>, DbError>;
    fn get(&self, id: &str) -> Result<Option<Task>, DbError>;
    /// Returns whether a task with `id` existed.
    fn set_completed(&self, id: &str, completed: bool) -> Result<bool, DbError>;
    /// Returns whether a task with `id` existed.
    fn delete(&self, id: &str) -> Result<bool, DbError>;
}

pub fn add_task(
    store: &dyn TaskStore,
    title: &str,
    category: Category,
    deadline_at: Option<&str>,
) -> Result<Task, TaskError> {
    let task = Task::new(title, category, deadline_at)?;
    store.insert(&task)?;
    tracing::debug!(task_id = %task.id, category = %task.category, "task added");
    Ok(task)
}

pub fn list_tasks(store: &dyn TaskStore) -> Result<Vec<Task>, TaskError> {
    Ok(store.list()?)
}

pub fn complete_task(store: &dyn TaskStore, id: &str) -> Result<Task, TaskError> {
    if !store.set_completed(id, true)? {
        return Err(TaskError::NotFound(id.to_string()));
    }
    store
        .get(id)?
        .ok_or_else(|| TaskError::NotFound(id.to_string()))
}

pub fn delete_task(store: &dyn TaskStore, id: &str) -> Result<(), TaskError> {
    if id.trim().is_empty() || !store.delete(id)? {
        return Err(TaskError::NotFound(id.to_string()));
    }
    tracing::debug!(task_id = id, "task deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use pretty_assertions::assert_eq;

    #[test]
    fn blank_titles_are_rejected() {
        let db = Database::open_in_memory().expect("in-memory DB");
        assert!(matches!(add_task(&db, "   ", Category::Work, None), Err(TaskError::EmptyTitle)));
        assert!(list_tasks(&db).unwrap().is_empty());
    }

    #[test]
    fn add_trims_and_defaults_open() {
        let db = Database::open_in_memory().expect("in-memory DB");
        let task = add_task(&db, "  read chapter 3 ", Category::Study, None).unwrap();
        assert_eq!(task.title, "read chapter 3");
        assert!(!task.is_completed);
        assert_eq!(list_tasks(&db).unwrap(), vec![task]);
    }

    #[test]
    fn complete_marks_task_done() {
        let db = Database::open_in_memory().expect("in-memory DB");
        let task = add_task(&db, "laundry", Category::Life, None).unwrap();

        let done = complete_task(&db, &task.id).unwrap();
        assert!(done.is_completed);
        assert_eq!(done.id, task.id);
        assert!(matches!(complete_task(&db, "missing"), Err(TaskError::NotFound(_))));
    }

    #[test]
    fn delete_removes_task() {
        let db = Database::open_in_memory().expect("in-memory DB");
        let task = add_task(&db, "ship report", Category::Work, None).unwrap();

        delete_task(&db, &task.id).unwrap();
        assert!(list_tasks(&db).unwrap().is_empty());
        assert!(matches!(delete_task(&db, &task.id), Err(TaskError::NotFound(_))));
        assert!(matches!(delete_task(&db, ""), Err(TaskError::NotFound(_))));
    }

    #[test]
    fn deadline_is_optional() {
        let db = Database::open_in_memory().expect("in-memory DB");

        let open_ended = add_task(&db, "tidy desk", Category::Life, None).unwrap();
        assert_eq!(open_ended.deadline_at, None);
        assert_eq!(open_ended.deadline_label(), "DDL: not set");

        let skipped = add_task(&db, "call home", Category::Life, Some("  ")).unwrap();
        assert_eq!(skipped.deadline_at, None);
    }

    #[test]
    fn deadline_survives_the_store() {
        let db = Database::open_in_memory().expect("in-memory DB");
        let task = add_task(&db, "final report", Category::Work, Some("2026-11-03T23:59:00+08:00")).unwrap();
        assert_eq!(task.deadline_label(), "DDL: 2026/11/03");

        let stored = db.get(&task.id).unwrap().expect("task stored");
        assert_eq!(stored.deadline_at.as_deref(), Some("2026-11-03T23:59:00+08:00"));
        assert_eq!(stored, task);
    }

    #[test]
    fn malformed_deadline_is_rejected() {
        let db = Database::open_in_memory().expect("in-memory DB");
        let err = add_task(&db, "essay", Category::Study, Some("next friday")).unwrap_err();
        assert!(matches!(err, TaskError::InvalidDeadline(raw) if raw == "next friday"));
        assert!(list_tasks(&db).unwrap().is_empty());
    }

    #[test]
    fn unknown_stored_category_reads_as_other() {
        assert_eq!(Category::from_stored("WORK"), Category::Work);
        assert_eq!(Category::from_stored("errands"), Category::Other);
        assert_eq!(Category::default(), Category::Study);
    }
}
