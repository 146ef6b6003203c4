use serde::Serialize;

use super::{Category, Task, TaskStore};

/// Per-category counts for the stats screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub study: usize,
    pub work: usize,
    pub life: usize,
    pub total: usize,
    /// Set when the numbers are the built-in sample rather than real data.
    pub is_sample: bool,
}

impl CategoryStats {
    /// Shown when there is nothing (or nothing readable) to count.
    pub const SAMPLE: CategoryStats = CategoryStats {
        study: 12,
        work: 5,
        life: 8,
        total: 25,
        is_sample: true,
    };

    /// Count tasks by category. `total` includes tasks filed under Other.
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut stats = Self {
            study: 0,
            work: 0,
            life: 0,
            total: tasks.len(),
            is_sample: false,
        };
        for task in tasks {
            match task.category {
                Category::Study => stats.study += 1,
                Category::Work => stats.work += 1,
                Category::Life => stats.life += 1,
                Category::Other => {}
            }
        }
        stats
    }

    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::Study => self.study,
            Category::Work => self.work,
            Category::Life => self.life,
            Category::Other => self
                .total
                .saturating_sub(self.study + self.work + self.life),
        }
    }

    /// Share of all tasks in `category`, for progress bars.
    pub fn fraction(&self, category: Category) -> f64 {
        self.count(category) as f64 / self.total.max(1) as f64
    }

    pub fn summary(&self) -> String {
        if self.is_sample {
            format!("Total tasks: {} (sample)", self.total)
        } else {
            format!("Total tasks: {}", self.total)
        }
    }
}

/// Load statistics from the store, falling back to the sample when the
/// store is empty or unreachable.
pub fn load_stats(store: &dyn TaskStore) -> CategoryStats {
    match store.list() {
        Ok(tasks) if tasks.is_empty() => {
            tracing::info!("no tasks stored, showing sample stats");
            CategoryStats::SAMPLE
        }
        Ok(tasks) => CategoryStats::from_tasks(&tasks),
        Err(e) => {
            tracing::warn!("failed to load tasks for stats: {e}");
            CategoryStats::SAMPLE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, DbError};
    use crate::tasks::add_task;
    use pretty_assertions::assert_eq;

    struct BrokenStore;

    impl TaskStore for BrokenStore {
        fn insert(&self, _task: &Task) -> Result<(), DbError> {
            Err(DbError::NotFound("offline".into()))
        }
        fn list(&self) -> Result<Vec<Task>, DbError> {
            Err(DbError::NotFound("offline".into()))
        }
        fn get(&self, _id: &str) -> Result<Option<Task>, DbError> {
            Ok(None)
        }
        fn set_completed(&self, _id: &str, _completed: bool) -> Result<bool, DbError> {
            Ok(false)
        }
        fn delete(&self, _id: &str) -> Result<bool, DbError> {
            Ok(false)
        }
    }

    #[test]
    fn counts_by_category() {
        let db = Database::open_in_memory().expect("in-memory DB");
        add_task(&db, "essay", Category::Study, None).unwrap();
        add_task(&db, "flashcards", Category::Study, None).unwrap();
        add_task(&db, "standup notes", Category::Work, None).unwrap();
        add_task(&db, "misc", Category::Other, None).unwrap();

        let stats = load_stats(&db);
        assert_eq!(
            stats,
            CategoryStats {
                study: 2,
                work: 1,
                life: 0,
                total: 4,
                is_sample: false,
            }
        );
        assert_eq!(stats.count(Category::Other), 1);
        assert_eq!(stats.fraction(Category::Study), 0.5);
        assert_eq!(stats.summary(), "Total tasks: 4");
    }

    #[test]
    fn empty_store_shows_sample() {
        let db = Database::open_in_memory().expect("in-memory DB");
        let stats = load_stats(&db);
        assert_eq!(stats, CategoryStats::SAMPLE);
        assert_eq!(stats.summary(), "Total tasks: 25 (sample)");
    }

    #[test]
    fn failing_store_shows_sample() {
        assert_eq!(load_stats(&BrokenStore), CategoryStats::SAMPLE);
    }

    #[test]
    fn fraction_handles_zero_total() {
        let stats = CategoryStats::from_tasks(&[]);
        assert_eq!(stats.fraction(Category::Work), 0.0);
    }

    #[test]
    fn other_count_never_underflows() {
        let stats = CategoryStats {
            study: 3,
            work: 0,
            life: 0,
            total: 1,
            is_sample: false,
        };
        assert_eq!(stats.count(Category::Other), 0);
        assert_eq!(stats.fraction(Category::Other), 0.0);
    }
}
