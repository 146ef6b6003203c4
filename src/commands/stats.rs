use serde::Serialize;

use crate::tasks::stats::{load_stats, CategoryStats};
use crate::tasks::Category;
use crate::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct CategoryBar {
    pub category: Category,
    pub count: usize,
    pub fraction: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsView {
    pub stats: CategoryStats,
    pub bars: Vec<CategoryBar>,
    pub summary: String,
}

pub fn get_stats(state: &AppState) -> StatsView {
    let stats = load_stats(state.store.as_ref());
    let bars = Category::selectable()
        .iter()
        .map(|category| CategoryBar {
            category: *category,
            count: stats.count(*category),
            fraction: stats.fraction(*category),
        })
        .collect();
    StatsView {
        stats,
        bars,
        summary: stats.summary(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tasks::create_task;
    use crate::testing::test_state;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn bars_follow_picker_order() {
        let state = test_state();
        create_task(&state, "a".into(), Some("work".into()), None).unwrap();
        create_task(&state, "b".into(), Some("work".into()), None).unwrap();
        create_task(&state, "c".into(), Some("life".into()), None).unwrap();
        create_task(&state, "d".into(), Some("other".into()), None).unwrap();

        let view = get_stats(&state);
        let counts: Vec<(Category, usize)> =
            view.bars.iter().map(|bar| (bar.category, bar.count)).collect();
        assert_eq!(
            counts,
            vec![(Category::Study, 0), (Category::Work, 2), (Category::Life, 1)]
        );
        assert_eq!(view.bars[1].fraction, 0.5);
        assert_eq!(view.summary, "Total tasks: 4");
    }

    #[tokio::test]
    async fn empty_store_reports_sample() {
        let view = get_stats(&test_state());
        assert!(view.stats.is_sample);
        assert_eq!(view.summary, "Total tasks: 25 (sample)");
    }
}
