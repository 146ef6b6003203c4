//! Shared fixtures for unit tests.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::Database;
use crate::runtime::supervisor::LogNotifier;
use crate::weather::NoWeatherSource;
use crate::AppState;

/// Fresh state over an in-memory store. Call from inside a tokio test.
pub fn test_state() -> AppState {
    let db = Database::open_in_memory().expect("in-memory DB");
    AppState::new(
        AppConfig::default(),
        Arc::new(db),
        Arc::new(NoWeatherSource),
        Arc::new(LogNotifier),
    )
}
