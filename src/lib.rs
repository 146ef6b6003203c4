//! LifeSync backend library.
//!
//! Headless core of the task/focus app. It handles:
//! - The focus timer: countdown sessions, presets and display derivation
//! - Event delivery from the timer to whatever UI is attached
//! - Task storage, category statistics and the weather readout
//!
//! # Architecture
//!
//! - `commands`: shell-facing entry points over [`AppState`]
//! - `runtime`: countdown engine, session controller, notice supervision
//! - `bus`: typed publish/subscribe for timer events and the display relay
//! - `tasks`: task model, injected store trait, statistics
//! - `db`: SQLite task store
//! - `weather`: weather response model and readout
//! - `config`: environment-driven configuration

pub mod bus;
pub mod commands;
pub mod config;
pub mod db;
pub mod runtime;
pub mod tasks;
pub mod weather;

#[cfg(test)]
mod testing;

use std::io::Write;
use std::sync::Arc;

use serde::Serialize;

use bus::{DisplayRelay, EventBus, TimerView};
use config::{AppConfig, ConfigError};
use db::{Database, DbError};
use runtime::display::TimerDisplay;
use runtime::supervisor::{LogNotifier, SessionSupervisor, StatusNotifier};
use runtime::{CountdownEngine, TimerError, TimerSessionController};
use tasks::{TaskError, TaskStore};
use weather::{NoWeatherSource, WeatherSource};

// ---------------------------------------------------------------------------
// Shared error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{}", .0.user_message())]
    Timer(#[from] TimerError),
    #[error("{0}")]
    Task(#[from] TaskError),
    #[error("{0}")]
    Db(#[from] DbError),
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Other(String),
}

impl Serialize for AppError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn TaskStore>,
    pub weather: Arc<dyn WeatherSource>,
    pub bus: Arc<EventBus>,
    pub timer: Arc<TimerSessionController>,
}

impl AppState {
    /// Wire the timer subsystem around the given collaborators. Must be
    /// called inside a tokio runtime: the notice supervisor is spawned here.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn TaskStore>,
        weather: Arc<dyn WeatherSource>,
        notifier: Arc<dyn StatusNotifier>,
    ) -> Self {
        let bus = Arc::new(EventBus::new());
        let engine = Arc::new(CountdownEngine::new(bus.clone(), config.tick_interval));
        let timer = Arc::new(TimerSessionController::new(engine.clone(), notifier.clone()));
        timer.select_duration(config.default_duration_ms);

        SessionSupervisor::start(bus.subscribe(), engine, notifier);

        Self {
            config,
            store,
            weather,
            bus,
            timer,
        }
    }
}

// ---------------------------------------------------------------------------
// Console shell
// ---------------------------------------------------------------------------

/// Prints each display on its own line and detaches after completion.
struct ConsoleView {
    finished: bool,
}

impl TimerView for ConsoleView {
    fn render(&mut self, display: &TimerDisplay) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{}  [{}]", display.clock, display.action_label);
    }

    fn session_complete(&mut self, message: &str) {
        println!("{message}");
        self.finished = true;
    }

    fn keep_attached(&self) -> bool {
        !self.finished
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("lifesync=debug,info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

// ---------------------------------------------------------------------------
// Application entry point
// ---------------------------------------------------------------------------

/// Run one focus session with the configured default duration, printing
/// the timer card to stdout until it completes.
pub async fn run() -> Result<(), AppError> {
    init_tracing();

    let config = AppConfig::from_env()?;
    std::fs::create_dir_all(&config.data_dir).map_err(|e| {
        AppError::Other(format!(
            "failed to create data directory {}: {e}",
            config.data_dir.display()
        ))
    })?;
    let db = Arc::new(Database::open(config.db_path())?);

    let state = AppState::new(config, db, Arc::new(NoWeatherSource), Arc::new(LogNotifier));

    println!("Weather: {}", commands::weather::get_weather_readout(&state).await);
    println!("{}", commands::stats::get_stats(&state).summary);

    let relay = DisplayRelay::start(state.bus.subscribe(), ConsoleView { finished: false });
    let started = commands::timer::start_focus(&state)?;
    println!("{}", started.message);
    println!("{}  [{}]", started.display.clock, started.display.action_label);

    relay
        .await
        .map_err(|e| AppError::Other(format!("display relay failed: {e}")))?;
    tracing::info!("LifeSync session done");
    Ok(())
}
