use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::bus::{EventBus, SessionId, TimerEvent};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimerError {
    #[error("invalid focus duration: {}", describe_duration(.0))]
    InvalidDuration(Option<i64>),
}

fn describe_duration(duration_ms: &Option<i64>) -> String {
    match duration_ms {
        Some(ms) => format!("{ms} ms (must be greater than zero)"),
        None => "no duration selected".to_string(),
    }
}

impl TimerError {
    /// Short text suitable for a toast in the shell.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidDuration(None) => "Pick a focus duration first",
            Self::InvalidDuration(Some(_)) => "Focus duration must be longer than zero",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Running,
    Finished,
    /// Terminal without a Finish event: cancelled or superseded.
    Cancelled,
}

#[derive(Debug, Clone, Serialize)]
pub struct CountdownSession {
    pub id: SessionId,
    pub total_duration_ms: u64,
    pub remaining_ms: u64,
    pub state: SessionState,
}

impl CountdownSession {
    fn new(id: SessionId, total_duration_ms: u64) -> Self {
        Self {
            id,
            total_duration_ms,
            remaining_ms: total_duration_ms,
            state: SessionState::Idle,
        }
    }

    /// Move the countdown forward by one tick and return the events that
    /// tick produces, in emission order. A session that is not running
    /// produces nothing.
    fn advance(&mut self, interval_ms: u64) -> Vec<TimerEvent> {
        if self.state != SessionState::Running {
            return Vec::new();
        }

        self.remaining_ms = self.remaining_ms.saturating_sub(interval_ms);
        let mut events = vec![TimerEvent::Tick {
            remaining_ms: self.remaining_ms,
        }];
        if self.remaining_ms == 0 {
            self.state = SessionState::Finished;
            events.push(TimerEvent::Finish);
        }
        events
    }

    fn cancel(&mut self) -> bool {
        if self.state == SessionState::Running {
            self.state = SessionState::Cancelled;
            true
        } else {
            false
        }
    }
}

/// Shared reference to one session. Cloning yields another view of the
/// same session; observers only ever read through it.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: SessionId,
    session: Arc<Mutex<CountdownSession>>,
}

impl SessionHandle {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn snapshot(&self) -> CountdownSession {
        self.lock().clone()
    }

    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    pub fn remaining_ms(&self) -> u64 {
        self.lock().remaining_ms
    }

    pub fn is_running(&self) -> bool {
        self.state() == SessionState::Running
    }

    fn lock(&self) -> MutexGuard<'_, CountdownSession> {
        self.session.lock().expect("countdown session mutex poisoned")
    }
}

struct ActiveRun {
    handle: SessionHandle,
    task: JoinHandle<()>,
}

/// Drives at most one countdown at a time and publishes its progress on the
/// bus. Starting a new session supersedes the running one.
pub struct CountdownEngine {
    bus: Arc<EventBus>,
    tick_interval: Duration,
    next_id: AtomicU64,
    active: Mutex<Option<ActiveRun>>,
}

impl CountdownEngine {
    pub fn new(bus: Arc<EventBus>, tick_interval: Duration) -> Self {
        Self {
            bus,
            tick_interval: tick_interval.max(Duration::from_millis(1)),
            next_id: AtomicU64::new(1),
            active: Mutex::new(None),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Begin a countdown of `duration_ms`. Must be called from within a
    /// tokio runtime; the ticking runs on a spawned task and this returns
    /// immediately.
    ///
    /// A non-positive duration is rejected before anything else happens, so
    /// a running session is left untouched.
    pub fn start(&self, duration_ms: i64) -> Result<SessionHandle, TimerError> {
        let total_ms = u64::try_from(duration_ms)
            .ok()
            .filter(|ms| *ms > 0)
            .ok_or(TimerError::InvalidDuration(Some(duration_ms)))?;

        let id = SessionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut session = CountdownSession::new(id, total_ms);
        session.state = SessionState::Running;
        let handle = SessionHandle {
            id,
            session: Arc::new(Mutex::new(session)),
        };

        let mut guard = self.active.lock().expect("countdown engine mutex poisoned");
        if let Some(previous) = guard.take() {
            if previous.handle.lock().cancel() {
                tracing::info!(superseded = %previous.handle.id, by = %id, "superseding running session");
            }
            previous.task.abort();
        }

        let task = tokio::spawn(drive(handle.clone(), self.bus.clone(), self.tick_interval));
        *guard = Some(ActiveRun {
            handle: handle.clone(),
            task,
        });
        tracing::info!(session = %id, duration_ms = total_ms, "countdown started");

        Ok(handle)
    }

    /// Stop `handle` if it is still running. Cancelling a finished or
    /// already cancelled session does nothing.
    pub fn cancel(&self, handle: &SessionHandle) {
        if handle.lock().cancel() {
            tracing::info!(session = %handle.id, "countdown cancelled");
        }

        let mut guard = self.active.lock().expect("countdown engine mutex poisoned");
        if guard.as_ref().is_some_and(|run| run.handle.id == handle.id) {
            if let Some(run) = guard.take() {
                run.task.abort();
            }
        }
    }

    /// The most recently started session, whatever its state.
    pub fn current(&self) -> Option<SessionHandle> {
        self.active
            .lock()
            .expect("countdown engine mutex poisoned")
            .as_ref()
            .map(|run| run.handle.clone())
    }
}

impl Drop for CountdownEngine {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.active.lock() {
            if let Some(run) = guard.take() {
                run.handle.lock().cancel();
                run.task.abort();
            }
        }
    }
}

async fn drive(handle: SessionHandle, bus: Arc<EventBus>, tick_interval: Duration) {
    let interval_ms = u64::try_from(tick_interval.as_millis()).unwrap_or(u64::MAX);
    let mut ticker = time::interval_at(Instant::now() + tick_interval, tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        // Emitting under the session lock means a cancel that has returned
        // can never be followed by events from this session.
        let running = {
            let mut session = handle.lock();
            for event in session.advance(interval_ms) {
                if let TimerEvent::Tick { remaining_ms } = event {
                    tracing::debug!(session = %session.id, remaining_ms, "tick");
                }
                bus.emit(session.id, event);
            }
            session.state == SessionState::Running
        };

        if !running {
            break;
        }
    }

    if handle.state() == SessionState::Finished {
        tracing::info!(session = %handle.id, "countdown finished");
    }
}
