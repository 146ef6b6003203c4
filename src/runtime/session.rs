use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::countdown::{CountdownEngine, SessionHandle, TimerError};
use super::display::{TimerDisplay, STARTED_MESSAGE};
use super::presets::FocusPreset;
use super::supervisor::{OngoingNotice, StatusNotifier};
use crate::bus::SessionId;

#[derive(Debug, Clone, Serialize)]
pub struct FocusStarted {
    pub session_id: SessionId,
    pub display: TimerDisplay,
    pub message: &'static str,
}

/// What the timer card talks to: remembers the picked duration and turns
/// "start" presses into countdown sessions.
pub struct TimerSessionController {
    engine: Arc<CountdownEngine>,
    notifier: Arc<dyn StatusNotifier>,
    selected_ms: Mutex<Option<i64>>,
}

impl TimerSessionController {
    pub fn new(engine: Arc<CountdownEngine>, notifier: Arc<dyn StatusNotifier>) -> Self {
        Self {
            engine,
            notifier,
            selected_ms: Mutex::new(None),
        }
    }

    /// Record the duration for the next `start_focus`. Nothing starts here;
    /// the returned display is what the card should show meanwhile.
    pub fn select_duration(&self, duration_ms: i64) -> TimerDisplay {
        *self.selected_ms.lock().expect("timer controller mutex poisoned") = Some(duration_ms);
        TimerDisplay::ready(u64::try_from(duration_ms).unwrap_or(0))
    }

    pub fn select_preset(&self, preset: FocusPreset) -> TimerDisplay {
        self.select_duration(preset.duration_ms())
    }

    pub fn selected_duration(&self) -> Option<i64> {
        *self.selected_ms.lock().expect("timer controller mutex poisoned")
    }

    /// Start a countdown with the selected duration, replacing any session
    /// already running. Returns without waiting for the countdown.
    ///
    /// An unset or non-positive duration is reported back as
    /// `TimerError::InvalidDuration`; the running session, if any, keeps
    /// going.
    pub fn start_focus(&self) -> Result<FocusStarted, TimerError> {
        let duration_ms = match self.selected_duration() {
            Some(ms) if ms > 0 => ms,
            other => {
                let err = TimerError::InvalidDuration(other);
                tracing::warn!("focus session not started: {err}");
                return Err(err);
            }
        };

        // The notice goes up before the countdown so the first tick never
        // runs without it.
        self.notifier.show_ongoing(&OngoingNotice::focus());
        let handle = match self.engine.start(duration_ms) {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!("focus session not started: {e}");
                if !self.engine.current().is_some_and(|h| h.is_running()) {
                    self.notifier.dismiss();
                }
                return Err(e);
            }
        };

        let snapshot = handle.snapshot();
        Ok(FocusStarted {
            session_id: snapshot.id,
            display: TimerDisplay::running(snapshot.total_duration_ms),
            message: STARTED_MESSAGE,
        })
    }

    /// Cancel the running session, if any. Returns whether one was running.
    pub fn stop_focus(&self) -> bool {
        let Some(handle) = self.engine.current().filter(SessionHandle::is_running) else {
            return false;
        };
        self.engine.cancel(&handle);
        self.notifier.dismiss();
        true
    }

    pub fn current_session(&self) -> Option<SessionHandle> {
        self.engine.current()
    }
}
