//! What the timer card shows: a `MM:SS` clock plus the action button label.

use serde::Serialize;

use crate::bus::TimerEvent;

/// Clock text shown once a session has finished.
pub const FINISHED_DISPLAY: &str = "00:00";

pub const LABEL_READY: &str = "Start";
pub const LABEL_RUNNING: &str = "Focusing...";
pub const LABEL_FINISHED: &str = "Time's up";

/// One-shot message raised to the shell when a session completes.
pub const COMPLETION_MESSAGE: &str = "Focus session complete!";

/// Acknowledgement shown after a successful `start_focus`.
pub const STARTED_MESSAGE: &str = "Timer started";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerDisplay {
    pub clock: String,
    pub action_label: &'static str,
}

impl TimerDisplay {
    /// Card state right after a duration was picked.
    pub fn ready(duration_ms: u64) -> Self {
        Self {
            clock: format_remaining(duration_ms),
            action_label: LABEL_READY,
        }
    }

    pub fn running(remaining_ms: u64) -> Self {
        Self {
            clock: format_remaining(remaining_ms),
            action_label: LABEL_RUNNING,
        }
    }

    pub fn finished() -> Self {
        Self {
            clock: FINISHED_DISPLAY.to_string(),
            action_label: LABEL_FINISHED,
        }
    }

    pub fn for_event(event: &TimerEvent) -> Self {
        match event {
            TimerEvent::Tick { remaining_ms } if *remaining_ms > 0 => Self::running(*remaining_ms),
            TimerEvent::Tick { .. } | TimerEvent::Finish => Self::finished(),
        }
    }
}

/// Render milliseconds as `MM:SS`. Minutes are not wrapped at 59 and
/// sub-second remainders are truncated.
pub fn format_remaining(remaining_ms: u64) -> String {
    let total_secs = remaining_ms / 1000;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}
