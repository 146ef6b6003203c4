//! Keeps the "focus running" notice in sync with the countdown.
//!
//! The engine itself never talks to the platform; something with a longer
//! lifetime than any single view has to hold the ongoing notice while a
//! session runs. The controller raises it on start and the supervisor task
//! takes it down when the session that owns it finishes.

use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;

use super::countdown::{CountdownEngine, SessionState};
use crate::bus::{Subscription, TimerEvent};

pub const NOTICE_TITLE: &str = "LifeSync";
pub const NOTICE_TEXT: &str = "Focus timer running...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticePriority {
    Low,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OngoingNotice {
    pub title: &'static str,
    pub text: &'static str,
    pub priority: NoticePriority,
}

impl OngoingNotice {
    pub const fn focus() -> Self {
        Self {
            title: NOTICE_TITLE,
            text: NOTICE_TEXT,
            priority: NoticePriority::Low,
        }
    }
}

/// Platform notification surface.
pub trait StatusNotifier: Send + Sync {
    fn show_ongoing(&self, notice: &OngoingNotice);
    fn dismiss(&self);
}

/// Notifier for headless runs: writes the notice to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl StatusNotifier for LogNotifier {
    fn show_ongoing(&self, notice: &OngoingNotice) {
        tracing::info!(title = notice.title, priority = ?notice.priority, "{}", notice.text);
    }

    fn dismiss(&self) {
        tracing::info!("ongoing notice dismissed");
    }
}

pub struct SessionSupervisor;

impl SessionSupervisor {
    /// Spawn the task that dismisses the ongoing notice when the engine's
    /// current session finishes. A Finish for any other session is ignored:
    /// the notice belongs to whichever session is current.
    pub fn start(
        mut subscription: Subscription,
        engine: Arc<CountdownEngine>,
        notifier: Arc<dyn StatusNotifier>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(event) = subscription.recv().await {
                if event.event != TimerEvent::Finish {
                    continue;
                }
                let owns_notice = engine
                    .current()
                    .is_some_and(|h| h.id() == event.session_id && h.state() == SessionState::Finished);
                if owns_notice {
                    tracing::debug!(session = %event.session_id, "session finished, releasing notice");
                    notifier.dismiss();
                } else {
                    tracing::debug!(session = %event.session_id, "finish from a stale session ignored");
                }
            }
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use tokio::time;

    use super::super::countdown::DEFAULT_TICK_INTERVAL;
    use crate::bus::{EventBus, SessionId};

    #[derive(Default)]
    pub(crate) struct RecordingNotifier {
        pub calls: Mutex<Vec<&'static str>>,
    }

    impl RecordingNotifier {
        pub(crate) fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl StatusNotifier for RecordingNotifier {
        fn show_ongoing(&self, notice: &OngoingNotice) {
            assert_eq!(notice.priority, NoticePriority::Low);
            self.calls.lock().unwrap().push("show");
        }

        fn dismiss(&self) {
            self.calls.lock().unwrap().push("dismiss");
        }
    }

    fn supervised() -> (Arc<EventBus>, Arc<CountdownEngine>, Arc<RecordingNotifier>, JoinHandle<()>) {
        let bus = Arc::new(EventBus::new());
        let engine = Arc::new(CountdownEngine::new(bus.clone(), DEFAULT_TICK_INTERVAL));
        let notifier = Arc::new(RecordingNotifier::default());
        let handle = SessionSupervisor::start(bus.subscribe(), engine.clone(), notifier.clone());
        (bus, engine, notifier, handle)
    }

    #[tokio::test(start_paused = true)]
    async fn dismisses_only_on_finish() {
        let (bus, engine, notifier, handle) = supervised();
        let mut sub = bus.subscribe();

        let session = engine.start(2_000).unwrap();
        while let Some(event) = sub.recv().await {
            if event.event == TimerEvent::Finish {
                break;
            }
            assert!(notifier.calls().is_empty());
        }
        time::sleep(Duration::from_millis(10)).await;

        assert_eq!(session.state(), SessionState::Finished);
        assert_eq!(notifier.calls(), vec!["dismiss"]);
        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn finish_from_another_session_keeps_notice() {
        let (bus, engine, notifier, handle) = supervised();

        let current = engine.start(60_000).unwrap();
        bus.emit(SessionId(current.id().0 + 100), TimerEvent::Finish);
        time::sleep(Duration::from_millis(10)).await;

        assert_eq!(current.state(), SessionState::Running);
        assert!(notifier.calls().is_empty());

        engine.cancel(&current);
        bus.emit(current.id(), TimerEvent::Finish);
        time::sleep(Duration::from_millis(10)).await;
        assert!(notifier.calls().is_empty());
        handle.abort();
    }

    #[test]
    fn focus_notice_is_low_priority() {
        let notice = OngoingNotice::focus();
        assert_eq!(notice.title, "LifeSync");
        assert_eq!(notice.priority, NoticePriority::Low);
    }
}
