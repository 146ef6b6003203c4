use tokio::task::JoinHandle;

use super::{Subscription, TimerEvent};
use crate::runtime::display::{TimerDisplay, COMPLETION_MESSAGE};

/// Presentation surface fed by the relay. Implemented by whatever shell
/// renders the timer card.
pub trait TimerView: Send + 'static {
    fn render(&mut self, display: &TimerDisplay);

    /// Called once per finished session, after the finished display.
    fn session_complete(&mut self, message: &str);

    /// Return `false` to detach the relay after the current event.
    fn keep_attached(&self) -> bool {
        true
    }
}

pub struct DisplayRelay;

impl DisplayRelay {
    /// Spawn a task that turns bus events into displays for `view`.
    ///
    /// Events are forwarded one at a time in the order received; nothing is
    /// buffered or coalesced, so a Finish is always rendered after every
    /// Tick that preceded it. The task ends when the bus goes away or the
    /// view detaches.
    pub fn start<V: TimerView>(mut subscription: Subscription, mut view: V) -> JoinHandle<V> {
        tokio::spawn(async move {
            while let Some(event) = subscription.recv().await {
                let display = TimerDisplay::for_event(&event.event);
                view.render(&display);
                if event.event == TimerEvent::Finish {
                    tracing::debug!(session = %event.session_id, "relaying completion");
                    view.session_complete(COMPLETION_MESSAGE);
                }
                if !view.keep_attached() {
                    subscription.unsubscribe();
                    break;
                }
            }
            view
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{EventBus, SessionId};
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct RecordingView {
        clocks: Vec<String>,
        completions: Vec<String>,
        detach_after_finish: bool,
    }

    impl TimerView for RecordingView {
        fn render(&mut self, display: &TimerDisplay) {
            self.clocks.push(display.clock.clone());
        }

        fn session_complete(&mut self, message: &str) {
            self.completions.push(message.to_string());
        }

        fn keep_attached(&self) -> bool {
            !(self.detach_after_finish && !self.completions.is_empty())
        }
    }

    #[tokio::test]
    async fn renders_ticks_then_completion() {
        let bus = EventBus::new();
        let view = RecordingView {
            detach_after_finish: true,
            ..Default::default()
        };
        let handle = DisplayRelay::start(bus.subscribe(), view);

        let session = SessionId(3);
        bus.emit(session, TimerEvent::Tick { remaining_ms: 2_000 });
        bus.emit(session, TimerEvent::Tick { remaining_ms: 1_000 });
        bus.emit(session, TimerEvent::Tick { remaining_ms: 0 });
        bus.emit(session, TimerEvent::Finish);

        let view = handle.await.unwrap();
        assert_eq!(view.clocks, vec!["00:02", "00:01", "00:00", "00:00"]);
        assert_eq!(view.completions, vec![COMPLETION_MESSAGE.to_string()]);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn stops_when_bus_is_dropped() {
        let bus = EventBus::new();
        let handle = DisplayRelay::start(bus.subscribe(), RecordingView::default());
        bus.emit(SessionId(1), TimerEvent::Tick { remaining_ms: 5_000 });
        drop(bus);

        let view = handle.await.unwrap();
        assert_eq!(view.clocks, vec!["00:05"]);
        assert!(view.completions.is_empty());
    }
}
