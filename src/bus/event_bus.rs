use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Identity of one countdown run. Allocated by the engine, never reused
/// within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEvent {
    Tick { remaining_ms: u64 },
    Finish,
}

impl TimerEvent {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tick { .. } => "timer.tick",
            Self::Finish => "timer.finish",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusEvent {
    pub seq: u64,
    pub session_id: SessionId,
    pub event: TimerEvent,
    pub created_at: String,
}

type Subscribers = Mutex<HashMap<u64, mpsc::UnboundedSender<BusEvent>>>;

/// Fan-out channel for timer events.
///
/// Every subscriber registered when `emit` runs receives the event; events
/// emitted with nobody listening are dropped and never replayed. Each
/// subscriber has its own unbounded queue so a slow observer cannot make
/// another one lose events.
pub struct EventBus {
    subscribers: Arc<Subscribers>,
    next_subscriber: AtomicU64,
    seq: AtomicU64,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(HashMap::new())),
            next_subscriber: AtomicU64::new(0),
            seq: AtomicU64::new(0),
        }
    }

    /// Deliver a pre-built event to every current subscriber.
    ///
    /// Returns the number of subscribers that accepted it.
    pub fn publish(&self, event: BusEvent) -> usize {
        let mut guard = self.subscribers.lock().expect("event bus mutex poisoned");
        if guard.is_empty() {
            tracing::trace!(seq = event.seq, "no subscribers, dropping {}", event.event.as_str());
            return 0;
        }

        let mut delivered = 0;
        guard.retain(|id, tx| match tx.send(event.clone()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(_) => {
                tracing::debug!(subscriber = id, "removing closed subscriber");
                false
            }
        });
        delivered
    }

    /// Convenience: build and publish an event in one call.
    pub fn emit(&self, session_id: SessionId, event: TimerEvent) -> BusEvent {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let event = BusEvent {
            seq,
            session_id,
            event,
            created_at: Utc::now().to_rfc3339(),
        };
        self.publish(event.clone());
        event
    }

    /// Register a new observer. Only events emitted after this returns are
    /// delivered to it.
    pub fn subscribe(&self) -> Subscription {
        let id = self.next_subscriber.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .expect("event bus mutex poisoned")
            .insert(id, tx);
        Subscription {
            id,
            rx,
            registry: Arc::downgrade(&self.subscribers),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().expect("event bus mutex poisoned").len()
    }
}

/// Receiving end of a bus registration. Dropping it unsubscribes.
pub struct Subscription {
    id: u64,
    rx: mpsc::UnboundedReceiver<BusEvent>,
    registry: Weak<Subscribers>,
}

impl Subscription {
    /// Wait for the next event. `None` once the bus is gone or this
    /// subscription was detached and drained.
    pub async fn recv(&mut self) -> Option<BusEvent> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<BusEvent> {
        self.rx.try_recv().ok()
    }

    /// Stop receiving. Events emitted after this call are not queued; those
    /// already queued can still be drained with `try_recv`.
    pub fn unsubscribe(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .lock()
                .expect("event bus mutex poisoned")
                .remove(&self.id);
        }
        self.rx.close();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
