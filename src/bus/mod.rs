//! Event system carrying countdown progress to whoever is watching.
//!
//! The event bus provides:
//! - Publish-subscribe delivery of typed `TimerEvent`s
//! - Fire-and-forget semantics: no buffering for absent observers, no replay
//! - A display relay that feeds a UI shell without touching the engine
//!
//! # Architecture
//!
//! Events flow from the countdown task → EventBus → DisplayRelay → TimerView:
//! - `EventBus`: subscriber registry with one ordered queue per observer
//! - `DisplayRelay`: maps each event to a `TimerDisplay` as it arrives

mod event_bus;
pub mod relay;

pub use event_bus::{BusEvent, EventBus, SessionId, Subscription, TimerEvent};
pub use relay::{DisplayRelay, TimerView};
