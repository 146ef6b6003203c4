pub mod countdown;
pub mod display;
pub mod presets;
pub mod session;
pub mod supervisor;

pub use countdown::{CountdownEngine, CountdownSession, SessionHandle, SessionState, TimerError};
pub use presets::FocusPreset;
pub use session::{FocusStarted, TimerSessionController};
