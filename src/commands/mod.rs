//! Entry points for the UI shell. Each function takes the shared
//! [`AppState`](crate::AppState) and returns serializable values or an
//! [`AppError`](crate::AppError) whose text is fit to show the user.

pub mod stats;
pub mod tasks;
pub mod timer;
pub mod weather;
