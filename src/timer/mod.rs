pub mod engine;
pub mod runner;
pub mod schedule;

pub use engine::{FocusTimer, TimerEvent, TimerSettings, MAX_SESSION_MINUTES};
pub use runner::{run, Countdown, StopReason};
