pub mod dates;
pub mod enums;
pub mod subject;

pub use enums::{Difficulty, Severity, TimerMode, ViewMode};
pub use subject::{Subject, Task};
