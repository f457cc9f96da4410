use std::time::Duration;

/// Focus timer tick interval in milliseconds
pub const TICK_MS: u64 = 1_000;

/// Pause between an expired session and the automatic start of the next one
pub const AUTO_RESTART_DELAY_MS: u64 = 2_000;

/// Get tick duration
pub fn tick_duration() -> Duration {
    Duration::from_millis(TICK_MS)
}

/// Get the delay before the next session starts on its own
pub fn auto_restart_delay() -> Duration {
    Duration::from_millis(AUTO_RESTART_DELAY_MS)
}
