use super::schedule::{JobHandle, Scheduler};
use crate::domain::TimerMode;
use crate::ticker::{auto_restart_delay, tick_duration};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_STUDY_MINUTES: u32 = 25;
pub const DEFAULT_BREAK_MINUTES: u32 = 5;

/// Longest accepted session, one day
pub const MAX_SESSION_MINUTES: u32 = 24 * 60;

fn default_study_minutes() -> u32 {
    DEFAULT_STUDY_MINUTES
}

fn default_break_minutes() -> u32 {
    DEFAULT_BREAK_MINUTES
}

/// Configured session lengths, persisted alongside the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSettings {
    #[serde(default = "default_study_minutes", alias = "studyDuration")]
    pub study_duration_minutes: u32,
    #[serde(default = "default_break_minutes", alias = "breakDuration")]
    pub break_duration_minutes: u32,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            study_duration_minutes: DEFAULT_STUDY_MINUTES,
            break_duration_minutes: DEFAULT_BREAK_MINUTES,
        }
    }
}

impl TimerSettings {
    /// Build settings; a zero or over-long duration falls back to its default
    pub fn new(study_minutes: u32, break_minutes: u32) -> Self {
        Self {
            study_duration_minutes: checked_minutes(study_minutes, DEFAULT_STUDY_MINUTES),
            break_duration_minutes: checked_minutes(break_minutes, DEFAULT_BREAK_MINUTES),
        }
    }

    /// Same settings with out-of-range durations replaced by defaults
    pub fn normalized(self) -> Self {
        Self::new(self.study_duration_minutes, self.break_duration_minutes)
    }

    /// Whether both durations are within 1..=MAX_SESSION_MINUTES
    pub fn is_valid(&self) -> bool {
        self.normalized() == *self
    }

    /// Session length in seconds for `mode`
    pub fn seconds_for(&self, mode: TimerMode) -> u32 {
        let minutes = match mode {
            TimerMode::Study => self.study_duration_minutes,
            TimerMode::Break => self.break_duration_minutes,
        };
        minutes.saturating_mul(60)
    }
}

fn checked_minutes(minutes: u32, default: u32) -> u32 {
    if (1..=MAX_SESSION_MINUTES).contains(&minutes) {
        minutes
    } else {
        default
    }
}

/// Work the timer schedules for itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerJob {
    Tick,
    AutoStart,
}

/// Something the user should hear about while the timer advances
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// A session ran out; the timer has already switched to `next`
    SessionComplete { finished: TimerMode, next: TimerMode },
    /// The next session started on its own after the restart delay
    AutoStarted { mode: TimerMode },
}

impl TimerEvent {
    pub fn message(&self) -> String {
        match self {
            Self::SessionComplete { finished, .. } => finished.completion_message().to_string(),
            Self::AutoStarted { mode } => format!("{} started", mode.label()),
        }
    }
}

/// Study/break countdown
///
/// The tick and the auto-restart are jobs on the timer's own scheduler, so
/// pause and reset cancel them through their handles and nothing stale can
/// fire afterwards.
#[derive(Debug, Clone)]
pub struct FocusTimer {
    mode: TimerMode,
    remaining_seconds: u32,
    running: bool,
    settings: TimerSettings,
    completed_sessions: u32,
    scheduler: Scheduler<TimerJob>,
    tick_job: Option<JobHandle>,
    restart_job: Option<JobHandle>,
}

impl Default for FocusTimer {
    fn default() -> Self {
        Self::new(TimerSettings::default())
    }
}

impl FocusTimer {
    pub fn new(settings: TimerSettings) -> Self {
        let settings = settings.normalized();
        Self {
            mode: TimerMode::Study,
            remaining_seconds: settings.seconds_for(TimerMode::Study),
            running: false,
            settings,
            completed_sessions: 0,
            scheduler: Scheduler::new(),
            tick_job: None,
            restart_job: None,
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn settings(&self) -> TimerSettings {
        self.settings
    }

    /// Sessions that have run out since the timer was created
    pub fn completed_sessions(&self) -> u32 {
        self.completed_sessions
    }

    /// Whether a session is queued to start on its own
    pub fn restart_pending(&self) -> bool {
        self.restart_job
            .map_or(false, |job| self.scheduler.is_pending(job))
    }

    /// Start counting down; returns false if already running
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        if let Some(job) = self.restart_job.take() {
            self.scheduler.cancel(job);
        }
        self.running = true;
        self.tick_job = Some(self.scheduler.every(tick_duration(), TimerJob::Tick));
        tracing::debug!(mode = ?self.mode, remaining = self.remaining_seconds, "timer started");
        true
    }

    /// Stop counting down and drop any queued restart; returns false if
    /// there was nothing to stop
    pub fn pause(&mut self) -> bool {
        let had_restart = match self.restart_job.take() {
            Some(job) => self.scheduler.cancel(job),
            None => false,
        };
        if !self.running {
            return had_restart;
        }
        self.stop_ticking();
        tracing::debug!(remaining = self.remaining_seconds, "timer paused");
        true
    }

    /// Stop, cancel everything pending and go back to a full study session
    pub fn reset(&mut self) {
        self.pause();
        self.mode = TimerMode::Study;
        self.remaining_seconds = self.settings.seconds_for(TimerMode::Study);
        tracing::debug!("timer reset");
    }

    /// Change session lengths; an idle timer in study mode picks up the new
    /// study length immediately
    pub fn update_settings(&mut self, study_minutes: u32, break_minutes: u32) {
        self.settings = TimerSettings::new(study_minutes, break_minutes);
        if !self.running && self.mode == TimerMode::Study {
            self.remaining_seconds = self.settings.seconds_for(TimerMode::Study);
        }
    }

    /// Move the timer's clock forward, running every tick and restart that
    /// falls due on the way
    pub fn advance(&mut self, elapsed: Duration) -> Vec<TimerEvent> {
        let until = self.scheduler.now() + elapsed;
        let mut events = Vec::new();

        while let Some((_, job)) = self.scheduler.next_due(until) {
            match job {
                TimerJob::Tick => self.on_tick(&mut events),
                TimerJob::AutoStart => {
                    self.restart_job = None;
                    if self.start() {
                        events.push(TimerEvent::AutoStarted { mode: self.mode });
                    }
                }
            }
        }

        self.scheduler.settle(until);
        events
    }

    fn stop_ticking(&mut self) {
        if let Some(job) = self.tick_job.take() {
            self.scheduler.cancel(job);
        }
        self.running = false;
    }

    fn on_tick(&mut self, events: &mut Vec<TimerEvent>) {
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return;
        }

        self.stop_ticking();
        let finished = self.mode;
        self.mode = finished.flipped();
        self.remaining_seconds = self.settings.seconds_for(self.mode);
        self.completed_sessions += 1;
        self.restart_job = Some(self.scheduler.once(auto_restart_delay(), TimerJob::AutoStart));

        tracing::info!(finished = ?finished, next = ?self.mode, "focus session complete");
        events.push(TimerEvent::SessionComplete {
            finished,
            next: self.mode,
        });
    }

    /// Length of the current mode's session in seconds
    pub fn total_seconds(&self) -> u32 {
        self.settings.seconds_for(self.mode)
    }

    /// Elapsed share of the current session, 0.0 to 100.0
    pub fn progress_percent(&self) -> f64 {
        let total = self.total_seconds();
        if total == 0 {
            return 0.0;
        }
        (total - self.remaining_seconds.min(total)) as f64 / total as f64 * 100.0
    }

    /// Remaining time as "MM:SS"
    pub fn format_remaining(&self) -> String {
        let minutes = self.remaining_seconds / 60;
        let seconds = self.remaining_seconds % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }

    pub fn label(&self) -> &'static str {
        self.mode.label()
    }
}
