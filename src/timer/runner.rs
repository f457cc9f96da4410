use super::engine::{FocusTimer, TimerEvent};
use crate::ticker::tick_duration;
use std::future::Future;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

/// Why the real-time driver returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The requested number of sessions ran out
    SessionLimit,
    /// The shutdown future resolved (Ctrl-C in the CLI)
    Interrupted,
}

/// A countdown the real-time driver can start, step and stop
pub trait Countdown {
    type Event;

    fn start(&mut self) -> bool;
    fn pause(&mut self) -> bool;
    fn advance(&mut self, elapsed: Duration) -> Vec<Self::Event>;
    fn completed_sessions(&self) -> u32;
}

impl Countdown for FocusTimer {
    type Event = TimerEvent;

    fn start(&mut self) -> bool {
        FocusTimer::start(self)
    }

    fn pause(&mut self) -> bool {
        FocusTimer::pause(self)
    }

    fn advance(&mut self, elapsed: Duration) -> Vec<TimerEvent> {
        FocusTimer::advance(self, elapsed)
    }

    fn completed_sessions(&self) -> u32 {
        FocusTimer::completed_sessions(self)
    }
}

/// Drive `countdown` in real time, one step per second, until `shutdown`
/// resolves or `max_sessions` sessions have run out
///
/// The countdown is left paused when this returns. `on_event` sees every
/// event, `on_tick` sees the countdown after each step.
pub async fn run<C, S, E, T>(
    countdown: &mut C,
    max_sessions: Option<u32>,
    shutdown: S,
    mut on_event: E,
    mut on_tick: T,
) -> StopReason
where
    C: Countdown,
    S: Future<Output = ()>,
    E: FnMut(&C::Event),
    T: FnMut(&C),
{
    let step = tick_duration();
    let mut ticker = interval(step);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // First tick completes immediately
    ticker.tick().await;

    let baseline = countdown.completed_sessions();
    countdown.start();
    on_tick(countdown);

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                for event in countdown.advance(step) {
                    on_event(&event);
                }
                on_tick(countdown);

                if let Some(max) = max_sessions {
                    if countdown.completed_sessions() - baseline >= max {
                        countdown.pause();
                        return StopReason::SessionLimit;
                    }
                }
            }
            _ = &mut shutdown => {
                countdown.pause();
                tracing::debug!(sessions = countdown.completed_sessions() - baseline, "timer interrupted");
                return StopReason::Interrupted;
            }
        }
    }
}
