use std::time::Duration;

/// Handle to a pending job; pass it to [`Scheduler::cancel`] to drop the job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobHandle(u64);

#[derive(Debug, Clone)]
struct Entry<J> {
    handle: JobHandle,
    due: Duration,
    period: Option<Duration>,
    job: J,
}

/// Deterministic job scheduler over a virtual monotonic clock
///
/// Nothing runs on its own: the owner moves the clock forward and pops due
/// jobs one at a time, so each job finishes before the next is looked at and
/// a job may cancel or schedule other work while it runs.
#[derive(Debug, Clone)]
pub struct Scheduler<J> {
    now: Duration,
    next_id: u64,
    entries: Vec<Entry<J>>,
}

impl<J> Default for Scheduler<J> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<J: Clone> Scheduler<J> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    fn push(&mut self, due: Duration, period: Option<Duration>, job: J) -> JobHandle {
        let handle = JobHandle(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            handle,
            due,
            period,
            job,
        });
        handle
    }

    /// Run `job` once, `delay` from now
    pub fn once(&mut self, delay: Duration, job: J) -> JobHandle {
        self.push(self.now + delay, None, job)
    }

    /// Run `job` every `period`, first firing one period from now
    pub fn every(&mut self, period: Duration, job: J) -> JobHandle {
        assert!(!period.is_zero(), "periodic job needs a non-zero period");
        self.push(self.now + period, Some(period), job)
    }

    /// Drop a pending job; returns false if it already ran or was cancelled
    pub fn cancel(&mut self, handle: JobHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }

    pub fn is_pending(&self, handle: JobHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    #[cfg(test)]
    pub fn pending_count(&self) -> usize {
        self.entries.len()
    }

    /// Pop the earliest job due at or before `until`, moving the clock to its
    /// due time. Periodic jobs are re-armed before being returned.
    ///
    /// Ties go to the job scheduled first.
    pub fn next_due(&mut self, until: Duration) -> Option<(JobHandle, J)> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= until)
            .min_by_key(|(_, e)| (e.due, e.handle.0))
            .map(|(i, _)| i)?;

        let due = self.entries[index].due;
        if due > self.now {
            self.now = due;
        }

        let entry = &mut self.entries[index];
        let fired = (entry.handle, entry.job.clone());
        let period = entry.period;
        match period {
            Some(period) => self.entries[index].due += period,
            None => {
                self.entries.remove(index);
            }
        }
        Some(fired)
    }

    /// Move the clock to `until` without running anything
    pub fn settle(&mut self, until: Duration) {
        if until > self.now {
            self.now = until;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    fn drain(scheduler: &mut Scheduler<&'static str>, until: Duration) -> Vec<(Duration, &'static str)> {
        let mut fired = Vec::new();
        while let Some((_, job)) = scheduler.next_due(until) {
            fired.push((scheduler.now(), job));
        }
        scheduler.settle(until);
        fired
    }

    #[test]
    fn test_once_fires_a_single_time() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.once(secs(2), "restart");

        assert!(drain(&mut scheduler, secs(1)).is_empty());
        assert!(scheduler.is_pending(handle));

        assert_eq!(drain(&mut scheduler, secs(5)), vec![(secs(2), "restart")]);
        assert!(!scheduler.is_pending(handle));
        assert_eq!(scheduler.now(), secs(5));
    }

    #[test]
    fn test_every_rearms() {
        let mut scheduler = Scheduler::new();
        scheduler.every(secs(1), "tick");

        let fired = drain(&mut scheduler, secs(3));
        assert_eq!(fired, vec![(secs(1), "tick"), (secs(2), "tick"), (secs(3), "tick")]);
        assert_eq!(scheduler.pending_count(), 1);
    }

    #[test]
    fn test_cancel_drops_pending_work() {
        let mut scheduler = Scheduler::new();
        let tick = scheduler.every(secs(1), "tick");
        let restart = scheduler.once(secs(2), "restart");

        assert!(scheduler.cancel(restart));
        assert!(!scheduler.cancel(restart));
        assert_eq!(drain(&mut scheduler, secs(2)).len(), 2);

        assert!(scheduler.cancel(tick));
        assert!(drain(&mut scheduler, secs(10)).is_empty());
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_ties_run_in_scheduling_order() {
        let mut scheduler = Scheduler::new();
        scheduler.once(secs(1), "first");
        scheduler.once(secs(1), "second");

        let jobs: Vec<_> = drain(&mut scheduler, secs(1)).into_iter().map(|(_, j)| j).collect();
        assert_eq!(jobs, vec!["first", "second"]);
    }

    #[test]
    fn test_job_scheduled_from_now_uses_advanced_clock() {
        let mut scheduler = Scheduler::new();
        scheduler.once(secs(3), "expire");
        let (_, job) = scheduler.next_due(secs(10)).unwrap();
        assert_eq!(job, "expire");

        // Work scheduled while handling a job is relative to that job's due time
        scheduler.once(secs(2), "restart");
        assert_eq!(drain(&mut scheduler, secs(10)), vec![(secs(5), "restart")]);
    }
}
