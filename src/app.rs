use crate::domain::dates::{add_days, format_display, relative_label};
use crate::domain::{Task, ViewMode};
use crate::notifications::Notice;
use crate::persistence::{load_state, save_state, Changes, KeyValueStore, SavedState};
use crate::planner::{generate_plan, PlanError, PlanRequest};
use crate::report::{self, ProgressSummary};
use crate::store::{Store, StoreError};
use crate::timer::{Countdown, FocusTimer, TimerEvent, TimerSettings};
use anyhow::Result;
use chrono::NaiveDate;
use std::time::Duration;
use uuid::Uuid;

/// Main application state
pub struct AppState {
    pub store: Store,
    pub timer: FocusTimer,
    pub view: ViewMode,
    /// Date shown by the task list, moved with `shift_date`
    pub browse_date: NaiveDate,
    pub today: NaiveDate,
    changes: Changes,
}

impl AppState {
    pub fn new(saved: SavedState, today: NaiveDate) -> Self {
        Self {
            store: Store::from_parts(saved.subjects, saved.tasks),
            timer: FocusTimer::new(saved.timer_settings),
            view: saved.view,
            browse_date: today,
            today,
            changes: Changes::default(),
        }
    }

    /// Restore from persisted keys; bad keys fall back to their defaults
    pub fn load(kv: &dyn KeyValueStore, today: NaiveDate) -> Self {
        let state = Self::new(load_state(kv), today);
        tracing::debug!(
            subjects = state.store.subjects().len(),
            tasks = state.store.tasks().len(),
            view = state.view.as_str(),
            "state loaded"
        );
        state
    }

    /// Whether any mutation has not been saved yet
    pub fn needs_save(&self) -> bool {
        self.changes.any()
    }

    /// Persist the parts that changed since the last save
    pub fn save(&mut self, kv: &mut dyn KeyValueStore) -> Result<()> {
        save_state(kv, &self.store, self.view, &self.timer.settings(), self.changes)?;
        self.changes = Changes::default();
        Ok(())
    }

    pub fn submit_plan(&mut self, request: &PlanRequest) -> Notice {
        match generate_plan(request, self.today) {
            Ok(plan) => {
                let name = plan.subject.name.clone();
                self.store.add_subject_with_tasks(plan.subject, plan.tasks);
                self.changes.plan = true;
                Notice::success(format!("Study plan for \"{}\" generated successfully!", name))
            }
            Err(e) => {
                if let PlanError::InvalidDeadline { deadline, today } = &e {
                    tracing::debug!(%deadline, %today, "plan rejected, deadline not after today");
                } else {
                    tracing::debug!(error = %e, "plan rejected");
                }
                Notice::error(e.to_string())
            }
        }
    }

    /// Flip one task; an unknown id changes nothing and produces no notice
    pub fn toggle_task(&mut self, task_id: Uuid) -> Option<Notice> {
        match self.store.toggle_completion(task_id) {
            Ok(completed) => {
                self.changes.plan = true;
                let name = self
                    .store
                    .task(task_id)
                    .map(|t| t.name.clone())
                    .unwrap_or_default();
                let message = if completed {
                    format!("Task \"{}\" completed!", name)
                } else {
                    format!("Task \"{}\" marked as incomplete!", name)
                };
                Some(Notice::success(message))
            }
            Err(StoreError::NotFound(id)) => {
                tracing::debug!(%id, "toggle ignored, no such task");
                None
            }
        }
    }

    pub fn mark_all_done(&mut self, date: NaiveDate) -> Notice {
        if self.store.tasks_for_date(date).is_empty() {
            return Notice::info(format!("No tasks scheduled for {}.", self.day_phrase(date)));
        }

        if self.store.mark_all_completed_for_date(date) > 0 {
            self.changes.plan = true;
        }
        Notice::success(format!("All tasks for {} marked as completed!", self.day_phrase(date)))
    }

    pub fn clear_all(&mut self) -> Notice {
        self.store.clear_all();
        self.changes.plan = true;
        Notice::success("All data has been cleared.")
    }

    pub fn switch_view(&mut self, view: ViewMode) {
        if self.view != view {
            self.view = view;
            self.changes.view = true;
        }
    }

    /// Move the browsed date by `days` (negative goes back)
    pub fn shift_date(&mut self, days: i64) {
        self.browse_date = add_days(self.browse_date, days);
    }

    pub fn reset_browse_date(&mut self) {
        self.browse_date = self.today;
    }

    /// "Today", "Tomorrow", "Yesterday" or a short display date
    pub fn date_label(&self) -> String {
        relative_label(self.browse_date, self.today)
    }

    pub fn browsed_tasks(&self) -> Vec<&Task> {
        self.store.tasks_for_date(self.browse_date)
    }

    pub fn summary(&self) -> ProgressSummary {
        report::summary(&self.store, self.today)
    }

    pub fn start_timer(&mut self) -> bool {
        self.timer.start()
    }

    pub fn pause_timer(&mut self) -> bool {
        self.timer.pause()
    }

    pub fn reset_timer(&mut self) {
        self.timer.reset();
    }

    pub fn update_timer_settings(&mut self, study_minutes: u32, break_minutes: u32) -> TimerSettings {
        self.timer.update_settings(study_minutes, break_minutes);
        self.changes.timer_settings = true;
        self.timer.settings()
    }

    /// Advance the timer and turn its events into notices
    pub fn advance_timer(&mut self, elapsed: Duration) -> Vec<Notice> {
        self.timer
            .advance(elapsed)
            .iter()
            .map(timer_notice)
            .collect()
    }

    fn day_phrase(&self, date: NaiveDate) -> String {
        if date == self.today {
            "today".to_string()
        } else {
            format_display(date)
        }
    }
}

impl Countdown for AppState {
    type Event = Notice;

    fn start(&mut self) -> bool {
        self.start_timer()
    }

    fn pause(&mut self) -> bool {
        self.pause_timer()
    }

    fn advance(&mut self, elapsed: Duration) -> Vec<Notice> {
        self.advance_timer(elapsed)
    }

    fn completed_sessions(&self) -> u32 {
        self.timer.completed_sessions()
    }
}

fn timer_notice(event: &TimerEvent) -> Notice {
    match event {
        TimerEvent::SessionComplete { next, .. } => {
            tracing::debug!(next = next.label(), "announcing session end");
            Notice::success(event.message())
        }
        TimerEvent::AutoStarted { .. } => Notice::info(event.message()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Difficulty, Severity, TimerMode};
    use crate::persistence::snapshot::{SUBJECTS_KEY, TASKS_KEY};
    use crate::persistence::MemoryStore;
    use crate::timer::{run, StopReason};
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    fn request(name: &str, days: i64) -> PlanRequest {
        PlanRequest {
            name: name.to_string(),
            deadline: add_days(today(), days),
            difficulty: Difficulty::Medium,
            daily_hours: 2.0,
        }
    }

    fn app_with_plan() -> AppState {
        let mut app = AppState::new(SavedState::default(), today());
        app.submit_plan(&request("Math", 3));
        app.changes = Changes::default();
        app
    }

    #[test]
    fn test_submit_plan_success() {
        let mut app = AppState::new(SavedState::default(), today());
        let notice = app.submit_plan(&request("  Math ", 7));

        assert_eq!(notice.severity, Severity::Success);
        assert_eq!(notice.message, "Study plan for \"Math\" generated successfully!");
        assert_eq!(app.store.subjects().len(), 1);
        assert_eq!(app.store.tasks().len(), 7);
        assert!(app.needs_save());
    }

    #[test]
    fn test_submit_plan_past_deadline_leaves_store_untouched() {
        let mut app = app_with_plan();
        let notice = app.submit_plan(&request("History", 0));

        assert_eq!(notice.severity, Severity::Error);
        assert_eq!(notice.message, "Please select a future deadline date.");
        assert_eq!(app.store.subjects().len(), 1);
        assert_eq!(app.store.tasks().len(), 3);
        assert!(!app.needs_save());
    }

    #[test]
    fn test_toggle_task_messages() {
        let mut app = app_with_plan();
        let id = app.store.tasks()[0].id;

        let notice = app.toggle_task(id).unwrap();
        assert_eq!(notice.message, "Task \"Study Math\" completed!");
        assert!(app.needs_save());

        let notice = app.toggle_task(id).unwrap();
        assert_eq!(notice.message, "Task \"Study Math\" marked as incomplete!");
        assert!(!app.store.tasks()[0].completed);
    }

    #[test]
    fn test_toggle_unknown_task_is_silent() {
        let mut app = app_with_plan();
        let before = app.store.tasks().to_vec();

        assert_eq!(app.toggle_task(Uuid::new_v4()), None);
        assert_eq!(app.store.tasks().to_vec(), before);
        assert!(!app.needs_save());
    }

    #[test]
    fn test_mark_all_done_today() {
        let mut app = app_with_plan();
        app.submit_plan(&request("Physics", 2));

        let notice = app.mark_all_done(today());
        assert_eq!(notice.message, "All tasks for today marked as completed!");
        assert!(app.store.tasks_for_date(today()).iter().all(|t| t.completed));
        assert!(!app.store.tasks_for_date(add_days(today(), 1)).iter().any(|t| t.completed));
    }

    #[test]
    fn test_mark_all_done_without_tasks() {
        let mut app = app_with_plan();
        let notice = app.mark_all_done(add_days(today(), 10));
        assert_eq!(notice.severity, Severity::Info);
        assert!(!app.needs_save());
    }

    #[test]
    fn test_clear_all() {
        let mut app = app_with_plan();
        app.switch_view(ViewMode::Cards);

        let notice = app.clear_all();
        assert_eq!(notice, Notice::success("All data has been cleared."));
        assert!(app.store.is_empty());
        assert_eq!(app.view, ViewMode::Cards);
        assert_eq!(app.summary().overall_percent, 0);
    }

    #[test]
    fn test_shift_date_and_labels() {
        let mut app = app_with_plan();
        assert_eq!(app.date_label(), "Today");
        assert_eq!(app.browsed_tasks().len(), 1);

        app.shift_date(1);
        assert_eq!(app.date_label(), "Tomorrow");
        assert_eq!(app.browsed_tasks()[0].date, add_days(today(), 1));

        app.shift_date(-2);
        assert_eq!(app.date_label(), "Yesterday");
        assert!(app.browsed_tasks().is_empty());

        app.shift_date(-5);
        assert_eq!(app.date_label(), format_display(add_days(today(), -6)));

        app.reset_browse_date();
        assert_eq!(app.browse_date, today());
    }

    #[test]
    fn test_switch_view_only_dirty_on_change() {
        let mut app = AppState::new(SavedState::default(), today());
        app.switch_view(ViewMode::Timetable);
        assert!(!app.needs_save());
        app.switch_view(ViewMode::Cards);
        assert!(app.needs_save());
    }

    #[test]
    fn test_timer_events_become_notices() {
        let mut app = AppState::new(SavedState::default(), today());
        app.update_timer_settings(1, 1);
        app.start_timer();

        let notices = app.advance_timer(Duration::from_secs(60));
        assert_eq!(
            notices,
            vec![Notice::success("Study session complete! Time for a break.")]
        );
        assert_eq!(app.timer.mode(), TimerMode::Break);

        let notices = app.advance_timer(Duration::from_secs(2));
        assert_eq!(notices, vec![Notice::info("Break Time started")]);
        assert!(app.timer.is_running());

        assert!(app.pause_timer());
        app.reset_timer();
        assert_eq!(app.timer.remaining_seconds(), 60);
    }

    #[test]
    fn test_oversized_timer_settings_are_replaced() {
        let mut app = AppState::new(SavedState::default(), today());
        let settings = app.update_timer_settings(80_000_000, 10);
        assert_eq!(settings, TimerSettings::new(25, 10));
        assert_eq!(app.timer.remaining_seconds(), 1500);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_runs_through_app_state() {
        let mut app = AppState::new(SavedState::default(), today());
        app.update_timer_settings(1, 1);
        let mut notices = Vec::new();

        let reason = run(
            &mut app,
            Some(1),
            std::future::pending(),
            |notice: &Notice| notices.push(notice.clone()),
            |_| {},
        )
        .await;

        assert_eq!(reason, StopReason::SessionLimit);
        assert_eq!(
            notices,
            vec![Notice::success("Study session complete! Time for a break.")]
        );
        assert!(!app.timer.is_running());
        assert!(!app.timer.restart_pending());
    }

    #[test]
    fn test_save_and_load() {
        let mut kv = MemoryStore::new();
        let mut app = app_with_plan();
        app.toggle_task(app.store.tasks()[0].id);
        app.switch_view(ViewMode::Cards);
        app.update_timer_settings(40, 10);
        app.save(&mut kv).unwrap();
        assert!(!app.needs_save());

        let restored = AppState::load(&kv, today());
        assert_eq!(restored.store.tasks().to_vec(), app.store.tasks().to_vec());
        assert_eq!(restored.view, ViewMode::Cards);
        assert_eq!(restored.timer.settings(), TimerSettings::new(40, 10));
        assert_eq!(restored.timer.remaining_seconds(), 40 * 60);
        assert_eq!(restored.summary().overall_percent, 33);
    }

    #[test]
    fn test_view_change_keeps_unreadable_tasks_on_disk() {
        let mut kv = MemoryStore::new();
        let mut app = app_with_plan();
        app.changes = Changes::ALL;
        app.save(&mut kv).unwrap();
        kv.set(TASKS_KEY, "not json").unwrap();

        let mut app = AppState::load(&kv, today());
        assert_eq!(app.store.subjects().len(), 1);
        assert!(app.store.tasks().is_empty());

        app.switch_view(ViewMode::Cards);
        app.save(&mut kv).unwrap();

        assert_eq!(kv.get(TASKS_KEY).unwrap().as_deref(), Some("not json"));
        assert!(kv.get(SUBJECTS_KEY).unwrap().is_some());
        assert_eq!(AppState::load(&kv, today()).view, ViewMode::Cards);
    }
}
