use crate::domain::{Difficulty, Task};
use crate::store::Store;
use chrono::NaiveDate;
use uuid::Uuid;

/// Completion figures for a single day
#[derive(Debug, Clone, PartialEq)]
pub struct DayStats {
    pub task_count: usize,
    pub completed_count: usize,
    /// Hours across every task on the day
    pub total_hours: f64,
    /// Hours across completed tasks only
    pub total_completed_hours: f64,
}

/// Progress row for one subject
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectProgress {
    pub subject_id: Uuid,
    pub name: String,
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
}

/// A day's tasks for one subject, as shown in the cards view
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectDayCard {
    pub subject_id: Uuid,
    pub name: String,
    pub difficulty: Difficulty,
    pub total_hours: f64,
    pub completed: usize,
    pub tasks: Vec<Task>,
}

impl SubjectDayCard {
    pub fn total(&self) -> usize {
        self.tasks.len()
    }

    pub fn percent(&self) -> u8 {
        percent(self.completed, self.total())
    }
}

/// Everything the dashboard shows
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSummary {
    pub overall_percent: u8,
    pub completed_tasks: usize,
    pub total_tasks: usize,
    pub subjects: Vec<SubjectProgress>,
    pub today: DayStats,
}

/// round(100 * completed / total), half-up; 0 when there is nothing to complete
pub fn percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let ratio = completed as f64 / total as f64;
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

fn completed_count<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> (usize, usize) {
    tasks
        .into_iter()
        .fold((0, 0), |(done, total), t| (done + usize::from(t.completed), total + 1))
}

/// Percentage of all tasks that are completed
pub fn overall_progress(store: &Store) -> u8 {
    let (done, total) = completed_count(store.tasks());
    percent(done, total)
}

/// Percentage of one subject's tasks that are completed
pub fn subject_progress(store: &Store, subject_id: Uuid) -> u8 {
    let (done, total) = completed_count(store.tasks_for_subject(subject_id));
    percent(done, total)
}

/// Counts and hours for the tasks scheduled on `date`
pub fn today_stats(store: &Store, date: NaiveDate) -> DayStats {
    let mut stats = DayStats {
        task_count: 0,
        completed_count: 0,
        total_hours: 0.0,
        total_completed_hours: 0.0,
    };

    for task in store.tasks_for_date(date) {
        stats.task_count += 1;
        stats.total_hours += task.hours;
        if task.completed {
            stats.completed_count += 1;
            stats.total_completed_hours += task.hours;
        }
    }

    stats
}

/// One progress row per subject, in subject order
pub fn subject_breakdown(store: &Store) -> Vec<SubjectProgress> {
    store
        .subjects()
        .iter()
        .map(|subject| {
            let (completed, total) = completed_count(store.tasks_for_subject(subject.id));
            SubjectProgress {
                subject_id: subject.id,
                name: subject.name.clone(),
                completed,
                total,
                percent: subject_progress(store, subject.id),
            }
        })
        .collect()
}

/// Group a day's tasks by subject, keeping the order subjects first appear
pub fn day_cards(store: &Store, date: NaiveDate) -> Vec<SubjectDayCard> {
    let mut cards: Vec<SubjectDayCard> = Vec::new();

    for task in store.tasks_for_date(date) {
        let index = match cards.iter().position(|c| c.subject_id == task.subject_id) {
            Some(index) => index,
            None => {
                // Prefer the live subject record, fall back to the task's snapshot
                let (name, difficulty) = store
                    .subject(task.subject_id)
                    .map(|s| (s.name.clone(), s.difficulty))
                    .unwrap_or_else(|| (task.subject_name.clone(), task.difficulty));
                cards.push(SubjectDayCard {
                    subject_id: task.subject_id,
                    name,
                    difficulty,
                    total_hours: 0.0,
                    completed: 0,
                    tasks: Vec::new(),
                });
                cards.len() - 1
            }
        };

        let card = &mut cards[index];
        card.total_hours += task.hours;
        card.completed += usize::from(task.completed);
        card.tasks.push(task.clone());
    }

    cards
}

/// Overall, per-subject and per-day figures
pub fn summary(store: &Store, today: NaiveDate) -> ProgressSummary {
    let (completed_tasks, total_tasks) = completed_count(store.tasks());
    ProgressSummary {
        overall_percent: overall_progress(store),
        completed_tasks,
        total_tasks,
        subjects: subject_breakdown(store),
        today: today_stats(store, today),
    }
}
