use crate::domain::{Task, ViewMode};
use crate::report::generator::{format_hours, progress_bar};
use crate::report::{day_cards, ProgressSummary, SubjectDayCard};
use crate::store::Store;
use crate::timer::FocusTimer;
use chrono::NaiveDate;

fn check(completed: bool) -> &'static str {
    if completed {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Render a day's schedule in the given view mode
pub fn schedule(view: ViewMode, label: &str, store: &Store, date: NaiveDate) -> String {
    match view {
        ViewMode::Timetable => timetable(label, &store.tasks_for_date(date)),
        ViewMode::Cards => cards(label, &day_cards(store, date)),
    }
}

/// One row per task
pub fn timetable(label: &str, tasks: &[&Task]) -> String {
    let mut out = format!("Schedule for {}\n", label);
    if tasks.is_empty() {
        out.push_str("  No tasks scheduled.\n");
        return out;
    }

    let width = tasks.iter().map(|t| t.subject_name.len()).max().unwrap_or(0).max(7);
    out.push_str(&format!("      {:<width$}  {:>6}  {:<6}\n", "Subject", "Hours", "Level", width = width));
    for task in tasks {
        out.push_str(&format!(
            "  {} {:<width$}  {:>6}  {:<6}\n",
            check(task.completed),
            task.subject_name,
            format_hours(task.hours),
            task.difficulty.as_str(),
            width = width
        ));
    }
    out
}

/// One card per subject with its tasks underneath
pub fn cards(label: &str, cards: &[SubjectDayCard]) -> String {
    let mut out = format!("Schedule for {}\n", label);
    if cards.is_empty() {
        out.push_str("  No tasks scheduled.\n");
        return out;
    }

    for card in cards {
        out.push_str(&format!(
            "\n  {} ({}) {} {}/{} done, {}\n",
            card.name,
            card.difficulty,
            progress_bar(card.percent(), 10),
            card.completed,
            card.total(),
            format_hours(card.total_hours)
        ));
        for task in &card.tasks {
            out.push_str(&format!(
                "    {} {} {}\n",
                check(task.completed),
                task.name,
                task.hours_formatted()
            ));
        }
    }
    out
}

/// Task list with short ids for `toggle`
pub fn task_list(label: &str, tasks: &[&Task]) -> String {
    let mut out = format!("Tasks for {}\n", label);
    if tasks.is_empty() {
        out.push_str("  No tasks for this day.\n");
        return out;
    }
    for task in tasks {
        out.push_str(&format!(
            "  {} {}  {} - {}h\n",
            check(task.completed),
            task.short_id(),
            task.name,
            task.hours_formatted()
        ));
    }
    out
}

pub fn progress(summary: &ProgressSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Overall progress: {}% {}\n",
        summary.overall_percent,
        progress_bar(summary.overall_percent, 20)
    ));
    out.push_str(&format!(
        "Tasks completed:  {}/{}\n",
        summary.completed_tasks, summary.total_tasks
    ));
    out.push_str(&format!(
        "Today:            {}/{} tasks, {} of {}\n",
        summary.today.completed_count,
        summary.today.task_count,
        format_hours(summary.today.total_completed_hours),
        format_hours(summary.today.total_hours)
    ));

    if !summary.subjects.is_empty() {
        out.push_str("\nSubjects\n");
        for row in &summary.subjects {
            out.push_str(&format!(
                "  {:<16} {} {:>3}% ({}/{})\n",
                row.name,
                progress_bar(row.percent, 10),
                row.percent,
                row.completed,
                row.total
            ));
        }
    }
    out
}

/// Single-line timer display, e.g. "Study Session 24:59 [----------]"
pub fn timer_line(timer: &FocusTimer) -> String {
    let state = if timer.is_running() {
        ""
    } else if timer.restart_pending() {
        " (next session starting)"
    } else {
        " (paused)"
    };
    let elapsed = timer.progress_percent().round() as u8;
    format!(
        "{} {} {}{}",
        timer.label(),
        timer.format_remaining(),
        progress_bar(elapsed, 10),
        state
    )
}
