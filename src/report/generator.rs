use crate::domain::dates::{format_display, format_iso};
use crate::report::stats::{day_cards, summary};
use crate::store::Store;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Format hours with one decimal and an "h" suffix
pub(crate) fn format_hours(hours: f64) -> String {
    format!("{:.1}h", hours)
}

/// Render a text progress bar, e.g. "[#####-----]"
pub(crate) fn progress_bar(percent: u8, width: usize) -> String {
    let filled = (percent as usize * width + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled.min(width)))
}

/// Render the Markdown progress report for `date`
pub fn render_report(store: &Store, date: NaiveDate) -> String {
    let summary = summary(store, date);
    let mut report = String::new();

    // Header
    report.push_str(&format!("# Study Report - {}\n\n", format_iso(date)));

    // Summary Section
    report.push_str("## Summary\n\n");
    report.push_str(&format!(
        "- **Overall Progress:** {}% {}\n",
        summary.overall_percent,
        progress_bar(summary.overall_percent, 20)
    ));
    report.push_str(&format!(
        "- **Tasks Completed:** {}/{}\n",
        summary.completed_tasks, summary.total_tasks
    ));
    report.push_str(&format!("- **Subjects:** {}\n\n", store.subjects().len()));

    // Day Section
    report.push_str(&format!("## {}\n\n", format_display(date)));
    report.push_str(&format!(
        "- **Completed:** {}/{} tasks\n",
        summary.today.completed_count, summary.today.task_count
    ));
    report.push_str(&format!(
        "- **Study Hours:** {} of {} planned\n\n",
        format_hours(summary.today.total_completed_hours),
        format_hours(summary.today.total_hours)
    ));

    let cards = day_cards(store, date);
    if cards.is_empty() {
        report.push_str("No tasks scheduled for this day.\n\n");
    }
    for card in &cards {
        let mark = if card.completed == card.total() { "x" } else { " " };
        report.push_str(&format!(
            "- [{}] **{}** ({}) - {}\n",
            mark,
            card.name,
            card.difficulty,
            format_hours(card.total_hours)
        ));
    }
    if !cards.is_empty() {
        report.push('\n');
    }

    // Subjects Section
    if !summary.subjects.is_empty() {
        report.push_str("## Subjects\n\n");
        for row in &summary.subjects {
            let deadline = store
                .subject(row.subject_id)
                .map(|s| format!(" - due {}", format_iso(s.deadline)))
                .unwrap_or_default();
            report.push_str(&format!(
                "- **{}:** {}% ({}/{}){}\n",
                row.name, row.percent, row.completed, row.total, deadline
            ));
        }
        report.push('\n');
    }

    report
}

/// Write the report for `date` to `output_path`, or to `report-YYYY-MM-DD.md`
/// inside `data_dir` when no path is given
pub fn generate_report(
    store: &Store,
    date: NaiveDate,
    output_path: Option<PathBuf>,
    data_dir: &Path,
) -> Result<PathBuf> {
    let report = render_report(store, date);

    let output = output_path.unwrap_or_else(|| data_dir.join(format!("report-{}.md", format_iso(date))));

    std::fs::write(&output, report)
        .with_context(|| format!("Failed to write report: {}", output.display()))?;
    tracing::info!(path = %output.display(), "report written");

    Ok(output)
}
