use super::enums::Difficulty;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A study topic with a deadline and the workload derived from it
///
/// Subjects are immutable once generated; the derived fields are cached
/// at generation time rather than recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
    pub deadline: NaiveDate,
    pub difficulty: Difficulty,
    /// Hours per day requested by the user
    pub daily_hours: f64,
    /// remaining_days * daily_hours * weight
    pub total_hours_needed: f64,
    /// Inclusive day count from creation to deadline; also the task count
    pub remaining_days: u32,
    /// total_hours_needed / remaining_days
    pub hours_per_day: f64,
    pub created_at: DateTime<Utc>,
}

/// One day's scheduled study session for a subject
///
/// `subject_name` and `difficulty` are snapshots taken when the task was
/// generated, not live references to the subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub name: String,
    pub subject_name: String,
    pub date: NaiveDate,
    pub hours: f64,
    pub completed: bool,
    pub difficulty: Difficulty,
}

impl Task {
    /// A fresh, incomplete task for `subject` on `date`
    pub fn for_subject(subject: &Subject, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject_id: subject.id,
            name: format!("Study {}", subject.name),
            subject_name: subject.name.clone(),
            date,
            hours: subject.hours_per_day,
            completed: false,
            difficulty: subject.difficulty,
        }
    }

    /// Flip completion and return the new value
    pub fn toggle(&mut self) -> bool {
        self.completed = !self.completed;
        self.completed
    }

    /// First eight characters of the id, enough to address a task from the CLI
    pub fn short_id(&self) -> String {
        self.id.to_string()[..8].to_string()
    }

    /// Hours formatted with one decimal, e.g. "1.5"
    pub fn hours_formatted(&self) -> String {
        format!("{:.1}", self.hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_subject() -> Subject {
        Subject {
            id: Uuid::new_v4(),
            name: "Chemistry".to_string(),
            deadline: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            difficulty: Difficulty::Hard,
            daily_hours: 1.0,
            total_hours_needed: 6.0,
            remaining_days: 4,
            hours_per_day: 1.5,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_task_for_subject_copies_snapshot() {
        let subject = sample_subject();
        let date = NaiveDate::from_ymd_opt(2024, 6, 6).unwrap();
        let task = Task::for_subject(&subject, date);

        assert_eq!(task.subject_id, subject.id);
        assert_eq!(task.name, "Study Chemistry");
        assert_eq!(task.subject_name, "Chemistry");
        assert_eq!(task.difficulty, Difficulty::Hard);
        assert_eq!(task.hours, 1.5);
        assert_eq!(task.date, date);
        assert!(!task.completed);
    }

    #[test]
    fn test_task_toggle_twice_restores() {
        let subject = sample_subject();
        let mut task = Task::for_subject(&subject, subject.deadline);
        assert!(task.toggle());
        assert!(!task.toggle());
        assert!(!task.completed);
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let subject = sample_subject();
        let task = Task::for_subject(&subject, NaiveDate::from_ymd_opt(2024, 6, 7).unwrap());
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(json["subjectName"], "Chemistry");
        assert_eq!(json["date"], "2024-06-07");
        assert_eq!(json["difficulty"], "hard");
        assert_eq!(json["completed"], false);
        assert!(json.get("subjectId").is_some());
    }

    #[test]
    fn test_subject_serializes_camel_case() {
        let json = serde_json::to_value(sample_subject()).unwrap();
        assert_eq!(json["deadline"], "2024-06-10");
        assert_eq!(json["remainingDays"], 4);
        assert_eq!(json["hoursPerDay"], 1.5);
        assert_eq!(json["totalHoursNeeded"], 6.0);
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_short_id_and_hours_formatted() {
        let subject = sample_subject();
        let task = Task::for_subject(&subject, subject.deadline);
        assert_eq!(task.short_id().len(), 8);
        assert!(task.id.to_string().starts_with(&task.short_id()));
        assert_eq!(task.hours_formatted(), "1.5");
    }
}
