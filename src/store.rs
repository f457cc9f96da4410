use crate::domain::{Subject, Task};
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("no task with id {0}")]
    NotFound(Uuid),
}

/// In-memory subjects and tasks, both kept in insertion order
#[derive(Debug, Clone, Default)]
pub struct Store {
    subjects: Vec<Subject>,
    tasks: Vec<Task>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from previously persisted collections
    pub fn from_parts(subjects: Vec<Subject>, tasks: Vec<Task>) -> Self {
        Self { subjects, tasks }
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty() && self.tasks.is_empty()
    }

    pub fn subject(&self, id: Uuid) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    pub fn task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Append a subject and its tasks; validation is the planner's job
    pub fn add_subject_with_tasks(&mut self, subject: Subject, tasks: Vec<Task>) {
        tracing::debug!(subject = %subject.name, tasks = tasks.len(), "adding subject");
        self.subjects.push(subject);
        self.tasks.extend(tasks);
    }

    /// Flip a task's completion flag, returning the new value
    pub fn toggle_completion(&mut self, task_id: Uuid) -> Result<bool, StoreError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or(StoreError::NotFound(task_id))?;
        Ok(task.toggle())
    }

    /// Mark every task on `date` completed; returns how many changed
    pub fn mark_all_completed_for_date(&mut self, date: NaiveDate) -> usize {
        let mut changed = 0;
        for task in self.tasks.iter_mut().filter(|t| t.date == date) {
            if !task.completed {
                task.completed = true;
                changed += 1;
            }
        }
        changed
    }

    pub fn clear_all(&mut self) {
        self.subjects.clear();
        self.tasks.clear();
    }

    pub fn tasks_for_date(&self, date: NaiveDate) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.date == date).collect()
    }

    pub fn tasks_for_subject(&self, subject_id: Uuid) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.subject_id == subject_id).collect()
    }

    /// Resolve a full id or a unique id prefix to a task id
    pub fn find_task_by_prefix(&self, prefix: &str) -> Option<Uuid> {
        let prefix = prefix.trim().to_lowercase();
        if prefix.is_empty() {
            return None;
        }
        let mut matches = self
            .tasks
            .iter()
            .filter(|t| t.id.to_string().starts_with(&prefix));
        let first = matches.next()?;
        if matches.next().is_some() {
            return None; // ambiguous
        }
        Some(first.id)
    }
}
