use crate::domain::dates::{date_run, days_until_ceil};
use crate::domain::{Difficulty, Subject, Task};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Why a plan submission was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("Please select a future deadline date.")]
    InvalidDeadline { deadline: NaiveDate, today: NaiveDate },
    #[error("Daily hours must be a positive number, got {0}.")]
    InvalidDailyHours(f64),
    #[error("Please enter a subject name.")]
    EmptyName,
}

/// A subject together with its generated daily tasks
#[derive(Debug, Clone)]
pub struct Plan {
    pub subject: Subject,
    pub tasks: Vec<Task>,
}

/// User input for a new study plan
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub name: String,
    pub deadline: NaiveDate,
    pub difficulty: Difficulty,
    pub daily_hours: f64,
}

/// Build a subject and one task per remaining day, starting at `today`
pub fn generate_plan(request: &PlanRequest, today: NaiveDate) -> Result<Plan, PlanError> {
    generate_plan_at(request, today, Utc::now())
}

/// Same as [`generate_plan`] with an explicit creation timestamp
pub fn generate_plan_at(
    request: &PlanRequest,
    today: NaiveDate,
    created_at: DateTime<Utc>,
) -> Result<Plan, PlanError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(PlanError::EmptyName);
    }
    if !(request.daily_hours.is_finite() && request.daily_hours > 0.0) {
        return Err(PlanError::InvalidDailyHours(request.daily_hours));
    }
    if request.deadline <= today {
        return Err(PlanError::InvalidDeadline {
            deadline: request.deadline,
            today,
        });
    }

    let remaining_days = days_until_ceil(
        today.and_time(NaiveTime::MIN),
        request.deadline.and_time(NaiveTime::MIN),
    );
    if remaining_days <= 0 {
        return Err(PlanError::InvalidDeadline {
            deadline: request.deadline,
            today,
        });
    }

    let weight = request.difficulty.weight();
    let total_hours_needed = remaining_days as f64 * request.daily_hours * weight;
    // Per-day hours derive from the total, not from daily_hours * weight
    let hours_per_day = total_hours_needed / remaining_days as f64;

    let subject = Subject {
        id: Uuid::new_v4(),
        name: name.to_string(),
        deadline: request.deadline,
        difficulty: request.difficulty,
        daily_hours: request.daily_hours,
        total_hours_needed,
        remaining_days: remaining_days as u32,
        hours_per_day,
        created_at,
    };

    let tasks = date_run(today, remaining_days as usize)
        .map(|date| Task::for_subject(&subject, date))
        .collect();

    tracing::debug!(
        subject = %subject.name,
        remaining_days,
        total_hours_needed,
        hours_per_day,
        "generated study plan"
    );

    Ok(Plan { subject, tasks })
}
