//! Next-occurrence computation for recurring tasks.
//!
//! Completing a recurring task spawns exactly one successor. The functions in
//! this module are pure: callers pass in "today" and "now" so the outcome does
//! not depend on the wall clock.

use jiff::{civil::Date, Span, Timestamp};

use crate::models::{Quadrant, Recurrence, RecurrenceKind, Task, TaskId, TaskStatus};

/// Reasoning placed on a freshly spawned recurring instance.
pub const NEEDS_CLASSIFICATION: &str = "New recurring instance - needs classification";

/// Adds one recurrence step to `base`.
///
/// Monthly steps use calendar-month arithmetic and clamp the day to the end
/// of a shorter target month: 2024-01-31 plus one month is 2024-02-29.
/// Returns `None` only when the result falls outside the supported date range.
///
/// # Examples
///
/// ```rust
/// use jiff::civil::date;
/// use quadrant_core::{models::{Recurrence, RecurrenceKind}, recurrence::next_due_date};
///
/// let every_two_weeks = Recurrence::new(RecurrenceKind::Weekly, 2);
/// assert_eq!(next_due_date(date(2024, 1, 1), &every_two_weeks), Some(date(2024, 1, 15)));
/// ```
pub fn next_due_date(base: Date, recurrence: &Recurrence) -> Option<Date> {
    let interval = i64::from(recurrence.interval.get());
    let step = match recurrence.kind {
        RecurrenceKind::Daily => Span::new().try_days(interval),
        RecurrenceKind::Weekly => Span::new().try_days(interval * 7),
        RecurrenceKind::Monthly => Span::new().try_months(interval),
    }
    .ok()?;
    base.checked_add(step).ok()
}

/// Builds the successor of a recurring task that is being completed.
///
/// Returns `None` when the task does not recur. The successor copies the task
/// with a new id and creation time, goes back to `active` and `unclassified`,
/// and is due one recurrence step after the task's due date (or after
/// `today` when the task had none).
pub fn spawn_successor(completed: &Task, today: Date, now: Timestamp) -> Option<Task> {
    let recurrence = completed.recurring?;
    let base = completed.due_date.unwrap_or(today);
    let Some(due_date) = next_due_date(base, &recurrence) else {
        log::warn!(
            "Recurrence of task {} overflows the calendar from {base}; no successor spawned",
            completed.id
        );
        return None;
    };

    Some(Task {
        id: TaskId::generate(),
        created_at: now,
        status: TaskStatus::Active,
        quadrant: Quadrant::Unclassified,
        reasoning: Some(NEEDS_CLASSIFICATION.to_string()),
        date_reasoning: None,
        scheduling_hint: None,
        due_date: Some(due_date),
        recurring: Some(recurrence),
        ..completed.clone()
    })
}
