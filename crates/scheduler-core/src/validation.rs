//! Validation and date normalization applied before a task is persisted.

use chrono::NaiveDate;

use crate::error::CoreError;
use crate::models::{CreateTaskRequest, Task, TaskId};
use crate::recurrence::{format_date, next_date, parse_date};

/// The fields the validator reads and rewrites.
pub trait Schedulable {
    fn title(&self) -> &str;
    fn date(&self) -> &str;
    fn repeat(&self) -> &str;
    fn set_date(&mut self, date: String);
}

impl Schedulable for CreateTaskRequest {
    fn title(&self) -> &str {
        &self.title
    }

    fn date(&self) -> &str {
        &self.date
    }

    fn repeat(&self) -> &str {
        &self.repeat
    }

    fn set_date(&mut self, date: String) {
        self.date = date;
    }
}

impl Schedulable for Task {
    fn title(&self) -> &str {
        &self.title
    }

    fn date(&self) -> &str {
        &self.date
    }

    fn repeat(&self) -> &str {
        &self.repeat
    }

    fn set_date(&mut self, date: String) {
        self.date = date;
    }
}

/// Checks the title and rewrites `date` to its persisted value.
///
/// An empty date becomes today. A past date becomes today for one-off tasks
/// and the next occurrence after today for recurring ones. Today and future
/// dates are kept as given; on the future path `repeat` is not parsed.
pub fn validate_and_normalize<T>(task: &mut T, now: NaiveDate) -> Result<(), CoreError>
where
    T: Schedulable + ?Sized,
{
    if task.title().is_empty() {
        return Err(CoreError::EmptyField("title"));
    }

    if task.date().is_empty() {
        task.set_date(format_date(now));
        return Ok(());
    }

    let date = parse_date(task.date()).ok_or(CoreError::InvalidData("date"))?;
    if date >= now {
        return Ok(());
    }

    let normalized = if task.repeat().is_empty() {
        now
    } else {
        next_date(now, date, task.repeat())?
    };
    task.set_date(format_date(normalized));
    Ok(())
}

/// Parses a wire id: non-empty, decimal digits only, positive.
pub fn parse_task_id(id: &str) -> Result<TaskId, CoreError> {
    if id.is_empty() {
        return Err(CoreError::EmptyField("id"));
    }
    if !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::InvalidData("id"));
    }
    match id.parse::<TaskId>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(CoreError::InvalidData("id")),
    }
}

/// Update-path validation: the id is checked before any other field.
pub fn validate_for_update(task: &mut Task, now: NaiveDate) -> Result<TaskId, CoreError> {
    let id = parse_task_id(&task.id)?;
    validate_and_normalize(task, now)?;
    Ok(id)
}
