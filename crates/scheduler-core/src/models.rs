use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Primary key of the `scheduler` table.
pub type TaskId = i64;

/// A scheduled task as stored and as exchanged over the wire.
///
/// `id` travels as a decimal string so that the update path can tell an
/// absent id from a malformed one; `date` is always `YYYYMMDD` once stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Task {
    pub id: String,
    pub date: String,
    pub title: String,
    pub comment: String,
    pub repeat: String,
}

impl Task {
    /// Builds the stored form of a validated creation request.
    pub fn from_request(id: TaskId, request: CreateTaskRequest) -> Self {
        Self {
            id: id.to_string(),
            date: request.date,
            title: request.title,
            comment: request.comment,
            repeat: request.repeat,
        }
    }

    pub fn is_recurring(&self) -> bool {
        !self.repeat.is_empty()
    }
}

/// Input for task creation. Missing JSON fields read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateTaskRequest {
    pub date: String,
    pub title: String,
    pub comment: String,
    pub repeat: String,
}

/// Row shape of the `scheduler` table.
#[derive(Debug, Clone, FromRow)]
pub struct TaskRow {
    pub id: TaskId,
    pub date: String,
    pub title: String,
    pub comment: String,
    pub repeat: String,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Self {
            id: row.id.to_string(),
            date: row.date,
            title: row.title,
            comment: row.comment,
            repeat: row.repeat,
        }
    }
}

/// Outcome of completing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// One-off task, removed from the store.
    Deleted,
    /// Recurring task, moved to its next occurrence.
    Rescheduled(Task),
}
