use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::{CreateTaskRequest, Task, TaskId};
use crate::query::TaskQuery;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryTaskStore;
pub use sqlite::SqliteTaskStore;

/// Persistence boundary for tasks.
///
/// Every call is a single request/response against the backing engine;
/// nothing here spans a transaction across calls. Lookups and mutations of a
/// missing id report [`CoreError::NotFound`].
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Stores a validated request and returns the assigned id.
    async fn insert(&self, task: &CreateTaskRequest) -> Result<TaskId, CoreError>;

    /// Lists tasks per the query's search mode. See [`TaskQuery`].
    async fn find(&self, query: &TaskQuery) -> Result<Vec<Task>, CoreError>;

    async fn find_by_id(&self, id: TaskId) -> Result<Task, CoreError>;

    /// Overwrites every field of the task with the matching id.
    async fn update(&self, task: &Task) -> Result<(), CoreError>;

    async fn delete(&self, id: TaskId) -> Result<(), CoreError>;
}
