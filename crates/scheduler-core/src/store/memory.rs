use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::CoreError;
use crate::models::{CreateTaskRequest, Task, TaskId};
use crate::query::{Search, TaskQuery};
use crate::recurrence::format_date;
use crate::validation::parse_task_id;

use super::TaskStore;

#[derive(Debug, Default)]
struct MemoryState {
    tasks: BTreeMap<TaskId, Task>,
    last_id: TaskId,
}

/// Process-local task store with the same ordering and paging rules as the
/// SQLite store. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    state: RwLock<MemoryState>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.tasks.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn insert(&self, task: &CreateTaskRequest) -> Result<TaskId, CoreError> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        let id = state.last_id;
        state.tasks.insert(id, Task::from_request(id, task.clone()));
        tracing::debug!(id, "memory INSERT");
        Ok(id)
    }

    async fn find(&self, query: &TaskQuery) -> Result<Vec<Task>, CoreError> {
        let state = self.state.read().await;
        let limit = query.limit as usize;

        // Map iteration is by id, and the stable sort keeps that as the tiebreak.
        let tasks = match &query.search {
            Search::All => {
                let mut all: Vec<&Task> = state.tasks.values().collect();
                all.sort_by(|a, b| a.date.cmp(&b.date));
                all.into_iter()
                    .skip(query.effective_offset() as usize)
                    .take(limit)
                    .cloned()
                    .collect()
            }
            Search::Date(date) => {
                let date = format_date(*date);
                state
                    .tasks
                    .values()
                    .filter(|t| t.date == date)
                    .take(limit)
                    .cloned()
                    .collect()
            }
            Search::Text(needle) => {
                let mut matches: Vec<&Task> = state
                    .tasks
                    .values()
                    .filter(|t| t.title.contains(needle.as_str()) || t.comment.contains(needle.as_str()))
                    .collect();
                matches.sort_by(|a, b| a.date.cmp(&b.date));
                matches.into_iter().take(limit).cloned().collect()
            }
        };
        Ok(tasks)
    }

    async fn find_by_id(&self, id: TaskId) -> Result<Task, CoreError> {
        self.state
            .read()
            .await
            .tasks
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(id.to_string()))
    }

    async fn update(&self, task: &Task) -> Result<(), CoreError> {
        let id = parse_task_id(&task.id)?;
        let mut state = self.state.write().await;
        let stored = state
            .tasks
            .get_mut(&id)
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;
        *stored = task.clone();
        tracing::debug!(id, "memory UPDATE");
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> Result<(), CoreError> {
        let removed = self.state.write().await.tasks.remove(&id);
        match removed {
            Some(_) => {
                tracing::debug!(id, "memory DELETE");
                Ok(())
            }
            None => Err(CoreError::NotFound(id.to_string())),
        }
    }
}
