use std::sync::Arc;

use chrono::NaiveDate;

use crate::clock::Clock;
use crate::error::CoreError;
use crate::models::{Completion, CreateTaskRequest, Task};
use crate::query::TaskQuery;
use crate::recurrence::{self, format_date, parse_date};
use crate::store::TaskStore;
use crate::validation::{parse_task_id, validate_and_normalize, validate_for_update};

/// Task lifecycle: validation and normalization in front of the store, and
/// reschedule-or-delete on completion.
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
    clock: Arc<dyn Clock>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>, clock: Arc<dyn Clock>) -> Self {
        tracing::debug!("task service created");
        Self { store, clock }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub async fn create(&self, mut request: CreateTaskRequest) -> Result<Task, CoreError> {
        validate_and_normalize(&mut request, self.today())?;
        let id = self.store.insert(&request).await?;
        tracing::info!(id, date = %request.date, "task created");
        Ok(Task::from_request(id, request))
    }

    /// Lists tasks. `offset` is honoured only when `search` is empty.
    pub async fn list(&self, offset: u32, limit: u32, search: &str) -> Result<Vec<Task>, CoreError> {
        let query = TaskQuery::new(offset, limit, search);
        let tasks = self.store.find(&query).await?;
        if tasks.is_empty() {
            tracing::debug!(search, "no tasks found");
        }
        Ok(tasks)
    }

    pub async fn get(&self, id: &str) -> Result<Task, CoreError> {
        let id = parse_task_id(id)?;
        self.store.find_by_id(id).await
    }

    pub async fn update(&self, mut task: Task) -> Result<(), CoreError> {
        let id = validate_for_update(&mut task, self.today())?;
        self.store.update(&task).await?;
        tracing::info!(id, date = %task.date, "task updated");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<(), CoreError> {
        let id = parse_task_id(id)?;
        self.store.delete(id).await?;
        tracing::info!(id, "task deleted");
        Ok(())
    }

    /// Marks a task done: one-off tasks are deleted, recurring ones move to
    /// their next occurrence after today with every other field unchanged.
    pub async fn complete(&self, id: &str) -> Result<Completion, CoreError> {
        let task_id = parse_task_id(id)?;
        let mut task = self.store.find_by_id(task_id).await?;

        if !task.is_recurring() {
            self.store.delete(task_id).await?;
            tracing::info!(id = task_id, "one-off task completed and removed");
            return Ok(Completion::Deleted);
        }

        let date = parse_date(&task.date).ok_or(CoreError::InvalidData("date"))?;
        let next = recurrence::next_date(self.today(), date, &task.repeat)?;
        task.date = format_date(next);
        self.store.update(&task).await?;
        tracing::info!(id = task_id, date = %task.date, "recurring task rescheduled");
        Ok(Completion::Rescheduled(task))
    }

    /// Next occurrence after `now` for an arbitrary date and rule.
    pub fn next_date(&self, now: NaiveDate, date: NaiveDate, repeat: &str) -> Result<NaiveDate, CoreError> {
        recurrence::next_date(now, date, repeat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::store::MemoryTaskStore;

    fn day(value: &str) -> NaiveDate {
        parse_date(value).unwrap()
    }

    fn service_at(today: &str) -> (TaskService, Arc<MemoryTaskStore>) {
        let store = Arc::new(MemoryTaskStore::new());
        let service = TaskService::new(store.clone(), Arc::new(FixedClock(day(today))));
        (service, store)
    }

    fn request(date: &str, title: &str, repeat: &str) -> CreateTaskRequest {
        CreateTaskRequest {
            date: date.to_string(),
            title: title.to_string(),
            comment: String::new(),
            repeat: repeat.to_string(),
        }
    }

    mod create_tests {
        use super::*;

        #[tokio::test]
        async fn test_create_with_empty_date_uses_today() {
            let (service, _store) = service_at("20240601");
            let task = service.create(request("", "x", "")).await.unwrap();
            assert_eq!(task.id, "1");
            assert_eq!(task.date, "20240601");
        }

        #[tokio::test]
        async fn test_create_persists_normalized_date() {
            let (service, store) = service_at("20240601");
            let task = service.create(request("20240520", "weekly", "d 7")).await.unwrap();
            assert_eq!(task.date, "20240603");
            let stored = store.find_by_id(1).await.unwrap();
            assert_eq!(stored, task);
        }

        #[tokio::test]
        async fn test_create_rejects_without_touching_store() {
            let (service, store) = service_at("20240601");
            let result = service.create(request("20240101", "x", "d 0")).await;
            assert!(matches!(result, Err(CoreError::InvalidRule { .. })));
            assert!(store.is_empty().await);
        }
    }

    mod complete_tests {
        use super::*;

        #[tokio::test]
        async fn test_complete_recurring_advances_date_only() {
            let (service, store) = service_at("20240120");
            store
                .insert(&CreateTaskRequest {
                    date: "20240113".to_string(),
                    title: "Water plants".to_string(),
                    comment: "balcony".to_string(),
                    repeat: "d 7".to_string(),
                })
                .await
                .unwrap();

            let outcome = service.complete("1").await.unwrap();
            let stored = store.find_by_id(1).await.unwrap();
            assert_eq!(outcome, Completion::Rescheduled(stored.clone()));
            assert_eq!(stored.date, "20240127");
            assert_eq!(stored.title, "Water plants");
            assert_eq!(stored.comment, "balcony");
            assert_eq!(stored.repeat, "d 7");
            assert_eq!(store.len().await, 1);
        }

        #[tokio::test]
        async fn test_complete_one_off_deletes() {
            let (service, store) = service_at("20240120");
            store.insert(&request("20240120", "once", "")).await.unwrap();

            let outcome = service.complete("1").await.unwrap();
            assert_eq!(outcome, Completion::Deleted);
            assert!(store.is_empty().await);
        }

        #[tokio::test]
        async fn test_complete_missing_task() {
            let (service, _store) = service_at("20240120");
            let result = service.complete("5").await;
            assert!(matches!(result, Err(CoreError::NotFound(id)) if id == "5"));
        }

        #[tokio::test]
        async fn test_complete_future_recurring_still_moves_forward() {
            let (service, store) = service_at("20240120");
            store.insert(&request("20240301", "yearly review", "y")).await.unwrap();

            service.complete("1").await.unwrap();
            assert_eq!(store.find_by_id(1).await.unwrap().date, "20250301");
        }
    }

    mod update_delete_tests {
        use super::*;

        #[tokio::test]
        async fn test_update_missing_task_is_not_found() {
            let (service, _store) = service_at("20240601");
            let task = Task {
                id: "3".to_string(),
                date: "20240601".to_string(),
                title: "x".to_string(),
                ..Default::default()
            };
            assert!(matches!(service.update(task).await, Err(CoreError::NotFound(_))));
        }

        #[tokio::test]
        async fn test_update_validates_before_store() {
            let (service, store) = service_at("20240601");
            store.insert(&request("20240601", "x", "")).await.unwrap();
            let task = Task {
                id: "1".to_string(),
                date: "2024-06-01".to_string(),
                title: "x".to_string(),
                ..Default::default()
            };
            assert!(matches!(service.update(task).await, Err(CoreError::InvalidData("date"))));
            assert_eq!(store.find_by_id(1).await.unwrap().date, "20240601");
        }

        #[tokio::test]
        async fn test_delete_then_get() {
            let (service, store) = service_at("20240601");
            store.insert(&request("20240601", "x", "")).await.unwrap();
            service.delete("1").await.unwrap();
            assert!(matches!(service.get("1").await, Err(CoreError::NotFound(_))));
            assert!(matches!(service.delete("1").await, Err(CoreError::NotFound(_))));
        }

        #[tokio::test]
        async fn test_get_rejects_malformed_id() {
            let (service, _store) = service_at("20240601");
            assert!(matches!(service.get("").await, Err(CoreError::EmptyField("id"))));
            assert!(matches!(service.get("abc").await, Err(CoreError::InvalidData("id"))));
        }
    }

    #[tokio::test]
    async fn test_list_never_fails_on_empty_store() {
        let (service, _store) = service_at("20240601");
        let tasks = service.list(0, 50, "anything").await.unwrap();
        assert!(tasks.is_empty());
    }
}
