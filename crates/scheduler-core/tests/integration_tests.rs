use std::sync::Arc;

use chrono::NaiveDate;
use scheduler_core::clock::FixedClock;
use scheduler_core::db::{establish_connection, MEMORY_DATABASE};
use scheduler_core::error::CoreError;
use scheduler_core::models::*;
use scheduler_core::query::TaskQuery;
use scheduler_core::service::TaskService;
use scheduler_core::store::{SqliteTaskStore, TaskStore};
use tempfile::TempDir;

/// Helper function to create a test database
async fn setup_test_db() -> (Arc<SqliteTaskStore>, TempDir) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("nested").join("test.db");

    let pool = establish_connection(&db_path.to_string_lossy())
        .await
        .expect("Failed to establish test database connection");

    (Arc::new(SqliteTaskStore::new(pool)), temp_dir)
}

fn service_at(store: Arc<SqliteTaskStore>, y: i32, m: u32, d: u32) -> TaskService {
    let today = NaiveDate::from_ymd_opt(y, m, d).unwrap();
    TaskService::new(store, Arc::new(FixedClock(today)))
}

fn new_task(date: &str, title: &str, comment: &str, repeat: &str) -> CreateTaskRequest {
    CreateTaskRequest {
        date: date.to_string(),
        title: title.to_string(),
        comment: comment.to_string(),
        repeat: repeat.to_string(),
    }
}

#[tokio::test]
async fn test_basic_task_crud_workflow() {
    let (store, _temp_dir) = setup_test_db().await;
    let service = service_at(store.clone(), 2024, 6, 1);

    // Create
    let task = service
        .create(new_task("", "Write report", "quarterly", ""))
        .await
        .expect("Failed to create task");
    assert_eq!(task.date, "20240601");

    // Read
    let fetched = service.get(&task.id).await.expect("Failed to fetch task");
    assert_eq!(fetched, task);

    // Update
    let mut changed = fetched.clone();
    changed.title = "Write final report".to_string();
    changed.date = "20240615".to_string();
    service.update(changed).await.expect("Failed to update task");

    let fetched = service.get(&task.id).await.unwrap();
    assert_eq!(fetched.title, "Write final report");
    assert_eq!(fetched.date, "20240615");

    // Delete
    service.delete(&task.id).await.expect("Failed to delete task");
    assert!(matches!(service.get(&task.id).await, Err(CoreError::NotFound(_))));
}

#[tokio::test]
async fn test_store_reports_not_found() {
    let (store, _temp_dir) = setup_test_db().await;

    assert!(matches!(store.find_by_id(404).await, Err(CoreError::NotFound(_))));
    assert!(matches!(store.delete(404).await, Err(CoreError::NotFound(_))));

    let ghost = Task {
        id: "404".to_string(),
        date: "20240101".to_string(),
        title: "ghost".to_string(),
        ..Default::default()
    };
    assert!(matches!(store.update(&ghost).await, Err(CoreError::NotFound(_))));
}

#[tokio::test]
async fn test_complete_recurring_task_reschedules() {
    let (store, _temp_dir) = setup_test_db().await;
    let id = store
        .insert(&new_task("20240113", "Laundry", "whites", "d 7"))
        .await
        .unwrap();

    let service = service_at(store.clone(), 2024, 1, 20);
    let outcome = service.complete(&id.to_string()).await.unwrap();

    let stored = store.find_by_id(id).await.unwrap();
    assert_eq!(stored.date, "20240127");
    assert_eq!(stored.repeat, "d 7");
    assert_eq!(stored.comment, "whites");
    assert_eq!(outcome, Completion::Rescheduled(stored));
}

#[tokio::test]
async fn test_complete_one_off_task_deletes() {
    let (store, _temp_dir) = setup_test_db().await;
    let id = store
        .insert(&new_task("20240120", "Return library book", "", ""))
        .await
        .unwrap();

    let service = service_at(store.clone(), 2024, 1, 20);
    assert_eq!(service.complete(&id.to_string()).await.unwrap(), Completion::Deleted);
    assert!(matches!(store.find_by_id(id).await, Err(CoreError::NotFound(_))));
}

#[tokio::test]
async fn test_task_search_workflow() {
    let (store, _temp_dir) = setup_test_db().await;
    for task in [
        new_task("20240126", "Dentist", "bring insurance card", ""),
        new_task("20240127", "Gym", "leg day", "d 2"),
        new_task("20240126", "Pay rent", "", "y"),
        new_task("20240125", "gym shoes", "buy new Card holder", ""),
        new_task("20240301", "Taxes", "", ""),
    ] {
        store.insert(&task).await.unwrap();
    }
    let service = service_at(store.clone(), 2024, 1, 20);

    // Date search matches only that day
    let by_date = service.list(0, 50, "26.01.2024").await.unwrap();
    let titles: Vec<&str> = by_date.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Dentist", "Pay rent"]);
    assert!(by_date.iter().all(|t| t.date == "20240126"));

    // Text search is case-sensitive and spans title and comment
    let gym = service.list(0, 50, "Gym").await.unwrap();
    assert_eq!(gym.len(), 1);
    assert_eq!(gym[0].title, "Gym");

    let card = service.list(0, 50, "Card").await.unwrap();
    assert_eq!(card.len(), 1);
    assert_eq!(card[0].title, "gym shoes");

    // Text search is ordered by date and ignores offset
    let lower = service.list(3, 50, "a").await.unwrap();
    let dates: Vec<&str> = lower.iter().map(|t| t.date.as_str()).collect();
    assert_eq!(dates, vec!["20240125", "20240126", "20240126", "20240127", "20240301"]);

    // Unfiltered listing is ordered by date and paged
    let page = service.list(1, 2, "").await.unwrap();
    let dates: Vec<&str> = page.iter().map(|t| t.date.as_str()).collect();
    assert_eq!(dates, vec!["20240126", "20240126"]);

    // Limit bounds every mode
    assert_eq!(service.list(0, 1, "26.01.2024").await.unwrap().len(), 1);
    assert_eq!(service.list(0, 2, "").await.unwrap().len(), 2);

    // No match is an empty list, not an error
    assert!(service.list(0, 50, "01.01.1999").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_percent_and_underscore_are_literal_in_text_search() {
    let (store, _temp_dir) = setup_test_db().await;
    store.insert(&new_task("20240101", "100% done", "", "")).await.unwrap();
    store.insert(&new_task("20240102", "snake_case", "", "")).await.unwrap();
    store.insert(&new_task("20240103", "plain", "", "")).await.unwrap();

    let percent = store.find(&TaskQuery::new(0, 10, "%")).await.unwrap();
    assert_eq!(percent.len(), 1);
    let underscore = store.find(&TaskQuery::new(0, 10, "_")).await.unwrap();
    assert_eq!(underscore.len(), 1);
}

#[tokio::test]
async fn test_in_memory_database_runs_migrations() {
    let pool = establish_connection(MEMORY_DATABASE)
        .await
        .expect("Failed to open in-memory database");
    let store = SqliteTaskStore::new(pool);

    let id = store.insert(&new_task("20240101", "a", "", "")).await.unwrap();
    assert_eq!(id, 1);
    assert_eq!(store.find_by_id(1).await.unwrap().title, "a");
    store.close().await;
}

#[tokio::test]
async fn test_reopening_database_keeps_tasks() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("scheduler.db");
    let path = db_path.to_string_lossy().to_string();

    {
        let store = SqliteTaskStore::new(establish_connection(&path).await.unwrap());
        store.insert(&new_task("20240101", "persisted", "", "")).await.unwrap();
        store.close().await;
    }

    let store = SqliteTaskStore::new(establish_connection(&path).await.unwrap());
    let all = store.find(&TaskQuery::new(0, 10, "")).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "persisted");
}
