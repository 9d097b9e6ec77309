use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};

use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{CreateTaskRequest, Task, TaskId, TaskRow};
use crate::query::{Search, TaskQuery};
use crate::recurrence::format_date;
use crate::validation::parse_task_id;

use super::TaskStore;

const SELECT_TASKS: &str = "SELECT id, date, title, comment, repeat FROM scheduler";

/// SQLite implementation of the task store
pub struct SqliteTaskStore {
    pool: DbPool,
}

impl SqliteTaskStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Waits for in-flight queries and closes every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("sqlite pool closed");
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn insert(&self, task: &CreateTaskRequest) -> Result<TaskId, CoreError> {
        tracing::debug!(date = %task.date, title = %task.title, "sqlite INSERT");

        let result = sqlx::query(
            "INSERT INTO scheduler (date, title, comment, repeat) VALUES ($1, $2, $3, $4)",
        )
        .bind(&task.date)
        .bind(&task.title)
        .bind(&task.comment)
        .bind(&task.repeat)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        tracing::debug!(id, "sqlite INSERT done");
        Ok(id)
    }

    async fn find(&self, query: &TaskQuery) -> Result<Vec<Task>, CoreError> {
        tracing::debug!(
            search = ?query.search,
            offset = query.offset,
            limit = query.limit,
            "sqlite SELECT"
        );

        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_TASKS);
        match &query.search {
            Search::All => {
                query_builder.push(" ORDER BY date, id");
            }
            Search::Date(date) => {
                query_builder.push(" WHERE date = ");
                query_builder.push_bind(format_date(*date));
                query_builder.push(" ORDER BY id");
            }
            Search::Text(needle) => {
                // instr() is case-sensitive where LIKE is not.
                query_builder.push(" WHERE instr(title, ");
                query_builder.push_bind(needle.clone());
                query_builder.push(") > 0 OR instr(comment, ");
                query_builder.push_bind(needle.clone());
                query_builder.push(") > 0 ORDER BY date, id");
            }
        }
        query_builder.push(" LIMIT ");
        query_builder.push_bind(i64::from(query.limit));
        query_builder.push(" OFFSET ");
        query_builder.push_bind(i64::from(query.effective_offset()));

        let rows: Vec<TaskRow> = query_builder.build_query_as().fetch_all(&self.pool).await?;
        tracing::debug!(found = rows.len(), "sqlite SELECT done");
        Ok(rows.into_iter().map(Task::from).collect())
    }

    async fn find_by_id(&self, id: TaskId) -> Result<Task, CoreError> {
        tracing::debug!(id, "sqlite SELECT by id");

        let row: Option<TaskRow> = sqlx::query_as(
            "SELECT id, date, title, comment, repeat FROM scheduler WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Task::from)
            .ok_or_else(|| CoreError::NotFound(id.to_string()))
    }

    async fn update(&self, task: &Task) -> Result<(), CoreError> {
        let id = parse_task_id(&task.id)?;
        tracing::debug!(id, date = %task.date, "sqlite UPDATE");

        let result = sqlx::query(
            "UPDATE scheduler SET date = $1, title = $2, comment = $3, repeat = $4 WHERE id = $5",
        )
        .bind(&task.date)
        .bind(&task.title)
        .bind(&task.comment)
        .bind(&task.repeat)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> Result<(), CoreError> {
        tracing::debug!(id, "sqlite DELETE");

        let result = sqlx::query("DELETE FROM scheduler WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
