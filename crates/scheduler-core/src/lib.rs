//! # Scheduler Core Library
//!
//! Domain logic for a recurring task scheduler: every task has a due date and
//! an optional repeat rule, and completing a recurring task moves it to its
//! next occurrence instead of removing it.
//!
//! ## Features
//!
//! - **Repeat Rules**: `d <N>` (every N days, up to 400) and `y` (yearly)
//! - **Recurrence Engine**: calendar-correct next-occurrence computation,
//!   including Feb 29 rolling over to Mar 1 in non-leap years
//! - **Validation**: date normalization on create and update
//! - **Search**: date search (`DD.MM.YYYY`) or case-sensitive text search
//! - **Pluggable Storage**: `TaskStore` trait with SQLite and in-memory stores
//!
//! ## Core Modules
//!
//! - [`db`]: Database connection and migration management
//! - [`models`]: Task entity and transfer objects
//! - [`repeat`]: Repeat rule grammar
//! - [`recurrence`]: Next-occurrence computation and date formats
//! - [`validation`]: Create/update validation and normalization
//! - [`query`]: List and search semantics
//! - [`store`]: Persistence trait and implementations
//! - [`service`]: Task lifecycle orchestration
//! - [`clock`]: Source of "today"
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use scheduler_core::{
//!     clock::SystemClock, db, models::CreateTaskRequest, service::TaskService,
//!     store::SqliteTaskStore,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), scheduler_core::error::CoreError> {
//!     let pool = db::establish_connection("scheduler.db").await?;
//!     let service = TaskService::new(
//!         Arc::new(SqliteTaskStore::new(pool)),
//!         Arc::new(SystemClock),
//!     );
//!
//!     let task = service
//!         .create(CreateTaskRequest {
//!             title: "Water the plants".to_string(),
//!             repeat: "d 3".to_string(),
//!             ..Default::default()
//!         })
//!         .await?;
//!     println!("Created task {} due {}", task.id, task.date);
//!
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod db;
pub mod error;
pub mod models;
pub mod query;
pub mod recurrence;
pub mod repeat;
pub mod service;
pub mod store;
pub mod validation;
