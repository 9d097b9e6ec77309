use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use scheduler_core::{clock::SystemClock, db, service::TaskService, store::SqliteTaskStore};
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::auth::{require_auth, Authenticator};
use crate::config::Config;
use crate::handlers;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: TaskService,
    pub auth: Authenticator,
    pub list_limit: u32,
}

impl AppState {
    pub fn new(service: TaskService, auth: Authenticator, list_limit: u32) -> Self {
        Self {
            service,
            auth,
            list_limit,
        }
    }
}

pub fn build_router(state: AppState, web_dir: Option<&Path>) -> Router {
    let protected = Router::new()
        .route(
            "/api/task",
            post(handlers::add_task)
                .get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route("/api/tasks", get(handlers::list_tasks))
        .route("/api/task/done", post(handlers::complete_task))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let mut router = Router::new()
        .route("/api/nextdate", get(handlers::next_date))
        .route("/api/signin", post(handlers::sign_in))
        .route("/health", get(handlers::health))
        .merge(protected);

    if let Some(dir) = web_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Opens the database, serves until Ctrl-C, then closes the pool.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let pool = db::establish_connection(&config.db_file)
        .await
        .with_context(|| format!("failed to open database at {}", config.db_file))?;
    let store = Arc::new(SqliteTaskStore::new(pool));
    let service = TaskService::new(store.clone(), Arc::new(SystemClock));
    let auth = Authenticator::new(
        config.password().map(str::to_string),
        config.jwt_secret.clone(),
    );
    if auth.is_enabled() && config.jwt_secret.is_empty() {
        tracing::warn!("password is set but JWT_SECRET is empty; tokens are signed with an empty key");
    }

    let state = AppState::new(service, auth, config.list_limit);
    let app = build_router(state, config.web_dir.as_deref());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(%addr, db = %config.db_file, auth = config.password().is_some(), "scheduler listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    store.close().await;
    tracing::info!("scheduler stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}
