use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use scheduler_core::{
    error::CoreError,
    models::{CreateTaskRequest, Task},
    recurrence::{format_date, parse_date},
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;

type ApiResult<T> = Result<T, ApiError>;

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

fn params<T>(query: Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    query
        .map(|Query(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NextDateParams {
    pub now: String,
    pub date: String,
    pub repeat: String,
}

/// `GET /api/nextdate`: plain-text `YYYYMMDD` of the next occurrence.
pub async fn next_date(
    State(state): State<AppState>,
    query: Result<Query<NextDateParams>, QueryRejection>,
) -> ApiResult<String> {
    let p = params(query)?;
    if p.now.is_empty() {
        return Err(CoreError::EmptyField("now").into());
    }
    if p.date.is_empty() {
        return Err(CoreError::EmptyField("date").into());
    }
    if p.repeat.is_empty() {
        return Err(CoreError::EmptyField("repeat").into());
    }
    let now = parse_date(&p.now).ok_or(CoreError::InvalidData("now"))?;
    let date = parse_date(&p.date).ok_or(CoreError::InvalidData("date"))?;

    let next = state.service.next_date(now, date, &p.repeat)?;
    Ok(format_date(next))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignInRequest {
    pub password: String,
}

pub async fn sign_in(
    State(state): State<AppState>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let request = body(payload)?;
    let token = state.auth.sign_in(&request.password)?;
    tracing::info!("sign-in succeeded");
    Ok(Json(json!({ "token": token })))
}

pub async fn add_task(
    State(state): State<AppState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let task = state.service.create(body(payload)?).await?;
    Ok(Json(json!({ "id": task.id })))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListParams {
    pub search: String,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

pub async fn list_tasks(
    State(state): State<AppState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let p = params(query)?;
    let limit = p.limit.unwrap_or(state.list_limit);
    let tasks = state
        .service
        .list(p.offset.unwrap_or(0), limit, &p.search)
        .await?;
    Ok(Json(json!({ "tasks": tasks })))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IdParams {
    pub id: String,
}

pub async fn get_task(
    State(state): State<AppState>,
    query: Result<Query<IdParams>, QueryRejection>,
) -> ApiResult<Json<Task>> {
    let p = params(query)?;
    Ok(Json(state.service.get(&p.id).await?))
}

pub async fn update_task(
    State(state): State<AppState>,
    payload: Result<Json<Task>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    state.service.update(body(payload)?).await?;
    Ok(Json(json!({})))
}

pub async fn delete_task(
    State(state): State<AppState>,
    query: Result<Query<IdParams>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let p = params(query)?;
    state.service.delete(&p.id).await?;
    Ok(Json(json!({})))
}

pub async fn complete_task(
    State(state): State<AppState>,
    query: Result<Query<IdParams>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let p = params(query)?;
    state.service.complete(&p.id).await?;
    Ok(Json(json!({})))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
