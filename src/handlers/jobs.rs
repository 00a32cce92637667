use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Json, Path, Query, State};
use serde_json::{json, Value};

use super::{json_body, query_pairs, QueryPairs};
use crate::app::AppState;
use crate::database::models::Job;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::validation::jobs::{job_filters, job_id, job_update, NewJob};

/// POST /jobs (admin)
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    user.ensure_admin()?;
    let data = NewJob::from_body(&json_body(body)?)?;
    let job = Job::create(&state.pool, data).await?;
    Ok(ApiResponse::created(json!({ "job": job })))
}

/// GET /jobs?title=&minSalary=&hasEquity=
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> ApiResult<Value> {
    let filters = job_filters(&query_pairs(query)?)?;
    let jobs = Job::find_by_filters(&state.pool, filters).await?;
    Ok(ApiResponse::success(json!({ "jobs": jobs })))
}

/// GET /jobs/:id - includes the owning company
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    let job = Job::get(&state.pool, job_id(&id)?).await?;
    Ok(ApiResponse::success(json!({ "job": job })))
}

/// PATCH /jobs/:id (admin)
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    user.ensure_admin()?;
    let id = job_id(&id)?;
    let data = job_update(&json_body(body)?)?;
    let job = Job::update(&state.pool, id, &data).await?;
    Ok(ApiResponse::success(json!({ "job": job })))
}

/// DELETE /jobs/:id (admin)
pub async fn remove(State(state): State<AppState>, user: CurrentUser, Path(id): Path<String>) -> ApiResult<Value> {
    user.ensure_admin()?;
    let id = job_id(&id)?;
    Job::remove(&state.pool, id).await?;
    Ok(ApiResponse::success(json!({ "deleted": id })))
}
