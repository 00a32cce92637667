use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Json, Path, Query, State};
use serde_json::{json, Value};

use super::{json_body, query_pairs, QueryPairs};
use crate::app::AppState;
use crate::database::models::Company;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::validation::companies::{company_filters, company_update, NewCompany};

/// POST /companies (admin)
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    user.ensure_admin()?;
    let data = NewCompany::from_body(&json_body(body)?)?;
    let company = Company::create(&state.pool, data).await?;
    Ok(ApiResponse::created(json!({ "company": company })))
}

/// GET /companies?name=&minEmployees=&maxEmployees=
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> ApiResult<Value> {
    let filters = company_filters(&query_pairs(query)?)?;
    let companies = Company::find_by_filters(&state.pool, &filters).await?;
    Ok(ApiResponse::success(json!({ "companies": companies })))
}

/// GET /companies/:handle - includes the company's jobs
pub async fn show(State(state): State<AppState>, Path(handle): Path<String>) -> ApiResult<Value> {
    let company = Company::get(&state.pool, &handle).await?;
    Ok(ApiResponse::success(json!({ "company": company })))
}

/// PATCH /companies/:handle (admin)
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(handle): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    user.ensure_admin()?;
    let data = company_update(&json_body(body)?)?;
    let company = Company::update(&state.pool, &handle, &data).await?;
    Ok(ApiResponse::success(json!({ "company": company })))
}

/// DELETE /companies/:handle (admin)
pub async fn remove(State(state): State<AppState>, user: CurrentUser, Path(handle): Path<String>) -> ApiResult<Value> {
    user.ensure_admin()?;
    Company::remove(&state.pool, &handle).await?;
    Ok(ApiResponse::success(json!({ "deleted": handle })))
}
