use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use serde_json::{json, Value};

use super::json_body;
use crate::app::AppState;
use crate::auth::create_token;
use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::validation::jobs::job_id;
use crate::validation::users::{user_update, NewUser};

/// POST /users (admin) - may create another admin
pub async fn create(
    State(state): State<AppState>,
    caller: CurrentUser,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    caller.ensure_admin()?;
    let data = NewUser::from_body(&json_body(body)?)?;
    let user = User::register(&state.pool, data).await?;
    let token = create_token(&user.username, user.is_admin)?;
    Ok(ApiResponse::created(json!({ "user": user, "token": token })))
}

/// GET /users (admin)
pub async fn list(State(state): State<AppState>, caller: CurrentUser) -> ApiResult<Value> {
    caller.ensure_admin()?;
    let users = User::find_all(&state.pool).await?;
    Ok(ApiResponse::success(json!({ "users": users })))
}

/// GET /users/:username (admin or same user)
pub async fn show(State(state): State<AppState>, caller: CurrentUser, Path(username): Path<String>) -> ApiResult<Value> {
    caller.ensure_correct_user_or_admin(&username)?;
    let user = User::get(&state.pool, &username).await?;
    Ok(ApiResponse::success(json!({ "user": user })))
}

/// PATCH /users/:username (admin or same user)
pub async fn update(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(username): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    caller.ensure_correct_user_or_admin(&username)?;
    let data = user_update(&json_body(body)?)?;
    let user = User::update(&state.pool, &username, data).await?;
    Ok(ApiResponse::success(json!({ "user": user })))
}

/// DELETE /users/:username (admin or same user)
pub async fn remove(State(state): State<AppState>, caller: CurrentUser, Path(username): Path<String>) -> ApiResult<Value> {
    caller.ensure_correct_user_or_admin(&username)?;
    User::remove(&state.pool, &username).await?;
    Ok(ApiResponse::success(json!({ "deleted": username })))
}

/// POST /users/:username/jobs/:id (admin or same user)
pub async fn apply(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path((username, id)): Path<(String, String)>,
) -> ApiResult<Value> {
    caller.ensure_correct_user_or_admin(&username)?;
    let applied = User::apply_for_job(&state.pool, &username, job_id(&id)?).await?;
    Ok(ApiResponse::created(json!({ "applied": applied })))
}
