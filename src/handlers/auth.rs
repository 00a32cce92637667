use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use serde_json::{json, Value};

use super::json_body;
use crate::app::AppState;
use crate::auth::create_token;
use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult};
use crate::validation::users::{NewUser, UserAuth};

/// POST /auth/token - exchange credentials for a JWT
pub async fn token(State(state): State<AppState>, body: Result<Json<Value>, JsonRejection>) -> ApiResult<Value> {
    let credentials = UserAuth::from_body(&json_body(body)?)?;
    let user = User::authenticate(&state.pool, &credentials.username, &credentials.password).await?;
    let token = create_token(&user.username, user.is_admin)?;
    Ok(ApiResponse::success(json!({ "token": token })))
}

/// POST /auth/register - self-registration; never grants admin
pub async fn register(State(state): State<AppState>, body: Result<Json<Value>, JsonRejection>) -> ApiResult<Value> {
    let new_user = NewUser::from_registration(&json_body(body)?)?;
    let user = User::register(&state.pool, new_user).await?;
    let token = create_token(&user.username, user.is_admin)?;
    Ok(ApiResponse::created(json!({ "token": token })))
}
