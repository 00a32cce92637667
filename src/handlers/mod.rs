//! Route handlers, one module per resource.
//!
//! Handlers take raw extractor results so that malformed bodies and query
//! strings surface as `400` in the shared error format instead of axum's
//! plain-text rejections.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Json, Query};
use serde_json::Value;

use crate::error::ApiError;

pub mod auth;
pub mod companies;
pub mod health;
pub mod jobs;
pub mod users;

/// Query string as ordered `(key, value)` pairs.
pub type QueryPairs = Vec<(String, String)>;

pub(crate) fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

pub(crate) fn query_pairs(query: Result<Query<QueryPairs>, QueryRejection>) -> Result<QueryPairs, ApiError> {
    query
        .map(|Query(pairs)| pairs)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}
