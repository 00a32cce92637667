use std::convert::Infallible;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{self, Claims};
use crate::error::ApiError;

/// Authenticated user context extracted from JWT
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub username: String,
    pub is_admin: bool,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.username,
            is_admin: claims.is_admin,
        }
    }
}

/// Runs on every request. A valid bearer token attaches an [`AuthUser`] to
/// the request; a missing or invalid token leaves the request anonymous.
/// Route handlers decide what anonymous callers may do.
pub async fn authenticate_jwt(mut request: Request, next: Next) -> Response {
    if let Some(token) = extract_jwt_from_headers(request.headers()) {
        match auth::verify_token(token) {
            Ok(claims) => {
                request.extensions_mut().insert(AuthUser::from(claims));
            }
            Err(e) => tracing::debug!("Ignoring bearer token: {}", e),
        }
    }

    next.run(request).await
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Option<&str> {
    let auth_str = headers.get("authorization")?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

/// The caller's identity, if the request carried a valid token.
#[derive(Clone, Debug, Default)]
pub struct CurrentUser(pub Option<AuthUser>);

impl CurrentUser {
    pub fn ensure_logged_in(&self) -> Result<&AuthUser, ApiError> {
        self.0.as_ref().ok_or_else(ApiError::unauthorized)
    }

    pub fn ensure_admin(&self) -> Result<&AuthUser, ApiError> {
        self.ensure_logged_in()
            .and_then(|user| if user.is_admin { Ok(user) } else { Err(ApiError::unauthorized()) })
    }

    /// Admins, or the user named in the route.
    pub fn ensure_correct_user_or_admin(&self, username: &str) -> Result<&AuthUser, ApiError> {
        self.ensure_logged_in().and_then(|user| {
            if user.is_admin || user.username == username {
                Ok(user)
            } else {
                Err(ApiError::unauthorized())
            }
        })
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(parts.extensions.get::<AuthUser>().cloned()))
    }
}
