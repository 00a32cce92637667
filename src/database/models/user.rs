use serde::Serialize;
use serde_json::Value;
use sqlx::{FromRow, PgPool};

use crate::auth;
use crate::database::bind_params_as;
use crate::error::ApiError;
use crate::sql::{ColumnMap, FieldMap, PartialUpdate};
use crate::validation::users::NewUser;

/// API field -> column for `PATCH /users/:username`.
pub const USER_COLUMNS: ColumnMap = ColumnMap::new(&[
    ("firstName", "first_name"),
    ("lastName", "last_name"),
    ("isAdmin", "is_admin"),
]);

const USER_FIELDS: &str = "username, first_name, last_name, email, is_admin";

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    /// Ids of the jobs this user applied to.
    pub applications: Vec<i32>,
}

#[derive(FromRow)]
struct UserWithPassword {
    #[sqlx(flatten)]
    user: User,
    password: String,
}

impl User {
    /// Checks a username/password pair. Unknown users and wrong passwords
    /// get the same 401.
    pub async fn authenticate(pool: &PgPool, username: &str, password: &str) -> Result<User, ApiError> {
        let sql = format!("SELECT {}, password FROM users WHERE username = $1", USER_FIELDS);
        let found = sqlx::query_as::<_, UserWithPassword>(&sql)
            .bind(username)
            .fetch_optional(pool)
            .await?;

        if let Some(found) = found {
            if auth::verify_password(password, &found.password)? {
                return Ok(found.user);
            }
        }

        Err(ApiError::Unauthorized("Invalid username/password".to_string()))
    }

    /// Fails with 400 if the username is taken.
    pub async fn register(pool: &PgPool, data: NewUser) -> Result<User, ApiError> {
        let duplicate = sqlx::query_scalar::<_, String>("SELECT username FROM users WHERE username = $1")
            .bind(&data.username)
            .fetch_optional(pool)
            .await?;
        if duplicate.is_some() {
            return Err(ApiError::bad_request(format!("Duplicate username: {}", data.username)));
        }

        let hashed = auth::hash_password(&data.password)?;
        let sql = format!(
            "INSERT INTO users (username, password, first_name, last_name, email, is_admin)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            USER_FIELDS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(data.username)
            .bind(hashed)
            .bind(data.first_name)
            .bind(data.last_name)
            .bind(data.email)
            .bind(data.is_admin)
            .fetch_one(pool)
            .await?;

        tracing::info!(username = %user.username, is_admin = user.is_admin, "registered user");
        Ok(user)
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<User>, ApiError> {
        let sql = format!("SELECT {} FROM users ORDER BY username", USER_FIELDS);
        Ok(sqlx::query_as::<_, User>(&sql).fetch_all(pool).await?)
    }

    pub async fn get(pool: &PgPool, username: &str) -> Result<UserDetail, ApiError> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_FIELDS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("No user: {}", username)))?;

        let applications = sqlx::query_scalar::<_, i32>(
            "SELECT job_id FROM applications WHERE username = $1 ORDER BY job_id",
        )
        .bind(username)
        .fetch_all(pool)
        .await?;

        Ok(UserDetail { user, applications })
    }

    /// Partial update. A new password is hashed before it is stored.
    pub async fn update(pool: &PgPool, username: &str, data: FieldMap) -> Result<User, ApiError> {
        let mut data = data;
        if let Some(Value::String(password)) = data.get_mut("password") {
            *password = auth::hash_password(password)?;
        }

        let mut set = PartialUpdate::build(&data, &USER_COLUMNS)?;
        let username_idx = set.push_param(username);

        let sql = format!(
            "UPDATE users SET {} WHERE username = {} RETURNING {}",
            set.clause, username_idx, USER_FIELDS
        );
        bind_params_as(sqlx::query_as::<_, User>(&sql), &set.params)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("No user: {}", username)))
    }

    pub async fn remove(pool: &PgPool, username: &str) -> Result<(), ApiError> {
        sqlx::query_scalar::<_, String>("DELETE FROM users WHERE username = $1 RETURNING username")
            .bind(username)
            .fetch_optional(pool)
            .await?
            .map(|_| ())
            .ok_or_else(|| ApiError::not_found(format!("No user: {}", username)))
    }

    /// Records an application. Applying twice is a no-op.
    pub async fn apply_for_job(pool: &PgPool, username: &str, job_id: i64) -> Result<i64, ApiError> {
        sqlx::query_scalar::<_, i32>("SELECT id FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("No job: {}", job_id)))?;

        sqlx::query_scalar::<_, String>("SELECT username FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("No user: {}", username)))?;

        sqlx::query(
            "INSERT INTO applications (username, job_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(username)
        .bind(job_id)
        .execute(pool)
        .await?;

        Ok(job_id)
    }
}
