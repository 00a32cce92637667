#![allow(dead_code)]

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use jobly_api::auth::create_token;
use jobly_api::config::DatabaseConfig;
use jobly_api::database::DatabaseManager;
use jobly_api::{app, AppState};

/// Database-backed suites share one schema; run them one at a time.
static DB_LOCK: Mutex<()> = Mutex::new(());

/// An app whose pool points at nothing. Requests that are rejected before
/// touching the database (auth, validation, routing) behave normally.
pub fn offline_app() -> Router {
    let config = DatabaseConfig {
        url: "postgresql://127.0.0.1:1/jobly_offline".to_string(),
        max_connections: 1,
        connection_timeout: 1,
        run_migrations: false,
    };
    let pool = DatabaseManager::connect_lazy(&config).expect("valid offline database url");
    app(AppState::new(pool))
}

/// A migrated, freshly seeded database, or `None` when
/// `JOBLY_TEST_DATABASE_URL` is not set.
pub async fn seeded_db() -> Result<Option<(Router, PgPool, MutexGuard<'static, ()>)>> {
    let Ok(url) = std::env::var("JOBLY_TEST_DATABASE_URL") else {
        eprintln!("JOBLY_TEST_DATABASE_URL not set; skipping database test");
        return Ok(None);
    };
    let guard = DB_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    let config = DatabaseConfig {
        url,
        max_connections: 5,
        connection_timeout: 5,
        run_migrations: true,
    };
    let pool = DatabaseManager::connect(&config).await.context("connect test database")?;
    DatabaseManager::migrate(&pool).await.context("migrate test database")?;
    seed(&pool).await?;

    Ok(Some((app(AppState::new(pool.clone())), pool, guard)))
}

async fn seed(pool: &PgPool) -> Result<()> {
    sqlx::query("TRUNCATE applications, jobs, users, companies RESTART IDENTITY CASCADE")
        .execute(pool)
        .await?;

    sqlx::query(
        "INSERT INTO companies (handle, name, num_employees, description, logo_url)
         VALUES ('c1', 'C1', 1, 'Desc1', 'http://c1.img'),
                ('c2', 'C2', 2, 'Desc2', 'http://c2.img'),
                ('c3', 'C3', 3, 'Desc3', 'http://c3.img')",
    )
    .execute(pool)
    .await?;

    // ids 1..=4
    sqlx::query(
        "INSERT INTO jobs (title, salary, equity, company_handle)
         VALUES ('J1', 1, 0.1, 'c1'),
                ('J2', 2, 0.2, 'c1'),
                ('J3', 3, NULL, 'c1'),
                ('J4', NULL, 0, 'c2')",
    )
    .execute(pool)
    .await?;

    let password = bcrypt::hash("password1", 4)?;
    for (username, is_admin) in [("u1", false), ("u2", false), ("admin", true)] {
        sqlx::query(
            "INSERT INTO users (username, password, first_name, last_name, email, is_admin)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(username)
        .bind(&password)
        .bind(format!("{}F", username))
        .bind(format!("{}L", username))
        .bind(format!("{}@email.com", username))
        .bind(is_admin)
        .execute(pool)
        .await?;
    }

    sqlx::query("INSERT INTO applications (username, job_id) VALUES ('u1', 1)")
        .execute(pool)
        .await?;

    Ok(())
}

pub fn user_token() -> String {
    create_token("u1", false).expect("sign user token")
}

pub fn admin_token() -> String {
    create_token("admin", true).expect("sign admin token")
}

/// Sends one request through the router and returns status and JSON body.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).context("response body is not JSON")?
    };
    Ok((status, json))
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
    send(app, Method::GET, uri, token, None).await
}

pub async fn post(app: &Router, uri: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
    send(app, Method::POST, uri, token, Some(body)).await
}

pub async fn patch(app: &Router, uri: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
    send(app, Method::PATCH, uri, token, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
    send(app, Method::DELETE, uri, token, None).await
}

pub fn error_message(body: &Value) -> &str {
    body["error"]["message"].as_str().unwrap_or_default()
}
