mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{admin_token, delete, error_message, get, patch, post, user_token};

fn titles(body: &Value) -> Vec<String> {
    body["jobs"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|job| job["title"].as_str().map(str::to_string))
        .collect()
}

#[tokio::test]
async fn job_id_must_be_numeric() -> Result<()> {
    let (status, body) = get(&common::offline_app(), "/jobs/abc", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "\"id\" must be a number");

    let (status, body) = get(&common::offline_app(), "/jobs/-1", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "\"id\" must be greater than or equal to 0");
    Ok(())
}

#[tokio::test]
async fn filters_are_validated() -> Result<()> {
    let app = common::offline_app();

    let (status, body) = get(&app, "/jobs?minSalary=-1", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "\"minSalary\" must be greater than or equal to 0");

    let (status, body) = get(&app, "/jobs?companyHandle=c1", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "\"companyHandle\" is not allowed");
    Ok(())
}

#[tokio::test]
async fn writes_require_admin() -> Result<()> {
    let app = common::offline_app();
    let job = json!({"title": "new", "salary": 10, "equity": 0.2, "companyHandle": "c1"});

    let (status, _) = post(&app, "/jobs", Some(&user_token()), job).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = patch(&app, "/jobs/1", None, json!({"title": "x"})).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = delete(&app, "/jobs/1", Some(&user_token())).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn update_rejects_key_fields() -> Result<()> {
    let app = common::offline_app();

    let (status, body) = patch(&app, "/jobs/1", Some(&admin_token()), json!({"companyHandle": "c2"})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "\"companyHandle\" is not allowed");

    let (status, body) = patch(&app, "/jobs/1", Some(&admin_token()), json!({"equity": 1.5})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "\"equity\" must be less than or equal to 1");
    Ok(())
}

#[tokio::test]
async fn salary_must_fit_an_integer_column() -> Result<()> {
    let app = common::offline_app();
    let admin = admin_token();

    let (status, body) = patch(&app, "/jobs/1", Some(&admin), json!({"salary": 3_000_000_000_i64})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "\"salary\" must be less than or equal to 2147483647");

    let (status, body) = post(
        &app,
        "/jobs",
        Some(&admin),
        json!({"title": "new", "salary": 3_000_000_000_i64, "companyHandle": "c1"}),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "\"salary\" must be less than or equal to 2147483647");
    Ok(())
}

#[tokio::test]
async fn job_lifecycle_against_database() -> Result<()> {
    let Some((app, _pool, _guard)) = common::seeded_db().await? else {
        return Ok(());
    };
    let admin = admin_token();

    let (status, body) = get(&app, "/jobs", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["J1", "J2", "J3", "J4"]);

    let (_, body) = get(&app, "/jobs?hasEquity=true", None).await?;
    assert_eq!(titles(&body), vec!["J1", "J2"]);

    // Anything but "true" means "don't filter on equity"
    let (_, body) = get(&app, "/jobs?hasEquity=false", None).await?;
    assert_eq!(titles(&body), vec!["J1", "J2", "J3", "J4"]);

    let (_, body) = get(&app, "/jobs?title=j&minSalary=2", None).await?;
    assert_eq!(titles(&body), vec!["J2", "J3"]);

    let (_, body) = get(&app, "/jobs?hasEquity=true&minSalary=2", None).await?;
    assert_eq!(titles(&body), vec!["J2"]);

    let (status, body) = get(&app, "/jobs/1", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["job"]["title"], "J1");
    assert_eq!(body["job"]["equity"], "0.1");
    assert_eq!(body["job"]["company"]["handle"], "c1");

    let (status, body) = get(&app, "/jobs/999", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_message(&body), "No job: 999");

    let (status, body) = post(
        &app,
        "/jobs",
        Some(&admin),
        json!({"title": "J-new", "salary": 500, "equity": 0.5, "companyHandle": "c2"}),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["job"]["companyHandle"], "c2");
    assert_eq!(body["job"]["equity"], "0.5");

    let (status, body) = post(&app, "/jobs", Some(&admin), json!({"title": "J", "companyHandle": "nope"})).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_message(&body), "No company: nope");

    let (status, body) = patch(&app, "/jobs/1", Some(&admin), json!({"salary": 100, "equity": 0.25})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["job"]["salary"], 100);
    assert_eq!(body["job"]["equity"], "0.25");
    assert_eq!(body["job"]["title"], "J1");

    let (status, body) = delete(&app, "/jobs/1", Some(&admin)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"deleted": 1}));

    let (status, _) = delete(&app, "/jobs/1", Some(&admin)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
