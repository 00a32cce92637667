mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::{admin_token, delete, error_message, get, patch, post, user_token};

fn new_company() -> serde_json::Value {
    json!({
        "handle": "new",
        "name": "New",
        "description": "DescNew",
        "numEmployees": 10,
        "logoUrl": "http://new.img"
    })
}

#[tokio::test]
async fn create_requires_admin() -> Result<()> {
    let app = common::offline_app();

    let (status, body) = post(&app, "/companies", None, new_company()).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": {"message": "Unauthorized", "status": 401}}));

    let (status, _) = post(&app, "/companies", Some(&user_token()), new_company()).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = post(&app, "/companies", Some("not.a.token"), new_company()).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn create_validates_body() -> Result<()> {
    let mut company = new_company();
    company["logoUrl"] = json!("not-a-url");
    let (status, body) = post(&common::offline_app(), "/companies", Some(&admin_token()), company).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "\"logoUrl\" must be a valid uri");
    Ok(())
}

#[tokio::test]
async fn employee_count_must_fit_an_integer_column() -> Result<()> {
    let app = common::offline_app();
    let admin = admin_token();

    let mut company = new_company();
    company["numEmployees"] = json!(3_000_000_000_i64);
    let (status, body) = post(&app, "/companies", Some(&admin), company).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "\"numEmployees\" must be less than or equal to 2147483647");

    let (status, body) = patch(&app, "/companies/c1", Some(&admin), json!({"numEmployees": 3_000_000_000_i64})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "\"numEmployees\" must be less than or equal to 2147483647");
    Ok(())
}

#[tokio::test]
async fn handle_must_be_lowercase() -> Result<()> {
    let mut company = new_company();
    company["handle"] = json!("C9");
    let (status, body) = post(&common::offline_app(), "/companies", Some(&admin_token()), company).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "\"handle\" must only contain lowercase characters");
    Ok(())
}

#[tokio::test]
async fn filter_validation() -> Result<()> {
    let app = common::offline_app();

    let (status, body) = get(&app, "/companies?minEmployees=5&maxEmployees=2", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "minEmployees cannot be greater than maxEmployees");

    let (status, body) = get(&app, "/companies?nope=1", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "\"nope\" is not allowed");

    let (status, body) = get(&app, "/companies?minEmployees=lots", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "\"minEmployees\" must be a number");
    Ok(())
}

#[tokio::test]
async fn empty_update_is_rejected() -> Result<()> {
    let app = common::offline_app();

    let (status, body) = patch(&app, "/companies/c1", Some(&admin_token()), json!({})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": {"message": "No data", "status": 400}}));

    let (status, body) = patch(&app, "/companies/c1", Some(&admin_token()), json!({"handle": "c1-new"})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "\"handle\" is not allowed");
    Ok(())
}

#[tokio::test]
async fn delete_requires_admin() -> Result<()> {
    let (status, _) = delete(&common::offline_app(), "/companies/c1", Some(&user_token())).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn company_lifecycle_against_database() -> Result<()> {
    let Some((app, _pool, _guard)) = common::seeded_db().await? else {
        return Ok(());
    };
    let admin = admin_token();

    let (status, body) = get(&app, "/companies", None).await?;
    assert_eq!(status, StatusCode::OK);
    let handles: Vec<_> = body["companies"].as_array().into_iter().flatten().map(|c| c["handle"].clone()).collect();
    assert_eq!(handles, vec![json!("c1"), json!("c2"), json!("c3")]);

    let (_, body) = get(&app, "/companies?name=2", None).await?;
    assert_eq!(
        body,
        json!({"companies": [{
            "handle": "c2",
            "name": "C2",
            "description": "Desc2",
            "numEmployees": 2,
            "logoUrl": "http://c2.img"
        }]})
    );

    let (_, body) = get(&app, "/companies?minEmployees=2&maxEmployees=3", None).await?;
    assert_eq!(body["companies"].as_array().map(Vec::len), Some(2));

    // Values are bound, never spliced into the SQL
    let (status, body) = get(&app, "/companies?name=%27%3B%20DROP%20TABLE%20companies%3B--", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"companies": []}));

    let (status, body) = get(&app, "/companies/c1", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["company"]["jobs"].as_array().map(Vec::len), Some(3));
    assert_eq!(body["company"]["jobs"][0]["equity"], "0.1");

    let (status, body) = get(&app, "/companies/nope", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_message(&body), "No company: nope");

    let (status, body) = post(&app, "/companies", Some(&admin), new_company()).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["company"], new_company());

    let (status, body) = post(&app, "/companies", Some(&admin), new_company()).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Duplicate company: new");

    let mut same_name = new_company();
    same_name["handle"] = json!("other");
    let (status, body) = post(&app, "/companies", Some(&admin), same_name).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Duplicate company name: New");

    let (status, body) = patch(&app, "/companies/c2", Some(&admin), json!({"name": "C3"})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Duplicate company name: C3");

    let (status, body) = patch(&app, "/companies/c1", Some(&admin), json!({"name": "C1-new", "numEmployees": 10})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["company"]["name"], "C1-new");
    assert_eq!(body["company"]["numEmployees"], 10);
    assert_eq!(body["company"]["description"], "Desc1");

    let (status, _) = patch(&app, "/companies/nope", Some(&admin), json!({"name": "x"})).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = delete(&app, "/companies/c1", Some(&admin)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"deleted": "c1"}));

    let (status, _) = delete(&app, "/companies/c1", Some(&admin)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
