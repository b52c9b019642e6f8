mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn register_rejects_malformed_email() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&json!({ "email": "not-an-email", "name": "Dev", "password": "hunter2hunter2" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "BAD_REQUEST");

    Ok(())
}

#[tokio::test]
async fn register_rejects_short_password() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&json!({ "email": "dev@example.com", "name": "Dev", "password": "short" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn protected_routes_require_a_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    for path in ["/api/auth/whoami", "/api/v1/tasks", "/api/v1/progress", "/api/v1/projects"] {
        let res = client.get(format!("{}{}", server.base_url, path)).send().await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "path: {}", path);

        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["error"], true, "path: {}", path);
        assert_eq!(body["code"], "UNAUTHORIZED", "path: {}", path);
    }

    Ok(())
}

#[tokio::test]
async fn garbage_bearer_token_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/auth/whoami", server.base_url))
        .bearer_auth("not.a.jwt")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn register_login_whoami_round_trip() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_ready(server).await {
        eprintln!("skipping: no database available");
        return Ok(());
    }

    let client = reqwest::Client::new();
    let email = format!("user-{}@example.com", uuid::Uuid::new_v4().simple());

    let res = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&json!({ "email": email, "name": "Round Trip", "password": "hunter2hunter2" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["email"], email.as_str());
    assert!(
        body["data"].get("passwordHash").is_none(),
        "password hash must not be exposed: {}",
        body
    );

    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&json!({ "email": email, "password": "hunter2hunter2" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    let token = body["data"]["token"].as_str().expect("token").to_string();
    assert!(body["data"]["expiresIn"].as_u64().unwrap_or(0) > 0);

    let res = client
        .get(format!("{}/api/auth/whoami", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["email"], email.as_str());

    Ok(())
}

#[tokio::test]
async fn duplicate_registration_conflicts() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_ready(server).await {
        eprintln!("skipping: no database available");
        return Ok(());
    }

    let client = reqwest::Client::new();
    let email = format!("user-{}@example.com", uuid::Uuid::new_v4().simple());
    let payload = json!({ "email": email, "name": "Dup", "password": "hunter2hunter2" });

    let res = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&payload)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&payload)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
async fn wrong_password_is_unauthorized() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_ready(server).await {
        eprintln!("skipping: no database available");
        return Ok(());
    }

    let client = reqwest::Client::new();
    let email = format!("user-{}@example.com", uuid::Uuid::new_v4().simple());

    let res = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&json!({ "email": email, "name": "Dev", "password": "hunter2hunter2" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&json!({ "email": email, "password": "wrong-password" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}
