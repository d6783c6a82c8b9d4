mod common;

use axum::http::StatusCode;
use common::{json_body, TestApp};
use serde_json::json;

#[tokio::test]
async fn register_returns_token_and_sanitized_user() {
    let app = TestApp::spawn();
    let response = app
        .post_json(
            "/api/register",
            json!({"email": "ada@example.com", "username": "ada", "password": "hunter22"}),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response).await;
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["user"]["is_admin"], false);
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn register_validates_input() {
    let app = TestApp::spawn();

    let cases = [
        json!({"email": "", "username": "ada", "password": "hunter22"}),
        json!({"email": "not-an-email", "username": "ada", "password": "hunter22"}),
        json!({"email": "a@b.com", "username": "ab", "password": "hunter22"}),
        json!({"email": "a@b.com", "username": "ada", "password": "short"}),
        json!({"username": "ada", "password": "hunter22"}),
    ];
    for case in cases {
        let response = app.post_json("/api/register", case.clone(), None).await;
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "payload should be rejected: {case}"
        );
    }
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let app = TestApp::spawn();
    app.register("ada@example.com", "ada", "hunter22").await;

    let response = app
        .post_json(
            "/api/register",
            json!({"email": "ada@example.com", "username": "other", "password": "hunter22"}),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("already"));
}

#[tokio::test]
async fn login_round_trip_identifies_the_same_user() {
    let app = TestApp::spawn();
    let (_, user_id) = app.register("ada@example.com", "ada", "hunter22").await;

    let response = app
        .post_json(
            "/api/login",
            json!({"email": "ada@example.com", "password": "hunter22"}),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let token = body["token"].as_str().unwrap().to_string();

    let me = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(me.status(), StatusCode::OK);
    let me_body = json_body(me).await;
    assert_eq!(me_body["id"].as_i64().unwrap(), user_id);
    assert_eq!(me_body["username"], "ada");
}

#[tokio::test]
async fn wrong_password_and_unknown_email_both_unauthorized() {
    let app = TestApp::spawn();
    app.register("ada@example.com", "ada", "hunter22").await;

    let wrong_password = app
        .post_json(
            "/api/login",
            json!({"email": "ada@example.com", "password": "wrong-password"}),
            None,
        )
        .await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);

    let unknown_email = app
        .post_json(
            "/api/login",
            json!({"email": "nobody@example.com", "password": "hunter22"}),
            None,
        )
        .await;
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_reject_missing_and_garbage_tokens() {
    let app = TestApp::spawn();

    let missing = app.get("/api/auth/me", None).await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let garbage = app.get("/api/auth/me", Some("not.a.jwt")).await;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
}
