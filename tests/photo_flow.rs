mod common;

use axum::http::StatusCode;
use common::{json_body, TestApp};
use serde_json::json;

const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];

#[tokio::test]
async fn upload_requires_authentication() {
    let app = TestApp::spawn();
    let response = app.upload("not.a.jwt", "cat.jpg", "image/jpeg", JPEG, true).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.upload_dir_entries(), 0);
}

#[tokio::test]
async fn private_upload_is_stored_and_served() {
    let app = TestApp::spawn();
    let (token, user_id) = app.register("ada@example.com", "ada", "hunter22").await;

    let response = app.upload(&token, "cat.jpg", "image/jpeg", JPEG, false).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let photo = json_body(response).await;
    assert_eq!(photo["user_id"].as_i64().unwrap(), user_id);
    assert_eq!(photo["is_public"], false);
    assert_eq!(photo["is_pending"], false);
    assert!(photo["url"].as_str().unwrap().starts_with("/uploads/"));
    assert_eq!(app.upload_dir_entries(), 1);

    // Fetchable by id, listed in the owner's library, absent from the feed.
    let id = photo["id"].as_i64().unwrap();
    let by_id = app.get(&format!("/api/photos/{id}"), None).await;
    assert_eq!(by_id.status(), StatusCode::OK);

    let mine = json_body(app.get("/api/me/photos", Some(&token)).await).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let feed = json_body(app.get("/api/photos", None).await).await;
    assert!(feed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn library_aliases_agree() {
    let app = TestApp::spawn();
    let (token, _) = app.register("ada@example.com", "ada", "hunter22").await;
    app.upload(&token, "cat.jpg", "image/jpeg", JPEG, false).await;

    for path in ["/api/me/photos", "/api/photos/me", "/api/photos/mine"] {
        let response = app.get(path, Some(&token)).await;
        assert_eq!(response.status(), StatusCode::OK, "alias {path}");
        let body = json_body(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1, "alias {path}");
    }
}

#[tokio::test]
async fn oversized_upload_leaves_no_trace() {
    let app = TestApp::spawn();
    let (token, _) = app.register("ada@example.com", "ada", "hunter22").await;

    let oversized = vec![0u8; 10 * 1024 * 1024 + 1];
    let response = app
        .upload(&token, "big.jpg", "image/jpeg", &oversized, true)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.upload_dir_entries(), 0);

    let mine = json_body(app.get("/api/me/photos", Some(&token)).await).await;
    assert!(mine.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unsupported_format_leaves_no_trace() {
    let app = TestApp::spawn();
    let (token, _) = app.register("ada@example.com", "ada", "hunter22").await;

    let response = app
        .upload(&token, "malware.exe", "application/octet-stream", JPEG, true)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.upload_dir_entries(), 0);

    let mine = json_body(app.get("/api/me/photos", Some(&token)).await).await;
    assert!(mine.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn only_the_owner_or_admin_may_edit() {
    let app = TestApp::spawn();
    let (owner, _) = app.register("ada@example.com", "ada", "hunter22").await;
    let (intruder, _) = app.register("eve@example.com", "eve", "hunter22").await;

    let photo = json_body(app.upload(&owner, "cat.jpg", "image/jpeg", JPEG, false).await).await;
    let id = photo["id"].as_i64().unwrap();

    let update = json!({"description": "stolen", "is_public": true});
    let denied = app
        .put_json(&format!("/api/photos/{id}"), update.clone(), Some(&intruder))
        .await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let denied_delete = app
        .delete(&format!("/api/photos/{id}"), Some(&intruder))
        .await;
    assert_eq!(denied_delete.status(), StatusCode::FORBIDDEN);

    let allowed = app
        .put_json(&format!("/api/photos/{id}"), update, Some(&owner))
        .await;
    assert_eq!(allowed.status(), StatusCode::OK);
    let updated = json_body(allowed).await;
    assert_eq!(updated["description"], "stolen");
    assert_eq!(updated["is_public"], true);
}

#[tokio::test]
async fn delete_removes_row_and_file() {
    let app = TestApp::spawn();
    let (token, _) = app.register("ada@example.com", "ada", "hunter22").await;

    let photo = json_body(app.upload(&token, "cat.jpg", "image/jpeg", JPEG, false).await).await;
    let id = photo["id"].as_i64().unwrap();
    assert_eq!(app.upload_dir_entries(), 1);

    let response = app.delete(&format!("/api/photos/{id}"), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.upload_dir_entries(), 0);

    let gone = app.get(&format!("/api/photos/{id}"), None).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn photo_likes_are_idempotent_and_recounted() {
    let app = TestApp::spawn();
    let (token, _) = app.register("ada@example.com", "ada", "hunter22").await;

    let photo = json_body(app.upload(&token, "cat.jpg", "image/jpeg", JPEG, false).await).await;
    let id = photo["id"].as_i64().unwrap();
    assert_eq!(photo["likes_count"], 0);

    let first = json_body(
        app.post_json(&format!("/api/photos/{id}/like"), json!({}), Some(&token))
            .await,
    )
    .await;
    assert_eq!(first["likes_count"], 1);

    // A second like from the same user does not double count.
    let second = json_body(
        app.post_json(&format!("/api/photos/{id}/like"), json!({}), Some(&token))
            .await,
    )
    .await;
    assert_eq!(second["likes_count"], 1);

    let status = json_body(app.get(&format!("/api/photos/{id}/like"), Some(&token)).await).await;
    assert_eq!(status["liked"], true);

    let unliked = json_body(
        app.delete(&format!("/api/photos/{id}/like"), Some(&token))
            .await,
    )
    .await;
    assert_eq!(unliked["likes_count"], 0);

    let status = json_body(app.get(&format!("/api/photos/{id}/like"), Some(&token)).await).await;
    assert_eq!(status["liked"], false);
}

#[tokio::test]
async fn missing_photo_returns_not_found() {
    let app = TestApp::spawn();
    let (token, _) = app.register("ada@example.com", "ada", "hunter22").await;

    let get = app.get("/api/photos/9999", None).await;
    assert_eq!(get.status(), StatusCode::NOT_FOUND);

    let like = app
        .post_json("/api/photos/9999/like", json!({}), Some(&token))
        .await;
    assert_eq!(like.status(), StatusCode::NOT_FOUND);
}
