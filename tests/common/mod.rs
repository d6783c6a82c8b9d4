#![allow(dead_code)] // each test binary uses a different subset of helpers

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use photohub::config::AppConfig;
use photohub::repo::memory::MemoryStore;
use photohub::routes::create_router;
use photohub::state::AppState;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// A fully wired application on the in-memory backend, with uploads going
/// to a throwaway directory.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    upload_dir: TempDir,
}

impl TestApp {
    pub fn spawn() -> Self {
        let upload_dir = TempDir::new().expect("temp upload dir");
        let mut config = AppConfig::load().expect("default config");
        config.upload_dir = upload_dir.path().to_string_lossy().into_owned();
        config.jwt_secret = "integration-test-secret".into();

        let (state, store) = AppState::in_memory(config);
        let router = create_router(state);
        Self {
            router,
            store,
            upload_dir,
        }
    }

    pub fn upload_dir_entries(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path())
            .expect("upload dir readable")
            .count()
    }

    pub async fn request(&self, req: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(req).await.expect("infallible")
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Response<Body> {
        self.request(build(Request::get(path), Body::empty(), None, token))
            .await
    }

    pub async fn post_json(
        &self,
        path: &str,
        body: Value,
        token: Option<&str>,
    ) -> Response<Body> {
        self.request(build(
            Request::post(path),
            Body::from(body.to_string()),
            Some("application/json"),
            token,
        ))
        .await
    }

    pub async fn put_json(&self, path: &str, body: Value, token: Option<&str>) -> Response<Body> {
        self.request(build(
            Request::put(path),
            Body::from(body.to_string()),
            Some("application/json"),
            token,
        ))
        .await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> Response<Body> {
        self.request(build(Request::delete(path), Body::empty(), None, token))
            .await
    }

    /// Register a user and hand back `(token, user_id)`.
    pub async fn register(&self, email: &str, username: &str, password: &str) -> (String, i64) {
        let response = self
            .post_json(
                "/api/register",
                serde_json::json!({
                    "email": email,
                    "username": username,
                    "password": password,
                }),
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        let token = body["token"].as_str().expect("token").to_string();
        let user_id = body["user"]["id"].as_i64().expect("user id");
        (token, user_id)
    }

    /// Register a user and flip the admin flag directly in the store.
    pub async fn register_admin(&self, email: &str, username: &str) -> String {
        let (token, user_id) = self.register(email, username, "sup3rsecret").await;
        self.store.promote_to_admin(user_id).expect("user exists");
        token
    }

    /// Multipart upload of `data` as the `photo` field.
    pub async fn upload(
        &self,
        token: &str,
        file_name: &str,
        mime: &str,
        data: &[u8],
        is_public: bool,
    ) -> Response<Body> {
        let boundary = "----photohub-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"photo\"; \
                 filename=\"{file_name}\"\r\nContent-Type: {mime}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(
            format!(
                "\r\n--{boundary}\r\nContent-Disposition: form-data; \
                 name=\"description\"\r\n\r\na test photo\r\n--{boundary}\r\n\
                 Content-Disposition: form-data; name=\"is_public\"\r\n\r\n{is_public}\r\n\
                 --{boundary}--\r\n"
            )
            .as_bytes(),
        );

        self.request(build(
            Request::post("/api/photos/upload"),
            Body::from(body),
            Some(&format!("multipart/form-data; boundary={boundary}")),
            Some(token),
        ))
        .await
    }
}

fn build(
    builder: axum::http::request::Builder,
    body: Body,
    content_type: Option<&str>,
    token: Option<&str>,
) -> Request<Body> {
    let mut builder = builder;
    if let Some(ct) = content_type {
        builder = builder.header(header::CONTENT_TYPE, ct);
    }
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(body).expect("request")
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("valid json body")
}
