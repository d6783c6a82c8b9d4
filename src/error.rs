use crate::repo::RepoError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use color_eyre::eyre;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Request-level failures outside the auth flow. Every variant renders as a
/// JSON `{"error": ...}` body; none of them take the process down.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("internal error")]
    Internal(#[from] eyre::Report),
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => Self::NotFound("resource not found"),
            other => Self::Internal(eyre::Report::new(other)),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Validation(msg) => {
                warn!("Request validation failed: {msg}");
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            Self::Forbidden(msg) => {
                warn!("Authorization denied: {msg}");
                (StatusCode::FORBIDDEN, (*msg).to_string())
            }
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, (*msg).to_string()),
            Self::Internal(report) => {
                error!("Internal server error: {report:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "an internal error occurred".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
