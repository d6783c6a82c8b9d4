use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use color_eyre::eyre;
use serde_json::json;
use tracing::{info, warn};

pub enum AuthError {
    MissingToken,
    InvalidToken,
    InvalidCredentials,
    EmailTaken,
    UserNotFound,
    Validation(String),
    PermissionDenied { user_email: String, path: String },
    Internal(eyre::Report),
}

fn log_auth_failure(error: &AuthError) {
    match error {
        AuthError::MissingToken => warn!("Authentication failed: missing Authorization token."),
        AuthError::InvalidToken => warn!("Authentication failed: invalid or expired token."),
        AuthError::InvalidCredentials => {
            info!("Authentication failed: invalid credentials provided.");
        }
        AuthError::EmailTaken => info!("Registration failed: email already registered."),
        AuthError::UserNotFound => warn!("Authentication failed: user from token not found."),
        AuthError::Validation(msg) => info!("Registration rejected: {msg}"),
        AuthError::PermissionDenied { user_email, path } => {
            warn!("Authorization failed: user {user_email} tried to access admin endpoint: {path}");
        }
        AuthError::Internal(e) => {
            tracing::error!("Internal server error during authentication: {e:?}");
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        log_auth_failure(&self);

        let (status, error_message) = match self {
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid email or password".to_string(),
            ),
            AuthError::MissingToken | AuthError::InvalidToken | AuthError::UserNotFound => {
                (StatusCode::UNAUTHORIZED, "authentication failed".to_string())
            }
            AuthError::EmailTaken => (
                StatusCode::CONFLICT,
                "a user with this email already exists".to_string(),
            ),
            AuthError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AuthError::PermissionDenied { .. } => {
                (StatusCode::FORBIDDEN, "admin only".to_string())
            }
            AuthError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "an internal error occurred".to_string(),
            ),
        };

        (status, Json(json!({ "error": error_message }))).into_response()
    }
}

// Lets `?` convert repository and crypto errors into `AuthError::Internal`.
impl<E> From<E> for AuthError
where
    E: Into<eyre::Report>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}
