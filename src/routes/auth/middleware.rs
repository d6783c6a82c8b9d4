use crate::models::User;
use crate::routes::auth::error::AuthError;
use crate::routes::auth::token::{verify_token, Claims};
use crate::state::AppState;
use axum::extract::{FromRequestParts, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use axum::Extension;
use std::convert::Infallible;

/// Authenticated requester, loaded from the bearer token. Doubles as a
/// route-group guard via `from_extractor_with_state`.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;
    header.strip_prefix("Bearer ").ok_or(AuthError::MissingToken)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = verify_token(&state.config.jwt_secret, token)
            .map_err(|_| AuthError::InvalidToken)?;

        let user = state
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        parts.extensions.insert(user.clone());
        Ok(AuthUser(user))
    }
}

/// Claims of the requester when a valid token is present; `None` otherwise.
/// For endpoints that are public but personalize their response.
#[derive(Debug, Clone)]
pub struct OptionalClaims(pub Option<Claims>);

impl FromRequestParts<AppState> for OptionalClaims {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = bearer_token(parts)
            .ok()
            .and_then(|token| verify_token(&state.config.jwt_secret, token).ok());
        Ok(OptionalClaims(claims))
    }
}

/// Router-level guard for the admin group. Relies on [`AuthUser`] having run
/// first and stashed the user record in request extensions.
pub async fn require_admin(
    Extension(user): Extension<User>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    if !user.is_admin {
        return Err(AuthError::PermissionDenied {
            user_email: user.email,
            path: request.uri().path().to_string(),
        });
    }
    Ok(next.run(request).await)
}
