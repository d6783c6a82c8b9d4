use crate::models::User;
use crate::repo::RepoError;
use crate::routes::auth::error::AuthError;
use crate::routes::auth::hashing::{hash_password, verify_password};
use crate::routes::auth::interfaces::{AuthResponse, LoginRequest, RegisterRequest};
use crate::routes::auth::middleware::AuthUser;
use crate::routes::auth::token::issue_token;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

/// Register a new account and log it in.
#[utoipa::path(
    post,
    path = "/api/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 409, description = "Email already registered"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AuthError> {
    if payload.email.is_empty() || payload.password.is_empty() || payload.username.is_empty() {
        return Err(AuthError::Validation(
            "email, password, and username are required".into(),
        ));
    }
    if !payload.email.contains('@') {
        return Err(AuthError::Validation("email must be a valid address".into()));
    }
    if payload.password.len() < 6 {
        return Err(AuthError::Validation(
            "password must be at least 6 characters".into(),
        ));
    }
    if payload.username.len() < 3 {
        return Err(AuthError::Validation(
            "username must be at least 3 characters".into(),
        ));
    }

    let password_hash = hash_password(&payload.password)?;
    let user = match state
        .users
        .create(&payload.email, &payload.username, &password_hash)
        .await
    {
        Ok(user) => user,
        Err(RepoError::Duplicate) => return Err(AuthError::EmailTaken),
        Err(other) => return Err(other.into()),
    };

    info!("Registered user {} ({})", user.id, user.email);
    let token = issue_token(&state.config.jwt_secret, user.id, &user.email)?;
    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid email or password"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    let (user, password_hash) = state
        .users
        .find_by_email(&payload.email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !verify_password(&payload.password, &password_hash)? {
        return Err(AuthError::InvalidCredentials);
    }

    let token = issue_token(&state.config.jwt_secret, user.id, &user.email)?;
    Ok(Json(AuthResponse { token, user }))
}

/// The authenticated user's own record.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Missing or invalid token"),
    )
)]
pub async fn me(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}
