use crate::error::ApiError;
use crate::models::Comment;
use crate::policy::ensure_owner_or_admin;
use crate::routes::auth::middleware::{AuthUser, OptionalClaims};
use crate::routes::comments::interfaces::{
    CreateCommentRequest, MessageResponse, ReportCommentRequest,
};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

/// Comments on a photo. Publicly readable; `user_liked` is personalized
/// when a valid bearer token accompanies the request.
#[utoipa::path(
    get,
    path = "/api/photos/{id}/comments",
    tag = "comments",
    responses((status = 200, description = "Comments, newest first", body = Vec<Comment>))
)]
pub async fn list_comments(
    State(state): State<AppState>,
    OptionalClaims(claims): OptionalClaims,
    Path(photo_id): Path<i64>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let viewer = claims.map(|c| c.sub);
    let comments = state.comments.list_by_photo(photo_id, viewer).await?;
    Ok(Json(comments))
}

#[utoipa::path(
    post,
    path = "/api/photos/{id}/comments",
    tag = "comments",
    security(("bearer_auth" = [])),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = Comment),
        (status = 400, description = "Empty comment text"),
        (status = 404, description = "Photo not found"),
    )
)]
pub async fn create_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(photo_id): Path<i64>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    if payload.text.is_empty() {
        return Err(ApiError::Validation("comment text is required".into()));
    }
    state
        .photos
        .find_by_id(photo_id)
        .await?
        .ok_or(ApiError::NotFound("photo not found"))?;

    let comment = state
        .comments
        .create(photo_id, user.id, &payload.text)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

#[utoipa::path(
    post,
    path = "/api/comments/{id}/like",
    tag = "comments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Comment liked", body = MessageResponse),
        (status = 404, description = "Comment not found"),
    )
)]
pub async fn like_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(comment_id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .comments
        .find_by_id(comment_id)
        .await?
        .ok_or(ApiError::NotFound("comment not found"))?;

    state.comments.like(comment_id, user.id).await?;
    Ok(Json(MessageResponse::new("comment liked")))
}

#[utoipa::path(
    delete,
    path = "/api/comments/{id}/like",
    tag = "comments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Comment unliked", body = MessageResponse),
        (status = 404, description = "Comment not found"),
    )
)]
pub async fn unlike_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(comment_id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .comments
        .find_by_id(comment_id)
        .await?
        .ok_or(ApiError::NotFound("comment not found"))?;

    state.comments.unlike(comment_id, user.id).await?;
    Ok(Json(MessageResponse::new("comment unliked")))
}

#[utoipa::path(
    post,
    path = "/api/comments/{id}/report",
    tag = "comments",
    security(("bearer_auth" = [])),
    request_body = ReportCommentRequest,
    responses(
        (status = 201, description = "Report filed", body = MessageResponse),
        (status = 400, description = "Missing reason"),
        (status = 404, description = "Comment not found"),
    )
)]
pub async fn report_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(comment_id): Path<i64>,
    Json(payload): Json<ReportCommentRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    if payload.reason.is_empty() {
        return Err(ApiError::Validation("reason is required".into()));
    }
    state
        .comments
        .find_by_id(comment_id)
        .await?
        .ok_or(ApiError::NotFound("comment not found"))?;

    state
        .comments
        .report(comment_id, user.id, &payload.reason)
        .await?;
    info!("User {} reported comment {}", user.id, comment_id);
    Ok((StatusCode::CREATED, Json(MessageResponse::new("report sent"))))
}

/// Delete a comment as its author, or as an admin.
#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    tag = "comments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Comment deleted", body = MessageResponse),
        (status = 403, description = "Neither author nor admin"),
        (status = 404, description = "Comment not found"),
    )
)]
pub async fn delete_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(comment_id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let comment = state
        .comments
        .find_by_id(comment_id)
        .await?
        .ok_or(ApiError::NotFound("comment not found"))?;
    ensure_owner_or_admin(&user, comment.user_id, "you can only delete your own comments")?;

    state.comments.delete(comment_id).await?;
    Ok(Json(MessageResponse::new("comment deleted")))
}
