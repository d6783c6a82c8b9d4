use crate::error::ApiError;
use crate::models::{CommentReport, Photo};
use crate::routes::admin::interfaces::{RejectPhotoRequest, ReportListQuery, ResolveReportRequest};
use crate::routes::comments::interfaces::MessageResponse;
use crate::routes::photos::interfaces::{Pagination, DEFAULT_OWN_LIMIT};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use tracing::info;

/// Public photos still waiting for review, oldest first so the queue is
/// worked in submission order.
#[utoipa::path(
    get,
    path = "/api/admin/photos/pending",
    tag = "admin",
    params(Pagination),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Pending photos", body = Vec<Photo>),
        (status = 403, description = "Not an admin"),
    )
)]
pub async fn pending_photos(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<Photo>>, ApiError> {
    let (limit, offset) = pagination.clamp(DEFAULT_OWN_LIMIT);
    let photos = state.photos.list_pending(limit, offset).await?;
    Ok(Json(photos))
}

#[utoipa::path(
    post,
    path = "/api/admin/photos/{id}/approve",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Photo approved", body = MessageResponse),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "No pending review for this photo"),
    )
)]
pub async fn approve_photo(
    State(state): State<AppState>,
    Path(photo_id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.photos.approve(photo_id).await?;
    info!("Photo {photo_id} approved");
    Ok(Json(MessageResponse::new("photo approved")))
}

#[utoipa::path(
    post,
    path = "/api/admin/photos/{id}/reject",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = RejectPhotoRequest,
    responses(
        (status = 200, description = "Photo rejected", body = MessageResponse),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "No pending review for this photo"),
    )
)]
pub async fn reject_photo(
    State(state): State<AppState>,
    Path(photo_id): Path<i64>,
    Json(payload): Json<RejectPhotoRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.photos.reject(photo_id, &payload.reason).await?;
    info!("Photo {photo_id} rejected: {}", payload.reason);
    Ok(Json(MessageResponse::new("photo rejected")))
}

#[utoipa::path(
    get,
    path = "/api/admin/comment-reports",
    tag = "admin",
    params(ReportListQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Comment reports with the comment embedded", body = Vec<CommentReport>),
        (status = 400, description = "Unknown status filter"),
        (status = 403, description = "Not an admin"),
    )
)]
pub async fn list_reports(
    State(state): State<AppState>,
    Query(query): Query<ReportListQuery>,
) -> Result<Json<Vec<CommentReport>>, ApiError> {
    let status = query.parse()?;
    let reports = state.comments.list_reports(status).await?;
    Ok(Json(reports))
}

/// Close a report: `delete` removes the comment as well, `dismiss` keeps it.
/// Either way the report stays on record with the admin's note.
#[utoipa::path(
    post,
    path = "/api/admin/comment-reports/{id}/resolve",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = ResolveReportRequest,
    responses(
        (status = 200, description = "Report resolved", body = MessageResponse),
        (status = 400, description = "Unknown action"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Report not found"),
    )
)]
pub async fn resolve_report(
    State(state): State<AppState>,
    Path(report_id): Path<i64>,
    Json(payload): Json<ResolveReportRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let action = payload.parse_action()?;
    state
        .comments
        .resolve_report(report_id, action, &payload.admin_note)
        .await?;
    info!("Report {report_id} resolved with {:?}", action);
    Ok(Json(MessageResponse::new("report resolved")))
}
