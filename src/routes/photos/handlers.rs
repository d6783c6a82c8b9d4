use crate::error::ApiError;
use crate::models::Photo;
use crate::policy::ensure_owner_or_admin;
use crate::repo::NewPhoto;
use crate::routes::auth::middleware::AuthUser;
use crate::routes::photos::interfaces::{
    LikeStatus, Pagination, UpdatePhotoRequest, DEFAULT_OWN_LIMIT, DEFAULT_PUBLIC_LIMIT,
};
use crate::routes::photos::storage::{remove_stored_file, store_upload, validate_upload};
use crate::state::AppState;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

/// Public feed: approved (or never-reviewed) public photos, newest first.
#[utoipa::path(
    get,
    path = "/api/photos",
    tag = "photos",
    params(Pagination),
    responses((status = 200, description = "Public photos", body = Vec<Photo>))
)]
pub async fn list_photos(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<Photo>>, ApiError> {
    let (limit, offset) = pagination.clamp(DEFAULT_PUBLIC_LIMIT);
    let photos = state.photos.list_public(limit, offset).await?;
    Ok(Json(photos))
}

/// The authenticated user's library, private photos included.
#[utoipa::path(
    get,
    path = "/api/me/photos",
    tag = "photos",
    security(("bearer_auth" = [])),
    params(Pagination),
    responses((status = 200, description = "Own photos", body = Vec<Photo>))
)]
pub async fn my_photos(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<Photo>>, ApiError> {
    let (limit, offset) = pagination.clamp(DEFAULT_OWN_LIMIT);
    let photos = state.photos.list_by_user(user.id, limit, offset).await?;
    Ok(Json(photos))
}

#[utoipa::path(
    get,
    path = "/api/photos/{id}",
    tag = "photos",
    responses(
        (status = 200, description = "Photo", body = Photo),
        (status = 404, description = "Photo not found"),
    )
)]
pub async fn get_photo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Photo>, ApiError> {
    let photo = state
        .photos
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("photo not found"))?;
    Ok(Json(photo))
}

/// Multipart upload: file field `photo` plus optional `description` and
/// `is_public` text fields.
#[utoipa::path(
    post,
    path = "/api/photos/upload",
    tag = "photos",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Photo stored", body = Photo),
        (status = 400, description = "Missing file, oversized, or unsupported format"),
    )
)]
pub async fn upload_photo(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Photo>), ApiError> {
    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut description = String::new();
    let mut is_public = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::Validation("invalid multipart payload".into()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "photo" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let mime_type = field.content_type().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::Validation("photo file is unreadable".into()))?;
                file = Some((file_name, mime_type, data.to_vec()));
            }
            "description" => {
                description = field
                    .text()
                    .await
                    .map_err(|_| ApiError::Validation("invalid description field".into()))?;
            }
            // Both spellings are accepted for compatibility with existing clients.
            "is_public" | "ispublic" => {
                let value = field
                    .text()
                    .await
                    .map_err(|_| ApiError::Validation("invalid is_public field".into()))?;
                is_public = is_public || value == "true";
            }
            _ => {}
        }
    }

    let (file_name, mime_type, data) =
        file.ok_or_else(|| ApiError::Validation("photo file is required".into()))?;

    // Validation happens before the file is written, so a rejected upload
    // leaves neither a row nor an orphaned file.
    validate_upload(&mime_type, data.len())?;

    let (stored_name, stored_path) =
        store_upload(&state.config.upload_dir, &file_name, &data).await?;
    let file_path = stored_path.to_string_lossy().into_owned();

    let created = state
        .photos
        .create(NewPhoto {
            user_id: user.id,
            url: format!("/uploads/{stored_name}"),
            file_path: file_path.clone(),
            file_size: data.len() as i64,
            mime_type,
            description,
            is_public,
        })
        .await;

    match created {
        Ok(photo) => {
            info!("User {} uploaded photo {}", user.id, photo.id);
            Ok((StatusCode::CREATED, Json(photo)))
        }
        Err(err) => {
            remove_stored_file(&file_path).await;
            Err(err.into())
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/photos/{id}",
    tag = "photos",
    security(("bearer_auth" = [])),
    request_body = UpdatePhotoRequest,
    responses(
        (status = 200, description = "Updated photo", body = Photo),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Photo not found"),
    )
)]
pub async fn update_photo(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePhotoRequest>,
) -> Result<Json<Photo>, ApiError> {
    let photo = state
        .photos
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("photo not found"))?;
    ensure_owner_or_admin(&user, photo.user_id, "you can only update your own photos")?;

    let updated = state
        .photos
        .update(id, &payload.description, payload.is_public)
        .await?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/photos/{id}",
    tag = "photos",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Photo deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Photo not found"),
    )
)]
pub async fn delete_photo(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let photo = state
        .photos
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("photo not found"))?;
    ensure_owner_or_admin(&user, photo.user_id, "you can only delete your own photos")?;

    // File first, best-effort; the row is the source of truth.
    remove_stored_file(&photo.file_path).await;
    state.photos.delete(id).await?;
    info!("User {} deleted photo {}", user.id, id);
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/photos/{id}/like",
    tag = "photos",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Photo with refreshed like count", body = Photo),
        (status = 404, description = "Photo not found"),
    )
)]
pub async fn like_photo(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Photo>, ApiError> {
    state
        .photos
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("photo not found"))?;

    state.photos.like(id, user.id).await?;
    let photo = state
        .photos
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("photo not found"))?;
    Ok(Json(photo))
}

#[utoipa::path(
    delete,
    path = "/api/photos/{id}/like",
    tag = "photos",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Photo with refreshed like count", body = Photo),
        (status = 404, description = "Photo not found"),
    )
)]
pub async fn unlike_photo(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Photo>, ApiError> {
    state
        .photos
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("photo not found"))?;

    state.photos.unlike(id, user.id).await?;
    let photo = state
        .photos
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("photo not found"))?;
    Ok(Json(photo))
}

#[utoipa::path(
    get,
    path = "/api/photos/{id}/like",
    tag = "photos",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Whether the requester liked the photo", body = LikeStatus),
    )
)]
pub async fn photo_like_status(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<LikeStatus>, ApiError> {
    let liked = state.photos.is_liked(id, user.id).await?;
    Ok(Json(LikeStatus { liked }))
}
