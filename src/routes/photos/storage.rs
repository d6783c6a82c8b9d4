use crate::error::ApiError;
use color_eyre::eyre::WrapErr;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Upload ceiling, matching the documented 10MB API contract.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const ALLOWED_MIME_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/gif", "image/webp"];

#[must_use]
pub fn is_allowed_mime(mime_type: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mime_type)
}

/// Validate an upload before anything touches the filesystem, so rejected
/// requests leave no orphaned file behind.
pub fn validate_upload(mime_type: &str, size: usize) -> Result<(), ApiError> {
    if size > MAX_UPLOAD_BYTES {
        return Err(ApiError::Validation(
            "photo size must not exceed 10MB".into(),
        ));
    }
    if !is_allowed_mime(mime_type) {
        return Err(ApiError::Validation(
            "invalid image format. allowed: jpeg, png, gif, webp".into(),
        ));
    }
    Ok(())
}

/// Store upload bytes under a fresh UUID name, keeping the client's file
/// extension. Returns the filesystem path of the stored file.
pub async fn store_upload(
    upload_dir: &str,
    original_name: &str,
    data: &[u8],
) -> Result<(String, PathBuf), ApiError> {
    tokio::fs::create_dir_all(upload_dir)
        .await
        .wrap_err("failed to create upload directory")?;

    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    let file_name = format!("{}{ext}", Uuid::new_v4());
    let path = Path::new(upload_dir).join(&file_name);

    tokio::fs::write(&path, data)
        .await
        .wrap_err("failed to save uploaded file")?;

    Ok((file_name, path))
}

/// Best-effort removal; a missing file is not an error.
pub async fn remove_stored_file(path: &str) {
    if let Err(err) = tokio::fs::remove_file(path).await {
        if err.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!("Failed to remove stored file {path}: {err}");
        }
    }
}
