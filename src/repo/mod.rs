//! Repository layer: the same trait surface backed either by Postgres or by
//! an in-memory store guarded by a read/write lock.

pub mod memory;
pub mod postgres;

use crate::models::{Comment, CommentReport, Photo, ReportStatus, User};
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Unique constraint violation (duplicate email, double like).
    #[error("duplicate key")]
    Duplicate,
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// What an admin decided about a comment report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveAction {
    /// Remove the offending comment and mark the report resolved.
    Delete,
    /// Keep the comment; mark the report resolved with a note.
    Dismiss,
}

/// Fields required to persist a freshly uploaded photo.
#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub user_id: i64,
    pub url: String,
    pub file_path: String,
    pub file_size: i64,
    pub mime_type: String,
    pub description: String,
    pub is_public: bool,
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Insert a new user. Fails with [`RepoError::Duplicate`] when the email
    /// is already registered.
    async fn create(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<User, RepoError>;

    /// Fetch a user together with their password hash, for login.
    async fn find_by_email(&self, email: &str) -> Result<Option<(User, String)>, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError>;
}

#[async_trait]
pub trait PhotoRepo: Send + Sync {
    /// Persist a photo. A public photo also gets a companion `pending`
    /// status row in the same transaction.
    async fn create(&self, new: NewPhoto) -> Result<Photo, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Photo>, RepoError>;

    /// Public listing: `is_public AND (status IS NULL OR status = approved)`,
    /// newest first.
    async fn list_public(&self, limit: i64, offset: i64) -> Result<Vec<Photo>, RepoError>;

    /// All photos of one user, including private ones, newest first.
    async fn list_by_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Photo>, RepoError>;

    async fn update(
        &self,
        id: i64,
        description: &str,
        is_public: bool,
    ) -> Result<Photo, RepoError>;

    async fn delete(&self, id: i64) -> Result<(), RepoError>;

    /// Record a like. Duplicate likes are conflict-ignored; `likes_count` is
    /// recomputed from the like rows inside one transaction.
    async fn like(&self, photo_id: i64, user_id: i64) -> Result<(), RepoError>;

    async fn unlike(&self, photo_id: i64, user_id: i64) -> Result<(), RepoError>;

    async fn is_liked(&self, photo_id: i64, user_id: i64) -> Result<bool, RepoError>;

    /// Public photos whose latest status is `pending`, oldest first.
    async fn list_pending(&self, limit: i64, offset: i64) -> Result<Vec<Photo>, RepoError>;

    /// pending -> approved. [`RepoError::NotFound`] when the photo has no
    /// pending status row.
    async fn approve(&self, photo_id: i64) -> Result<(), RepoError>;

    /// pending -> rejected, with a reason.
    async fn reject(&self, photo_id: i64, reason: &str) -> Result<(), RepoError>;
}

#[async_trait]
pub trait CommentRepo: Send + Sync {
    async fn create(&self, photo_id: i64, user_id: i64, text: &str) -> Result<Comment, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, RepoError>;

    /// Comments on a photo, newest first. `viewer` controls the `user_liked`
    /// flag on each comment.
    async fn list_by_photo(
        &self,
        photo_id: i64,
        viewer: Option<i64>,
    ) -> Result<Vec<Comment>, RepoError>;

    async fn delete(&self, id: i64) -> Result<(), RepoError>;

    async fn like(&self, comment_id: i64, user_id: i64) -> Result<(), RepoError>;

    async fn unlike(&self, comment_id: i64, user_id: i64) -> Result<(), RepoError>;

    async fn report(
        &self,
        comment_id: i64,
        reported_by: i64,
        reason: &str,
    ) -> Result<(), RepoError>;

    /// Reports in the given state, newest first, with the reported comment
    /// embedded. Reports whose comment no longer exists are skipped.
    async fn list_reports(&self, status: ReportStatus) -> Result<Vec<CommentReport>, RepoError>;

    /// Mark a report resolved, then apply the action.
    async fn resolve_report(
        &self,
        report_id: i64,
        action: ResolveAction,
        admin_note: &str,
    ) -> Result<(), RepoError>;
}
