use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;

/// A user record as sent to clients. Note the absence of the password hash.
#[derive(Debug, Serialize, FromRow, Clone, ToSchema)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Maps to the `photo_status` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "photo_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModerationStatus::Pending => write!(f, "pending"),
            ModerationStatus::Approved => write!(f, "approved"),
            ModerationStatus::Rejected => write!(f, "rejected"),
        }
    }
}

#[derive(Debug, Serialize, FromRow, Clone, ToSchema)]
pub struct Photo {
    pub id: i64,
    pub user_id: i64,
    pub url: String,
    pub file_path: String,
    pub file_size: Option<i64>,
    pub mime_type: String,
    pub description: String,
    pub is_public: bool,
    /// Derived: the photo is public and its latest status row is not `approved`.
    #[sqlx(skip)]
    pub is_pending: bool,
    pub likes_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<PhotoVariant>>,
}

/// Moderation state row for a public photo. Only the most recent row per
/// photo (ordered by `created_at`) is authoritative.
#[derive(Debug, Serialize, FromRow, Clone, ToSchema)]
pub struct PhotoStatus {
    pub id: i64,
    pub photo_id: i64,
    pub status: ModerationStatus,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, FromRow, Clone, ToSchema)]
pub struct Comment {
    pub id: i64,
    pub photo_id: i64,
    pub user_id: i64,
    pub username: String,
    pub text: String,
    pub likes_count: i64,
    /// Whether the requesting user has liked this comment.
    #[sqlx(skip)]
    pub user_liked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Maps to the `report_status` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "report_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Resolved,
}

#[derive(Debug, Serialize, Clone, ToSchema)]
pub struct CommentReport {
    pub id: i64,
    pub comment_id: i64,
    pub reported_by: i64,
    pub reason: String,
    pub status: ReportStatus,
    pub admin_note: String,
    pub comment: Comment,
    pub created_at: DateTime<Utc>,
}

/// Schema stub for a resized/re-encoded copy of a photo. No generation code
/// exists; the image pipeline configuration is declared but unwired.
#[derive(Debug, Serialize, FromRow, Clone, ToSchema)]
pub struct PhotoVariant {
    pub id: i64,
    pub photo_id: i64,
    pub size_name: String,
    pub format: String,
    pub file_path: String,
    pub file_size: i64,
    pub width: i32,
    pub height: i32,
    pub quality: i32,
    pub created_at: DateTime<Utc>,
}
