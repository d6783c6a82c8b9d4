use crate::models::{Comment, CommentReport, ReportStatus};
use crate::repo::{CommentRepo, RepoError, ResolveAction};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

const COMMENT_SELECT: &str = "SELECT c.id, c.photo_id, c.user_id, u.username, c.text, \
     c.likes_count, c.created_at, c.updated_at \
     FROM comments c JOIN users u ON u.id = c.user_id";

pub struct PgCommentRepo {
    pool: PgPool,
}

impl PgCommentRepo {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepo for PgCommentRepo {
    async fn create(&self, photo_id: i64, user_id: i64, text: &str) -> Result<Comment, RepoError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO comments (photo_id, user_id, text) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(photo_id)
        .bind(user_id)
        .bind(text)
        .fetch_one(&self.pool)
        .await?;

        self.find_by_id(id).await?.ok_or(RepoError::NotFound)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, RepoError> {
        let sql = format!("{COMMENT_SELECT} WHERE c.id = $1");
        Ok(sqlx::query_as::<_, Comment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_by_photo(
        &self,
        photo_id: i64,
        viewer: Option<i64>,
    ) -> Result<Vec<Comment>, RepoError> {
        let sql = format!("{COMMENT_SELECT} WHERE c.photo_id = $1 ORDER BY c.created_at DESC, c.id DESC");
        let mut comments = sqlx::query_as::<_, Comment>(&sql)
            .bind(photo_id)
            .fetch_all(&self.pool)
            .await?;

        if let Some(viewer) = viewer {
            for comment in &mut comments {
                comment.user_liked = sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(SELECT 1 FROM comment_likes WHERE comment_id = $1 AND user_id = $2)",
                )
                .bind(comment.id)
                .bind(viewer)
                .fetch_one(&self.pool)
                .await?;
            }
        }
        Ok(comments)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn like(&self, comment_id: i64, user_id: i64) -> Result<(), RepoError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "INSERT INTO comment_likes (comment_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(comment_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "UPDATE comments SET likes_count = \
             (SELECT COUNT(*) FROM comment_likes WHERE comment_id = $1) WHERE id = $1",
        )
        .bind(comment_id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn unlike(&self, comment_id: i64, user_id: i64) -> Result<(), RepoError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM comment_likes WHERE comment_id = $1 AND user_id = $2")
            .bind(comment_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "UPDATE comments SET likes_count = \
             (SELECT COUNT(*) FROM comment_likes WHERE comment_id = $1) WHERE id = $1",
        )
        .bind(comment_id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn report(
        &self,
        comment_id: i64,
        reported_by: i64,
        reason: &str,
    ) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO comment_reports (comment_id, reported_by, reason, status) \
             VALUES ($1, $2, $3, 'pending')",
        )
        .bind(comment_id)
        .bind(reported_by)
        .bind(reason)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_reports(&self, status: ReportStatus) -> Result<Vec<CommentReport>, RepoError> {
        let rows = sqlx::query_as::<_, ReportRow>(
            "SELECT cr.id, cr.comment_id, cr.reported_by, cr.reason, cr.status, \
                    cr.admin_note, cr.created_at, \
                    c.photo_id, c.user_id, u.username, c.text, c.likes_count, \
                    c.created_at AS comment_created_at, c.updated_at AS comment_updated_at \
             FROM comment_reports cr \
             JOIN comments c ON c.id = cr.comment_id \
             JOIN users u ON u.id = c.user_id \
             WHERE cr.status = $1 \
             ORDER BY cr.created_at DESC, cr.id DESC",
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ReportRow::into_report).collect())
    }

    async fn resolve_report(
        &self,
        report_id: i64,
        action: ResolveAction,
        admin_note: &str,
    ) -> Result<(), RepoError> {
        let mut tx = self.pool.begin().await?;

        let comment_id = sqlx::query_scalar::<_, i64>(
            "SELECT comment_id FROM comment_reports WHERE id = $1",
        )
        .bind(report_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepoError::NotFound)?;

        // Resolve first: the report row must survive even when the comment
        // it refers to is deleted.
        sqlx::query(
            "UPDATE comment_reports SET status = 'resolved', admin_note = $1, updated_at = now() \
             WHERE id = $2",
        )
        .bind(admin_note)
        .bind(report_id)
        .execute(&mut *tx)
        .await?;

        if action == ResolveAction::Delete {
            sqlx::query("DELETE FROM comments WHERE id = $1")
                .bind(comment_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct ReportRow {
    id: i64,
    comment_id: i64,
    reported_by: i64,
    reason: String,
    status: ReportStatus,
    admin_note: String,
    created_at: DateTime<Utc>,
    photo_id: i64,
    user_id: i64,
    username: String,
    text: String,
    likes_count: i64,
    comment_created_at: DateTime<Utc>,
    comment_updated_at: DateTime<Utc>,
}

impl ReportRow {
    fn into_report(self) -> CommentReport {
        CommentReport {
            id: self.id,
            comment_id: self.comment_id,
            reported_by: self.reported_by,
            reason: self.reason,
            status: self.status,
            admin_note: self.admin_note,
            comment: Comment {
                id: self.comment_id,
                photo_id: self.photo_id,
                user_id: self.user_id,
                username: self.username,
                text: self.text,
                likes_count: self.likes_count,
                user_liked: false,
                created_at: self.comment_created_at,
                updated_at: self.comment_updated_at,
            },
            created_at: self.created_at,
        }
    }
}
