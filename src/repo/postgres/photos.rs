use crate::models::{ModerationStatus, Photo};
use crate::repo::postgres::map_db_err;
use crate::repo::{NewPhoto, PhotoRepo, RepoError};
use async_trait::async_trait;
use sqlx::PgPool;

const PHOTO_COLUMNS: &str = "id, user_id, url, file_path, file_size, mime_type, \
     description, is_public, likes_count, created_at, updated_at";

pub struct PgPhotoRepo {
    pool: PgPool,
}

impl PgPhotoRepo {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Latest status row wins; photos without one have never entered review.
    async fn latest_status(&self, photo_id: i64) -> Result<Option<ModerationStatus>, RepoError> {
        Ok(sqlx::query_scalar::<_, ModerationStatus>(
            "SELECT status FROM photo_statuses WHERE photo_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT 1",
        )
        .bind(photo_id)
        .fetch_optional(&self.pool)
        .await?)
    }
}

#[async_trait]
impl PhotoRepo for PgPhotoRepo {
    async fn create(&self, new: NewPhoto) -> Result<Photo, RepoError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO photos (user_id, url, file_path, file_size, mime_type, description, is_public) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {PHOTO_COLUMNS}"
        );
        let mut photo = sqlx::query_as::<_, Photo>(&sql)
            .bind(new.user_id)
            .bind(&new.url)
            .bind(&new.file_path)
            .bind(new.file_size)
            .bind(&new.mime_type)
            .bind(&new.description)
            .bind(new.is_public)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_db_err)?;

        // Public photos wait for review before showing up in the public feed.
        if new.is_public {
            sqlx::query("INSERT INTO photo_statuses (photo_id, status) VALUES ($1, 'pending')")
                .bind(photo.id)
                .execute(&mut *tx)
                .await?;
            photo.is_pending = true;
        }

        tx.commit().await?;
        Ok(photo)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Photo>, RepoError> {
        let sql = format!("SELECT {PHOTO_COLUMNS} FROM photos WHERE id = $1");
        let photo = sqlx::query_as::<_, Photo>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(mut photo) = photo else {
            return Ok(None);
        };
        if photo.is_public {
            if let Some(status) = self.latest_status(id).await? {
                photo.is_pending = status != ModerationStatus::Approved;
            }
        }
        Ok(Some(photo))
    }

    async fn list_public(&self, limit: i64, offset: i64) -> Result<Vec<Photo>, RepoError> {
        let sql = format!(
            "SELECT {} FROM photos p \
             LEFT JOIN photo_statuses ps ON p.id = ps.photo_id \
             WHERE p.is_public = TRUE AND (ps.status IS NULL OR ps.status = 'approved') \
             ORDER BY p.created_at DESC, p.id DESC LIMIT $1 OFFSET $2",
            prefixed_columns("p")
        );
        Ok(sqlx::query_as::<_, Photo>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_by_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Photo>, RepoError> {
        let sql = format!(
            "SELECT {PHOTO_COLUMNS} FROM photos WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
        );
        let mut photos = sqlx::query_as::<_, Photo>(&sql)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        for photo in &mut photos {
            if photo.is_public {
                if let Some(status) = self.latest_status(photo.id).await? {
                    photo.is_pending = status != ModerationStatus::Approved;
                }
            }
        }
        Ok(photos)
    }

    async fn update(
        &self,
        id: i64,
        description: &str,
        is_public: bool,
    ) -> Result<Photo, RepoError> {
        sqlx::query(
            "UPDATE photos SET description = $1, is_public = $2, updated_at = now() WHERE id = $3",
        )
        .bind(description)
        .bind(is_public)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id).await?.ok_or(RepoError::NotFound)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM photos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn like(&self, photo_id: i64, user_id: i64) -> Result<(), RepoError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "INSERT INTO photo_likes (photo_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(photo_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "UPDATE photos SET likes_count = \
             (SELECT COUNT(*) FROM photo_likes WHERE photo_id = $1) WHERE id = $1",
        )
        .bind(photo_id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn unlike(&self, photo_id: i64, user_id: i64) -> Result<(), RepoError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM photo_likes WHERE photo_id = $1 AND user_id = $2")
            .bind(photo_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "UPDATE photos SET likes_count = \
             (SELECT COUNT(*) FROM photo_likes WHERE photo_id = $1) WHERE id = $1",
        )
        .bind(photo_id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn is_liked(&self, photo_id: i64, user_id: i64) -> Result<bool, RepoError> {
        Ok(sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM photo_likes WHERE photo_id = $1 AND user_id = $2)",
        )
        .bind(photo_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn list_pending(&self, limit: i64, offset: i64) -> Result<Vec<Photo>, RepoError> {
        let sql = format!(
            "SELECT {} FROM photos p \
             JOIN photo_statuses ps ON ps.photo_id = p.id \
             WHERE p.is_public = TRUE AND ps.status = 'pending' \
             ORDER BY ps.created_at ASC, ps.id ASC LIMIT $1 OFFSET $2",
            prefixed_columns("p")
        );
        let mut photos = sqlx::query_as::<_, Photo>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        for photo in &mut photos {
            photo.is_pending = true;
        }
        Ok(photos)
    }

    async fn approve(&self, photo_id: i64) -> Result<(), RepoError> {
        let result = sqlx::query(
            "UPDATE photo_statuses SET status = 'approved', updated_at = now() \
             WHERE photo_id = $1 AND status = 'pending'",
        )
        .bind(photo_id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn reject(&self, photo_id: i64, reason: &str) -> Result<(), RepoError> {
        let result = sqlx::query(
            "UPDATE photo_statuses SET status = 'rejected', reason = $2, updated_at = now() \
             WHERE photo_id = $1 AND status = 'pending'",
        )
        .bind(photo_id)
        .bind(reason)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

/// `PHOTO_COLUMNS` with a table alias, for joined queries.
fn prefixed_columns(alias: &str) -> String {
    PHOTO_COLUMNS
        .split(',')
        .map(|col| format!("{alias}.{}", col.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}
