//! In-memory repository backend: maps keyed by id behind a single
//! read/write lock. Reads take the shared lock, writes the exclusive lock,
//! and every operation completes while holding it, so derived counters stay
//! consistent with the rows they summarize.

use crate::models::{
    Comment, CommentReport, ModerationStatus, Photo, PhotoStatus, ReportStatus, User,
};
use crate::repo::{CommentRepo, NewPhoto, PhotoRepo, RepoError, ResolveAction, UserRepo};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashSet};
use std::sync::RwLock;

pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    users: BTreeMap<i64, StoredUser>,
    photos: BTreeMap<i64, StoredPhoto>,
    comments: BTreeMap<i64, StoredComment>,
    reports: BTreeMap<i64, StoredReport>,
    next_user_id: i64,
    next_photo_id: i64,
    next_status_id: i64,
    next_comment_id: i64,
    next_report_id: i64,
}

struct StoredUser {
    user: User,
    password_hash: String,
}

struct StoredPhoto {
    id: i64,
    user_id: i64,
    url: String,
    file_path: String,
    file_size: Option<i64>,
    mime_type: String,
    description: String,
    is_public: bool,
    likes: HashSet<i64>,
    statuses: Vec<PhotoStatus>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StoredPhoto {
    fn latest_status(&self) -> Option<&PhotoStatus> {
        self.statuses.last()
    }

    fn render(&self) -> Photo {
        let is_pending = self.is_public
            && self
                .latest_status()
                .is_some_and(|s| s.status != ModerationStatus::Approved);
        Photo {
            id: self.id,
            user_id: self.user_id,
            url: self.url.clone(),
            file_path: self.file_path.clone(),
            file_size: self.file_size,
            mime_type: self.mime_type.clone(),
            description: self.description.clone(),
            is_public: self.is_public,
            is_pending,
            likes_count: self.likes.len() as i64,
            created_at: self.created_at,
            updated_at: self.updated_at,
            variants: None,
        }
    }

    fn publicly_visible(&self) -> bool {
        self.is_public
            && self
                .latest_status()
                .is_none_or(|s| s.status == ModerationStatus::Approved)
    }
}

struct StoredComment {
    id: i64,
    photo_id: i64,
    user_id: i64,
    text: String,
    likes: HashSet<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

struct StoredReport {
    id: i64,
    comment_id: i64,
    reported_by: i64,
    reason: String,
    status: ReportStatus,
    admin_note: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Flip the admin flag on an existing user. There is no registration
    /// path to adminhood; operators (and tests) promote accounts directly.
    pub fn promote_to_admin(&self, user_id: i64) -> Result<(), RepoError> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        let stored = inner.users.get_mut(&user_id).ok_or(RepoError::NotFound)?;
        stored.user.is_admin = true;
        stored.user.updated_at = Utc::now();
        Ok(())
    }
}

impl Inner {
    fn render_comment(&self, stored: &StoredComment, viewer: Option<i64>) -> Comment {
        let username = self
            .users
            .get(&stored.user_id)
            .map(|u| u.user.username.clone())
            .unwrap_or_default();
        Comment {
            id: stored.id,
            photo_id: stored.photo_id,
            user_id: stored.user_id,
            username,
            text: stored.text.clone(),
            likes_count: stored.likes.len() as i64,
            user_liked: viewer.is_some_and(|v| stored.likes.contains(&v)),
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        }
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn create(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<User, RepoError> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        if inner.users.values().any(|u| u.user.email == email) {
            return Err(RepoError::Duplicate);
        }
        inner.next_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: inner.next_user_id,
            email: email.to_string(),
            username: username.to_string(),
            is_admin: false,
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(
            user.id,
            StoredUser {
                user: user.clone(),
                password_hash: password_hash.to_string(),
            },
        );
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<(User, String)>, RepoError> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner
            .users
            .values()
            .find(|u| u.user.email == email)
            .map(|u| (u.user.clone(), u.password_hash.clone())))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner.users.get(&id).map(|u| u.user.clone()))
    }
}

#[async_trait]
impl PhotoRepo for MemoryStore {
    async fn create(&self, new: NewPhoto) -> Result<Photo, RepoError> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.next_photo_id += 1;
        let id = inner.next_photo_id;
        let now = Utc::now();

        let mut stored = StoredPhoto {
            id,
            user_id: new.user_id,
            url: new.url,
            file_path: new.file_path,
            file_size: Some(new.file_size),
            mime_type: new.mime_type,
            description: new.description,
            is_public: new.is_public,
            likes: HashSet::new(),
            statuses: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        if new.is_public {
            inner.next_status_id += 1;
            stored.statuses.push(PhotoStatus {
                id: inner.next_status_id,
                photo_id: id,
                status: ModerationStatus::Pending,
                reason: String::new(),
                created_at: now,
                updated_at: now,
            });
        }

        let photo = stored.render();
        inner.photos.insert(id, stored);
        Ok(photo)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Photo>, RepoError> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner.photos.get(&id).map(StoredPhoto::render))
    }

    async fn list_public(&self, limit: i64, offset: i64) -> Result<Vec<Photo>, RepoError> {
        let inner = self.inner.read().expect("store lock poisoned");
        let mut photos: Vec<&StoredPhoto> = inner
            .photos
            .values()
            .filter(|p| p.publicly_visible())
            .collect();
        photos.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(page(&photos, limit, offset))
    }

    async fn list_by_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Photo>, RepoError> {
        let inner = self.inner.read().expect("store lock poisoned");
        let mut photos: Vec<&StoredPhoto> = inner
            .photos
            .values()
            .filter(|p| p.user_id == user_id)
            .collect();
        photos.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(page(&photos, limit, offset))
    }

    async fn update(
        &self,
        id: i64,
        description: &str,
        is_public: bool,
    ) -> Result<Photo, RepoError> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        let stored = inner.photos.get_mut(&id).ok_or(RepoError::NotFound)?;
        stored.description = description.to_string();
        stored.is_public = is_public;
        stored.updated_at = Utc::now();
        Ok(stored.render())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        if inner.photos.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        // Mirror the SQL cascade.
        inner.comments.retain(|_, c| c.photo_id != id);
        Ok(())
    }

    async fn like(&self, photo_id: i64, user_id: i64) -> Result<(), RepoError> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        let stored = inner.photos.get_mut(&photo_id).ok_or(RepoError::NotFound)?;
        stored.likes.insert(user_id);
        Ok(())
    }

    async fn unlike(&self, photo_id: i64, user_id: i64) -> Result<(), RepoError> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        let stored = inner.photos.get_mut(&photo_id).ok_or(RepoError::NotFound)?;
        stored.likes.remove(&user_id);
        Ok(())
    }

    async fn is_liked(&self, photo_id: i64, user_id: i64) -> Result<bool, RepoError> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner
            .photos
            .get(&photo_id)
            .is_some_and(|p| p.likes.contains(&user_id)))
    }

    async fn list_pending(&self, limit: i64, offset: i64) -> Result<Vec<Photo>, RepoError> {
        let inner = self.inner.read().expect("store lock poisoned");
        let mut photos: Vec<&StoredPhoto> = inner
            .photos
            .values()
            .filter(|p| {
                p.is_public
                    && p.latest_status()
                        .is_some_and(|s| s.status == ModerationStatus::Pending)
            })
            .collect();
        // Review queue: oldest submission first.
        photos.sort_by(|a, b| {
            let a_at = a.latest_status().map(|s| s.created_at);
            let b_at = b.latest_status().map(|s| s.created_at);
            a_at.cmp(&b_at).then(a.id.cmp(&b.id))
        });
        Ok(page(&photos, limit, offset))
    }

    async fn approve(&self, photo_id: i64) -> Result<(), RepoError> {
        self.transition(photo_id, ModerationStatus::Approved, "")
    }

    async fn reject(&self, photo_id: i64, reason: &str) -> Result<(), RepoError> {
        self.transition(photo_id, ModerationStatus::Rejected, reason)
    }
}

impl MemoryStore {
    /// pending -> approved/rejected; anything else has no pending row to move.
    fn transition(
        &self,
        photo_id: i64,
        to: ModerationStatus,
        reason: &str,
    ) -> Result<(), RepoError> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        let stored = inner.photos.get_mut(&photo_id).ok_or(RepoError::NotFound)?;
        let mut moved = false;
        for status in &mut stored.statuses {
            if status.status == ModerationStatus::Pending {
                status.status = to;
                status.reason = reason.to_string();
                status.updated_at = Utc::now();
                moved = true;
            }
        }
        if moved {
            Ok(())
        } else {
            Err(RepoError::NotFound)
        }
    }
}

#[async_trait]
impl CommentRepo for MemoryStore {
    async fn create(&self, photo_id: i64, user_id: i64, text: &str) -> Result<Comment, RepoError> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        if !inner.photos.contains_key(&photo_id) {
            return Err(RepoError::NotFound);
        }
        inner.next_comment_id += 1;
        let now = Utc::now();
        let stored = StoredComment {
            id: inner.next_comment_id,
            photo_id,
            user_id,
            text: text.to_string(),
            likes: HashSet::new(),
            created_at: now,
            updated_at: now,
        };
        let comment = inner.render_comment(&stored, None);
        inner.comments.insert(stored.id, stored);
        Ok(comment)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, RepoError> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner
            .comments
            .get(&id)
            .map(|c| inner.render_comment(c, None)))
    }

    async fn list_by_photo(
        &self,
        photo_id: i64,
        viewer: Option<i64>,
    ) -> Result<Vec<Comment>, RepoError> {
        let inner = self.inner.read().expect("store lock poisoned");
        let mut comments: Vec<&StoredComment> = inner
            .comments
            .values()
            .filter(|c| c.photo_id == photo_id)
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(comments
            .into_iter()
            .map(|c| inner.render_comment(c, viewer))
            .collect())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        if inner.comments.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn like(&self, comment_id: i64, user_id: i64) -> Result<(), RepoError> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        let stored = inner
            .comments
            .get_mut(&comment_id)
            .ok_or(RepoError::NotFound)?;
        stored.likes.insert(user_id);
        Ok(())
    }

    async fn unlike(&self, comment_id: i64, user_id: i64) -> Result<(), RepoError> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        let stored = inner
            .comments
            .get_mut(&comment_id)
            .ok_or(RepoError::NotFound)?;
        stored.likes.remove(&user_id);
        Ok(())
    }

    async fn report(
        &self,
        comment_id: i64,
        reported_by: i64,
        reason: &str,
    ) -> Result<(), RepoError> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        if !inner.comments.contains_key(&comment_id) {
            return Err(RepoError::NotFound);
        }
        inner.next_report_id += 1;
        let now = Utc::now();
        let stored = StoredReport {
            id: inner.next_report_id,
            comment_id,
            reported_by,
            reason: reason.to_string(),
            status: ReportStatus::Pending,
            admin_note: String::new(),
            created_at: now,
            updated_at: now,
        };
        inner.reports.insert(stored.id, stored);
        Ok(())
    }

    async fn list_reports(&self, status: ReportStatus) -> Result<Vec<CommentReport>, RepoError> {
        let inner = self.inner.read().expect("store lock poisoned");
        let mut reports: Vec<&StoredReport> = inner
            .reports
            .values()
            .filter(|r| r.status == status && inner.comments.contains_key(&r.comment_id))
            .collect();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(reports
            .into_iter()
            .map(|r| {
                let comment = inner
                    .comments
                    .get(&r.comment_id)
                    .map(|c| inner.render_comment(c, None))
                    .expect("filtered above");
                CommentReport {
                    id: r.id,
                    comment_id: r.comment_id,
                    reported_by: r.reported_by,
                    reason: r.reason.clone(),
                    status: r.status,
                    admin_note: r.admin_note.clone(),
                    comment,
                    created_at: r.created_at,
                }
            })
            .collect())
    }

    async fn resolve_report(
        &self,
        report_id: i64,
        action: ResolveAction,
        admin_note: &str,
    ) -> Result<(), RepoError> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        let comment_id = {
            let report = inner
                .reports
                .get_mut(&report_id)
                .ok_or(RepoError::NotFound)?;
            report.status = ReportStatus::Resolved;
            report.admin_note = admin_note.to_string();
            report.updated_at = Utc::now();
            report.comment_id
        };
        if action == ResolveAction::Delete {
            inner.comments.remove(&comment_id);
        }
        Ok(())
    }
}

fn page(photos: &[&StoredPhoto], limit: i64, offset: i64) -> Vec<Photo> {
    photos
        .iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .map(|p| p.render())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_photo(user_id: i64, is_public: bool) -> NewPhoto {
        NewPhoto {
            user_id,
            url: "/uploads/x.jpg".into(),
            file_path: "uploads/x.jpg".into(),
            file_size: 123,
            mime_type: "image/jpeg".into(),
            description: String::new(),
            is_public,
        }
    }

    #[tokio::test]
    async fn public_photo_starts_pending_and_approval_publishes_it() {
        let store = MemoryStore::new();
        let photo = PhotoRepo::create(&store, new_photo(1, true)).await.unwrap();
        assert!(photo.is_pending);
        assert!(store.list_public(20, 0).await.unwrap().is_empty());

        store.approve(photo.id).await.unwrap();
        let listed = store.list_public(20, 0).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(!listed[0].is_pending);

        // Nothing left in pending state to approve.
        assert!(matches!(
            store.approve(photo.id).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn rejected_photo_never_reaches_the_public_listing() {
        let store = MemoryStore::new();
        let photo = PhotoRepo::create(&store, new_photo(1, true)).await.unwrap();
        store.reject(photo.id, "blurry").await.unwrap();
        assert!(store.list_public(20, 0).await.unwrap().is_empty());
        assert!(matches!(
            store.approve(photo.id).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn private_photo_skips_moderation_entirely() {
        let store = MemoryStore::new();
        let photo = PhotoRepo::create(&store, new_photo(1, false))
            .await
            .unwrap();
        assert!(!photo.is_pending);
        assert!(store.list_pending(50, 0).await.unwrap().is_empty());
        assert!(store.list_public(20, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn double_like_counts_once() {
        let store = MemoryStore::new();
        let photo = PhotoRepo::create(&store, new_photo(1, false))
            .await
            .unwrap();
        PhotoRepo::like(&store, photo.id, 7).await.unwrap();
        PhotoRepo::like(&store, photo.id, 7).await.unwrap();
        let fetched = PhotoRepo::find_by_id(&store, photo.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.likes_count, 1);

        PhotoRepo::unlike(&store, photo.id, 7).await.unwrap();
        let fetched = PhotoRepo::find_by_id(&store, photo.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.likes_count, 0);
    }

    #[tokio::test]
    async fn resolving_with_delete_removes_the_comment_but_keeps_the_report() {
        let store = MemoryStore::new();
        let user = UserRepo::create(&store, "a@x.com", "alice", "hash")
            .await
            .unwrap();
        let photo = PhotoRepo::create(&store, new_photo(user.id, false))
            .await
            .unwrap();
        let comment = CommentRepo::create(&store, photo.id, user.id, "rude")
            .await
            .unwrap();
        store.report(comment.id, user.id, "offensive").await.unwrap();

        let pending = store.list_reports(ReportStatus::Pending).await.unwrap();
        assert_eq!(pending.len(), 1);

        store
            .resolve_report(pending[0].id, ResolveAction::Delete, "removed")
            .await
            .unwrap();
        assert!(CommentRepo::find_by_id(&store, comment.id)
            .await
            .unwrap()
            .is_none());
        // Orphaned resolved report is retained but no longer listed.
        assert!(store
            .list_reports(ReportStatus::Resolved)
            .await
            .unwrap()
            .is_empty());
    }
}
