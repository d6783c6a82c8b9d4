use crate::config::AppConfig;
use crate::repo::memory::MemoryStore;
use crate::repo::postgres::{PgCommentRepo, PgPhotoRepo, PgUserRepo};
use crate::repo::{CommentRepo, PhotoRepo, UserRepo};
use sqlx::PgPool;
use std::sync::Arc;

/// Shared per-request dependencies: configuration plus one repository
/// handle per aggregate, behind trait objects so the Postgres and in-memory
/// backends are interchangeable.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepo>,
    pub photos: Arc<dyn PhotoRepo>,
    pub comments: Arc<dyn CommentRepo>,
}

impl AppState {
    #[must_use]
    pub fn postgres(config: AppConfig, pool: PgPool) -> Self {
        Self {
            config: Arc::new(config),
            users: Arc::new(PgUserRepo::new(pool.clone())),
            photos: Arc::new(PgPhotoRepo::new(pool.clone())),
            comments: Arc::new(PgCommentRepo::new(pool)),
        }
    }

    /// Single in-memory store serving all three repositories.
    #[must_use]
    pub fn in_memory(config: AppConfig) -> (Self, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let state = Self {
            config: Arc::new(config),
            users: store.clone(),
            photos: store.clone(),
            comments: store.clone(),
        };
        (state, store)
    }
}
