//! Postgres-backed repositories using the runtime `sqlx` query API.

mod comments;
mod photos;
mod users;

pub use comments::PgCommentRepo;
pub use photos::PgPhotoRepo;
pub use users::PgUserRepo;

use crate::repo::RepoError;

/// Translate a driver error, surfacing unique-constraint violations.
fn map_db_err(err: sqlx::Error) -> RepoError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return RepoError::Duplicate;
        }
    }
    RepoError::Database(err)
}
