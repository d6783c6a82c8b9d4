//! Single authorization policy for owner-scoped mutations, instead of
//! re-checking ownership inline in every handler.

use crate::error::ApiError;
use crate::models::User;

/// Allow when the actor owns the resource or carries the admin flag.
pub fn ensure_owner_or_admin(
    actor: &User,
    owner_id: i64,
    denied: &'static str,
) -> Result<(), ApiError> {
    if actor.id == owner_id || actor.is_admin {
        Ok(())
    } else {
        Err(ApiError::Forbidden(denied))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(id: i64, is_admin: bool) -> User {
        User {
            id,
            email: format!("u{id}@example.com"),
            username: format!("user{id}"),
            is_admin,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn owner_is_allowed() {
        assert!(ensure_owner_or_admin(&user(1, false), 1, "nope").is_ok());
    }

    #[test]
    fn admin_overrides_ownership() {
        assert!(ensure_owner_or_admin(&user(2, true), 1, "nope").is_ok());
    }

    #[test]
    fn stranger_is_denied() {
        assert!(matches!(
            ensure_owner_or_admin(&user(2, false), 1, "nope"),
            Err(ApiError::Forbidden("nope"))
        ));
    }
}
