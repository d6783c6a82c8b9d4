use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Sessions last a day; there is no refresh mechanism, callers re-login.
pub const TOKEN_LIFETIME_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: user id.
    pub sub: i64,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}

/// Sign a bearer token for the given user.
///
/// # Errors
///
/// Fails when the claims cannot be serialized or signed.
pub fn issue_token(
    secret: &str,
    user_id: i64,
    email: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Decode and validate a bearer token. Tokens signed with an unexpected
/// algorithm, expired tokens, and malformed tokens all fail here.
///
/// # Errors
///
/// Returns the underlying `jsonwebtoken` error on any validation failure.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn round_trip_preserves_identity() {
        let token = issue_token(SECRET, 42, "a@x.com").unwrap();
        let claims = verify_token(SECRET, &token).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "a@x.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_token(SECRET, 42, "a@x.com").unwrap();
        assert!(verify_token("other-secret", &token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc::now();
        let claims = Claims {
            sub: 42,
            email: "a@x.com".into(),
            iat: (now - Duration::hours(48)).timestamp() as usize,
            exp: (now - Duration::hours(24)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(verify_token(SECRET, &token).is_err());
    }

    #[test]
    fn unexpected_algorithm_is_rejected() {
        let now = Utc::now();
        let claims = Claims {
            sub: 42,
            email: "a@x.com".into(),
            iat: now.timestamp() as usize,
            exp: (now + Duration::hours(1)).timestamp() as usize,
        };
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(verify_token(SECRET, &token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(verify_token(SECRET, "not-a-token").is_err());
    }
}
