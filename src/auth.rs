/// Access tokens and the authentication extractor
use crate::{api::middleware::extract_bearer_token, context::AppContext, error::ApiError};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Access token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id, as a decimal string
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Sign an access token for `user_id`, valid for `ttl` from `issued_at`
pub fn encode_access_token(
    user_id: i64,
    jwt_secret: &str,
    issued_at: DateTime<Utc>,
    ttl: Duration,
) -> Result<String, ApiError> {
    let claims = Claims {
        sub: user_id.to_string(),
        iat: issued_at.timestamp(),
        exp: (issued_at + ttl).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("Failed to generate token: {}", e)))
}

/// Verify an access token and return the user id it is bound to
///
/// This performs:
/// 1. JWT signature verification
/// 2. Expiration checking, with no leeway
/// 3. Subject parsing
pub fn verify_access_token(token: &str, jwt_secret: &str) -> Result<i64, ApiError> {
    let decoding_key = DecodingKey::from_secret(jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
        tracing::warn!("JWT verification failed: {}", e);
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                ApiError::Unauthorized("Token has expired".to_string())
            }
            jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                ApiError::Unauthorized("Invalid token signature".to_string())
            }
            _ => ApiError::Unauthorized("Invalid token".to_string()),
        }
    })?;

    data.claims
        .sub
        .parse()
        .map_err(|_| ApiError::Unauthorized("Invalid token subject".to_string()))
}

/// Authenticated caller - extracts and verifies the bearer token
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: i64,
}

#[async_trait]
impl FromRequestParts<AppContext> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;
        let user_id = verify_access_token(&token, &state.config.authentication.jwt_secret)?;

        Ok(AuthUser { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-for-testing-only-0123";

    #[test]
    fn test_token_round_trip() {
        let token = encode_access_token(7, SECRET, Utc::now(), Duration::hours(2)).unwrap();
        assert_eq!(verify_access_token(&token, SECRET).unwrap(), 7);
    }

    #[test]
    fn test_token_valid_just_before_expiry() {
        let issued = Utc::now() - Duration::hours(2) + Duration::seconds(30);
        let token = encode_access_token(3, SECRET, issued, Duration::hours(2)).unwrap();
        assert_eq!(verify_access_token(&token, SECRET).unwrap(), 3);
    }

    #[test]
    fn test_expired_token_rejected() {
        let issued = Utc::now() - Duration::hours(2) - Duration::seconds(5);
        let token = encode_access_token(3, SECRET, issued, Duration::hours(2)).unwrap();

        match verify_access_token(&token, SECRET) {
            Err(ApiError::Unauthorized(msg)) => assert_eq!(msg, "Token has expired"),
            other => panic!("expected expiry, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = encode_access_token(3, SECRET, Utc::now(), Duration::hours(2)).unwrap();

        match verify_access_token(&token, "another-secret-another-secret-0000") {
            Err(ApiError::Unauthorized(msg)) => assert_eq!(msg, "Invalid token signature"),
            other => panic!("expected bad signature, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(matches!(
            verify_access_token("not.a.jwt", SECRET),
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_non_numeric_subject_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "did:example:alice".to_string(),
            iat: now,
            exp: now + 60,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            verify_access_token(&token, SECRET),
            Err(ApiError::Unauthorized(_))
        ));
    }
}
