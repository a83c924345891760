//! Token service - Issues and resolves signed tokens.
//!
//! Access tokens authenticate requests; verification tokens confirm an
//! account. Both are HS256 JWTs told apart by their `purpose` claim.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{
    Config, SECONDS_PER_HOUR, TOKEN_PURPOSE_ACCESS, TOKEN_PURPOSE_VERIFY, TOKEN_TYPE_BEARER,
};
use crate::domain::User;
use crate::errors::{AppError, AppResult};

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub purpose: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Token issuing and resolution.
pub trait TokenService: Send + Sync {
    /// Issue an access token for a user
    fn issue_access_token(&self, user: &User) -> AppResult<TokenResponse>;

    /// Validate an access token and return its claims
    fn verify_access_token(&self, token: &str) -> AppResult<Claims>;

    /// Issue a verification token for an account
    fn issue_verification_token(&self, user_id: i32) -> AppResult<String>;

    /// Resolve a verification token to the user id it names
    fn resolve_verification_token(&self, token: &str) -> AppResult<i32>;
}

/// [`TokenService`] backed by HMAC-signed JWTs.
pub struct JwtTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl_hours: i64,
    verification_ttl_hours: i64,
}

impl JwtTokens {
    pub fn new(secret: &[u8], access_ttl_hours: i64, verification_ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            access_ttl_hours,
            verification_ttl_hours,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.jwt_secret_bytes(),
            config.jwt_expiration_hours,
            config.verification_token_hours,
        )
    }

    fn sign(&self, sub: i32, email: Option<String>, purpose: &str, ttl_hours: i64) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub,
            email,
            purpose: purpose.to_string(),
            exp: (now + Duration::hours(ttl_hours)).timestamp(),
            iat: now.timestamp(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Decode `token` and require the given purpose.
    fn open(&self, token: &str, purpose: &str) -> AppResult<Claims> {
        let claims = decode::<Claims>(token, &self.decoding, &Validation::default())?.claims;

        if claims.purpose != purpose {
            return Err(AppError::Unauthorized);
        }
        Ok(claims)
    }
}

impl TokenService for JwtTokens {
    fn issue_access_token(&self, user: &User) -> AppResult<TokenResponse> {
        let access_token = self.sign(
            user.id,
            Some(user.email.clone()),
            TOKEN_PURPOSE_ACCESS,
            self.access_ttl_hours,
        )?;

        Ok(TokenResponse {
            access_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.access_ttl_hours * SECONDS_PER_HOUR,
        })
    }

    fn verify_access_token(&self, token: &str) -> AppResult<Claims> {
        self.open(token, TOKEN_PURPOSE_ACCESS)
    }

    fn issue_verification_token(&self, user_id: i32) -> AppResult<String> {
        self.sign(user_id, None, TOKEN_PURPOSE_VERIFY, self.verification_ttl_hours)
    }

    fn resolve_verification_token(&self, token: &str) -> AppResult<i32> {
        self.open(token, TOKEN_PURPOSE_VERIFY).map(|claims| claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-key-for-testing-only-32chars";

    fn tokens() -> JwtTokens {
        JwtTokens::new(SECRET, 1, 48)
    }

    fn user(id: i32) -> User {
        User {
            id,
            email: "test@example.com".to_string(),
            password_hash: "hashed".to_string(),
            name: "Test User".to_string(),
            is_verified: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_verification_token_round_trip() {
        let tokens = tokens();
        let token = tokens.issue_verification_token(42).unwrap();
        assert_eq!(tokens.resolve_verification_token(&token).unwrap(), 42);
    }

    #[test]
    fn test_access_token_claims() {
        let tokens = tokens();
        let issued = tokens.issue_access_token(&user(5)).unwrap();
        assert_eq!(issued.token_type, "Bearer");
        assert_eq!(issued.expires_in, 3600);

        let claims = tokens.verify_access_token(&issued.access_token).unwrap();
        assert_eq!(claims.sub, 5);
        assert_eq!(claims.email.as_deref(), Some("test@example.com"));
    }

    #[test]
    fn test_purposes_are_not_interchangeable() {
        let tokens = tokens();
        let access = tokens.issue_access_token(&user(5)).unwrap().access_token;
        let verify = tokens.issue_verification_token(5).unwrap();

        assert!(tokens.resolve_verification_token(&access).is_err());
        assert!(tokens.verify_access_token(&verify).is_err());
    }

    #[test]
    fn test_malformed_token_rejected() {
        let result = tokens().resolve_verification_token("not-a-jwt");
        assert!(matches!(result, Err(AppError::Jwt(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let expired = JwtTokens::new(SECRET, 1, -2);
        let token = expired.issue_verification_token(1).unwrap();
        assert!(tokens().resolve_verification_token(&token).is_err());
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let other = JwtTokens::new(b"another-secret-key-that-is-32-chars-long", 1, 48);
        let token = other.issue_verification_token(1).unwrap();
        assert!(tokens().resolve_verification_token(&token).is_err());
    }
}
