//! Authentication service - Registration, login, verification and
//! resolution of the caller behind an access token.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use super::{OperationLog, TokenResponse, TokenService};
use crate::domain::{CurrentUser, NewUser, Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// Why an account verification failed.
///
/// Clients only ever see a bare 400 unless detailed verification errors are
/// enabled in the configuration.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("Verification token is malformed or expired")]
    MalformedToken(#[source] AppError),

    #[error("No account matches the verification token")]
    UserNotFound(i32),

    #[error("Verification failed")]
    Other(#[source] AppError),
}

impl VerifyError {
    /// Stable identifier of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            VerifyError::MalformedToken(_) => "malformed_token",
            VerifyError::UserNotFound(_) => "user_not_found",
            VerifyError::Other(_) => "other",
        }
    }
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new, unverified user
    async fn register(&self, email: String, password: String, name: String) -> AppResult<User>;

    /// Check credentials and issue an access token
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Mark the account named by a verification token as verified
    async fn verify(&self, token: &str) -> Result<User, VerifyError>;

    /// Resolve an access token to the caller it belongs to
    async fn authenticate(&self, access_token: &str) -> AppResult<CurrentUser>;
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenService>,
    log: OperationLog,
}

impl Authenticator {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn TokenService>,
        log: OperationLog,
    ) -> Self {
        Self { users, tokens, log }
    }

    async fn register_inner(&self, email: String, password: String, name: String) -> AppResult<User> {
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email"));
        }

        let password_hash = Password::new(&password)?.into_string();
        self.users
            .create(NewUser {
                email,
                name,
                password_hash,
            })
            .await
    }

    async fn login_inner(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                Password::verify_decoy(&password);
                return Err(AppError::InvalidCredentials);
            }
        };

        if !Password::from_hash(user.password_hash.clone()).verify(&password) {
            return Err(AppError::InvalidCredentials);
        }

        self.tokens.issue_access_token(&user)
    }

    async fn verify_inner(&self, token: &str) -> Result<User, VerifyError> {
        let user_id = self
            .tokens
            .resolve_verification_token(token)
            .map_err(VerifyError::MalformedToken)?;

        match self.users.mark_verified(user_id).await {
            Ok(user) => Ok(user),
            Err(AppError::NotFound) => Err(VerifyError::UserNotFound(user_id)),
            Err(e) => Err(VerifyError::Other(e)),
        }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, email: String, password: String, name: String) -> AppResult<User> {
        let result = self.register_inner(email, password, name).await;
        if let Ok(ref user) = result {
            tracing::info!(user_id = user.id, "Account registered");
        }
        self.log.record("register", result)
    }

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let result = self.login_inner(email, password).await;
        self.log.record("login", result)
    }

    async fn verify(&self, token: &str) -> Result<User, VerifyError> {
        let result = self.verify_inner(token).await;
        self.log.record("verify", result)
    }

    async fn authenticate(&self, access_token: &str) -> AppResult<CurrentUser> {
        let claims = self.tokens.verify_access_token(access_token)?;

        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(CurrentUser::from(&user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockUserRepository;
    use crate::services::JwtTokens;
    use chrono::Utc;
    use mockall::predicate::eq;

    const SECRET: &[u8] = b"test-secret-key-for-testing-only-32chars";

    fn test_user(id: i32, password_hash: String) -> User {
        User {
            id,
            email: "test@example.com".to_string(),
            password_hash,
            name: "Test User".to_string(),
            is_verified: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service(repo: MockUserRepository) -> (Authenticator, Arc<JwtTokens>) {
        let tokens = Arc::new(JwtTokens::new(SECRET, 1, 48));
        let auth = Authenticator::new(Arc::new(repo), tokens.clone(), OperationLog::detached());
        (auth, tokens)
    }

    #[tokio::test]
    async fn test_register_creates_unverified_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create().times(1).returning(|new_user| {
            assert_ne!(new_user.password_hash, "SecurePass123");
            let mut user = test_user(1, new_user.password_hash);
            user.email = new_user.email;
            user.name = new_user.name;
            Ok(user)
        });

        let (auth, _) = service(repo);
        let user = auth
            .register(
                "new@example.com".to_string(),
                "SecurePass123".to_string(),
                "New User".to_string(),
            )
            .await
            .unwrap();

        assert_eq!(user.email, "new@example.com");
        assert!(!user.is_verified);
        assert!(Password::from_hash(user.password_hash).verify("SecurePass123"));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(test_user(1, "hash".to_string()))));
        repo.expect_create().never();

        let (auth, _) = service(repo);
        let result = auth
            .register(
                "test@example.com".to_string(),
                "SecurePass123".to_string(),
                "Dup".to_string(),
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_short_password_creates_nothing() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create().never();

        let (auth, _) = service(repo);
        let result = auth
            .register("a@example.com".to_string(), "short".to_string(), "A".to_string())
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_success_and_failure() {
        let hash = Password::new("SecurePass123").unwrap().into_string();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(test_user(5, hash.clone()))));

        let (auth, tokens) = service(repo);
        let issued = auth
            .login("test@example.com".to_string(), "SecurePass123".to_string())
            .await
            .unwrap();
        assert_eq!(tokens.verify_access_token(&issued.access_token).unwrap().sub, 5);

        let result = auth
            .login("test@example.com".to_string(), "WrongPass123".to_string())
            .await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let (auth, _) = service(repo);
        let result = auth
            .login("ghost@example.com".to_string(), "SecurePass123".to_string())
            .await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_verify_marks_account() {
        let mut repo = MockUserRepository::new();
        repo.expect_mark_verified().with(eq(9)).returning(|id| {
            let mut user = test_user(id, "hash".to_string());
            user.is_verified = true;
            Ok(user)
        });

        let (auth, tokens) = service(repo);
        let token = tokens.issue_verification_token(9).unwrap();
        let user = auth.verify(&token).await.unwrap();

        assert_eq!(user.id, 9);
        assert!(user.is_verified);
    }

    #[tokio::test]
    async fn test_verify_failure_kinds() {
        let mut repo = MockUserRepository::new();
        repo.expect_mark_verified().returning(|_| Err(AppError::NotFound));

        let (auth, tokens) = service(repo);

        let malformed = auth.verify("garbage").await.unwrap_err();
        assert_eq!(malformed.kind(), "malformed_token");

        let token = tokens.issue_verification_token(404).unwrap();
        let missing = auth.verify(&token).await.unwrap_err();
        assert!(matches!(missing, VerifyError::UserNotFound(404)));
    }

    #[tokio::test]
    async fn test_authenticate_requires_existing_account() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().with(eq(5)).returning(|_| Ok(None));

        let (auth, tokens) = service(repo);
        let token = tokens
            .issue_access_token(&test_user(5, "hash".to_string()))
            .unwrap()
            .access_token;

        let result = auth.authenticate(&token).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }
}
