//! Service Container - Wires repositories, tokens and logging into services.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, JwtTokens, OperationLog, TokenService, UserManager, UserService,
};
use crate::config::Config;
use crate::infra::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;

    /// Get token service
    fn tokens(&self) -> Arc<dyn TokenService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    token_service: Arc<dyn TokenService>,
}

impl Services {
    /// Build every service on top of one repository and token issuer.
    ///
    /// Each service gets its own span so failures are attributed to it.
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<dyn TokenService>) -> Self {
        let auth_service = Arc::new(Authenticator::new(
            users.clone(),
            tokens.clone(),
            OperationLog::new(tracing::info_span!("auth")),
        ));
        let user_service = Arc::new(UserManager::new(
            users,
            OperationLog::new(tracing::info_span!("accounts")),
        ));

        Self {
            auth_service,
            user_service,
            token_service: tokens,
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: &Config) -> Self {
        Self::new(
            Arc::new(UserStore::new(db)),
            Arc::new(JwtTokens::from_config(config)),
        )
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn tokens(&self) -> Arc<dyn TokenService> {
        self.token_service.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CurrentUser;
    use crate::infra::MockUserRepository;

    const SECRET: &[u8] = b"test-secret-key-for-testing-only-32chars";

    #[tokio::test]
    async fn test_services_share_repository_and_tokens() {
        let mut repo = MockUserRepository::new();
        repo.expect_filter_by_id().returning(|_| Ok(vec![]));

        let services = Services::new(Arc::new(repo), Arc::new(JwtTokens::new(SECRET, 1, 48)));

        let token = services.tokens().issue_verification_token(3).unwrap();
        assert_eq!(services.tokens().resolve_verification_token(&token).unwrap(), 3);

        let caller = CurrentUser {
            id: 3,
            email: "a@example.com".to_string(),
        };
        assert!(services.users().list(&caller).await.unwrap().is_empty());
    }
}
