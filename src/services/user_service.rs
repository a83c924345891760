//! User service - Self-service account operations.
//!
//! Every operation acts on the caller's own record. Update and delete take a
//! target id from the request path and refuse it unless it is the caller's.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::OperationLog;
use crate::domain::{ensure_owner, CurrentUser, Password, User, UserChanges};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UserRepository;

/// Replacement account details.
///
/// Fields are optional at the JSON level so that a malformed body from a
/// non-owner is still answered with 401; presence is enforced by validation.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    /// New email address
    #[validate(
        required(message = "Email is required"),
        email(message = "Invalid email format")
    )]
    #[schema(example = "jane@example.com")]
    pub email: Option<String>,
    /// New display name
    #[validate(
        required(message = "Name is required"),
        length(min = 1, message = "Name cannot be empty")
    )]
    #[schema(example = "Jane Doe")]
    pub name: Option<String>,
    /// New password; the current one is kept when omitted
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "NewSecurePass123!", min_length = 8)]
    pub password: Option<String>,
}

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// The caller's own record as a collection
    async fn list(&self, caller: &CurrentUser) -> AppResult<Vec<User>>;

    /// The caller's own record
    async fn retrieve(&self, caller: &CurrentUser) -> AppResult<User>;

    /// Replace the caller's details if `target_id` is theirs
    async fn update(
        &self,
        caller: &CurrentUser,
        target_id: i64,
        changes: UpdateUserRequest,
    ) -> AppResult<User>;

    /// Delete the caller's account if `target_id` is theirs
    async fn delete(&self, caller: &CurrentUser, target_id: i64) -> AppResult<()>;
}

/// Concrete implementation of UserService using the repository.
pub struct UserManager {
    users: Arc<dyn UserRepository>,
    log: OperationLog,
}

impl UserManager {
    pub fn new(users: Arc<dyn UserRepository>, log: OperationLog) -> Self {
        Self { users, log }
    }

    async fn update_inner(
        &self,
        caller: &CurrentUser,
        target_id: i64,
        changes: UpdateUserRequest,
    ) -> AppResult<User> {
        ensure_owner(caller, target_id)?;

        changes.validate()?;

        let (Some(email), Some(name)) = (changes.email, changes.name) else {
            return Err(AppError::validation("Email and name are required"));
        };

        if let Some(existing) = self.users.find_by_email(&email).await? {
            if existing.id != caller.id {
                return Err(AppError::conflict("Email"));
            }
        }

        let password_hash = changes
            .password
            .map(|plain| Password::new(&plain).map(Password::into_string))
            .transpose()?;

        self.users
            .update(
                caller.id,
                UserChanges {
                    email,
                    name,
                    password_hash,
                },
            )
            .await
    }

    async fn delete_inner(&self, caller: &CurrentUser, target_id: i64) -> AppResult<()> {
        ensure_owner(caller, target_id)?;
        self.users.delete(caller.id).await
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn list(&self, caller: &CurrentUser) -> AppResult<Vec<User>> {
        let result = self.users.filter_by_id(caller.id).await;
        self.log.record("list", result)
    }

    async fn retrieve(&self, caller: &CurrentUser) -> AppResult<User> {
        let result = self
            .users
            .find_by_id(caller.id)
            .await
            .and_then(|user| user.ok_or_not_found());
        self.log.record("retrieve", result)
    }

    async fn update(
        &self,
        caller: &CurrentUser,
        target_id: i64,
        changes: UpdateUserRequest,
    ) -> AppResult<User> {
        let result = self.update_inner(caller, target_id, changes).await;
        self.log.record("update", result)
    }

    async fn delete(&self, caller: &CurrentUser, target_id: i64) -> AppResult<()> {
        let result = self.delete_inner(caller, target_id).await;
        if result.is_ok() {
            tracing::info!(user_id = caller.id, "Account deleted");
        }
        self.log.record("delete", result)
    }
}
