//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill the
//! account use cases. They depend on abstractions (traits) so the HTTP layer
//! and tests can swap implementations.

mod auth_service;
pub mod container;
mod operation_log;
mod token_service;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, VerifyError};
pub use operation_log::OperationLog;
pub use token_service::{Claims, JwtTokens, TokenResponse, TokenService};
pub use user_service::{UpdateUserRequest, UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
