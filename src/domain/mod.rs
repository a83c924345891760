//! Domain layer - Core business entities and logic
//!
//! Contains the account entity, the password value object and the
//! authenticated caller identity together with the ownership rule.

pub mod identity;
pub mod password;
pub mod user;

pub use identity::{ensure_owner, CurrentUser};
pub use password::Password;
pub use user::{NewUser, User, UserChanges, UserResponse};
