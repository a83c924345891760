//! Authenticated caller identity and the ownership rule built on it.

use crate::errors::{AppError, AppResult};

use super::User;

/// Authenticated caller resolved from an access token.
///
/// Lives only for the duration of one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i32,
    pub email: String,
}

impl CurrentUser {
    /// Whether the caller owns the account with the given id.
    ///
    /// Ids are compared as `i64`, so an id no account can have is simply
    /// not the caller's.
    pub fn owns(&self, target_id: i64) -> bool {
        i64::from(self.id) == target_id
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
        }
    }
}

/// Allow an operation only on the caller's own account.
///
/// Returns [`AppError::NotOwner`] when `target_id` is someone else's.
pub fn ensure_owner(caller: &CurrentUser, target_id: i64) -> AppResult<()> {
    if caller.owns(target_id) {
        Ok(())
    } else {
        Err(AppError::NotOwner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(id: i32) -> CurrentUser {
        CurrentUser {
            id,
            email: format!("user{}@example.com", id),
        }
    }

    #[test]
    fn test_owner_allowed() {
        assert!(ensure_owner(&caller(5), 5).is_ok());
    }

    #[test]
    fn test_other_account_denied() {
        let result = ensure_owner(&caller(5), 7);
        assert!(matches!(result, Err(AppError::NotOwner)));
    }

    #[test]
    fn test_id_beyond_i32_is_never_owned() {
        let result = ensure_owner(&caller(5), 99_999_999_999);
        assert!(matches!(result, Err(AppError::NotOwner)));
        assert!(ensure_owner(&caller(i32::MAX), i64::from(i32::MAX)).is_ok());
    }

    #[test]
    fn test_negative_and_zero_ids_compare_exactly() {
        assert!(ensure_owner(&caller(0), 0).is_ok());
        assert!(ensure_owner(&caller(1), -1).is_err());
    }
}
