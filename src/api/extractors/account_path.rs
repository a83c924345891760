//! Account id path extractor.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::errors::AppError;

/// The `{id}` segment of an account route.
///
/// Held as `i64` so a numeric id outside the range of stored ids still
/// reaches the ownership check. A segment that is not an integer is a 400
/// in the standard envelope rather than axum's plain-text rejection.
#[derive(Debug, Clone, Copy)]
pub struct AccountPath(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for AccountPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::validation("User id must be an integer"))?;

        Ok(AccountPath(id))
    }
}
