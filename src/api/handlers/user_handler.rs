//! User handlers.
//!
//! Every route here sits behind the authentication middleware, so a
//! [`CurrentUser`] is always present in the request extensions.

use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    response::Json,
    routing::get,
    Router,
};

use crate::api::extractors::AccountPath;
use crate::api::AppState;
use crate::domain::{ensure_owner, CurrentUser, UserResponse};
use crate::errors::{AppError, AppResult};
use crate::services::UpdateUserRequest;
use crate::types::{Accepted, Found, NoContent};

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/", get(list_users))
        .route(
            "/users/:id/",
            get(get_user).put(update_user).delete(delete_user),
        )
}

/// List the accounts visible to the caller (only their own)
#[utoipa::path(
    get,
    path = "/users/",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The caller's own account, as a list", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_users(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Found<Vec<UserResponse>>> {
    let users = state.user_service.list(&current_user).await?;
    Ok(Found(users.into_iter().map(UserResponse::from).collect()))
}

/// Get the caller's own account
///
/// The path id is accepted for routing but the caller's record is returned
/// whatever it says.
#[utoipa::path(
    get,
    path = "/users/{id}/",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "The caller's own account", body = UserResponse),
        (status = 400, description = "Id is not an integer or the account could not be loaded"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    id: Result<AccountPath, AppError>,
) -> AppResult<Found<UserResponse>> {
    state.log.record("retrieve", id)?;

    let user = state.user_service.retrieve(&current_user).await?;
    Ok(Found(UserResponse::from(user)))
}

/// Replace the caller's account details
#[utoipa::path(
    put,
    path = "/users/{id}/",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 202, description = "Account updated", body = UserResponse),
        (status = 400, description = "Id is not an integer, validation error or email already registered"),
        (status = 401, description = "Unauthorized or not the caller's account")
    )
)]
pub async fn update_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    id: Result<AccountPath, AppError>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> AppResult<Accepted<UserResponse>> {
    let AccountPath(id) = state.log.record("update", id)?;

    // Non-owners get 401 even when the body does not parse.
    state.log.record("update", ensure_owner(&current_user, id))?;
    let Json(payload) = state.log.record("update", payload.map_err(AppError::from))?;

    let user = state.user_service.update(&current_user, id, payload).await?;
    Ok(Accepted(UserResponse::from(user)))
}

/// Delete the caller's account
#[utoipa::path(
    delete,
    path = "/users/{id}/",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 400, description = "Id is not an integer or the account could not be deleted"),
        (status = 401, description = "Unauthorized or not the caller's account")
    )
)]
pub async fn delete_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    id: Result<AccountPath, AppError>,
) -> AppResult<NoContent> {
    let AccountPath(id) = state.log.record("delete", id)?;
    state.user_service.delete(&current_user, id).await?;
    Ok(NoContent)
}
