//! Authentication handlers: registration, verification and login.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::UserResponse;
use crate::errors::{AppError, AppResult};
use crate::services::TokenResponse;
use crate::types::{Accepted, ApiResponse, Created, Found};

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// User password (minimum 8 characters)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    /// User display name
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "John Doe")]
    pub name: String,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// User password
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register/", post(register))
        .route("/auth/verify/:token/", post(verify))
        .route("/auth/login/", post(login))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/register/",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered, awaiting verification", body = UserResponse),
        (status = 400, description = "Validation error or email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<ValidatedJson<RegisterRequest>, AppError>,
) -> AppResult<Created<UserResponse>> {
    let ValidatedJson(payload) = state.log.record("register", payload)?;

    let user = state
        .auth_service
        .register(payload.email, payload.password, payload.name)
        .await?;

    Ok(Created(UserResponse::from(user)))
}

/// Verify an account with the token issued for it
#[utoipa::path(
    post,
    path = "/auth/verify/{token}/",
    tag = "Authentication",
    params(
        ("token" = String, Path, description = "Verification token")
    ),
    responses(
        (status = 202, description = "Account verified", body = UserResponse),
        (status = 400, description = "Token malformed, expired or for an unknown account")
    )
)]
pub async fn verify(State(state): State<AppState>, Path(token): Path<String>) -> Response {
    match state.auth_service.verify(&token).await {
        Ok(user) => Accepted(UserResponse::from(user)).into_response(),
        Err(e) => {
            tracing::debug!(kind = e.kind(), "Verification rejected");

            // The reason stays server-side unless explicitly enabled.
            let message = state.verify_detailed_errors.then(|| e.to_string());
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::failure(message))).into_response()
        }
    }
}

/// Login and get an access token
#[utoipa::path(
    post,
    path = "/auth/login/",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<ValidatedJson<LoginRequest>, AppError>,
) -> AppResult<Found<TokenResponse>> {
    let ValidatedJson(payload) = state.log.record("login", payload)?;

    let token = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;

    Ok(Found(token))
}
