//! Signup, login and session HTTP handlers.
//!
//! - POST /api/v1/auth/sign-up - Create an account and log in
//! - POST /api/v1/auth/login - Exchange credentials for a session
//! - POST /api/v1/auth/logout - End the current session
//! - GET /api/v1/me - Profile of the logged-in user

use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{
    error::AppError,
    middleware::auth::AuthContext,
    models::{
        auth::{LoginRequest, LoginResponse, LogoutResponse, SignUpRequest, SignUpResponse},
        user::User,
    },
    services::auth_service,
    state::AppState,
};

/// Register a new user.
///
/// # Endpoint
///
/// `POST /api/v1/auth/sign-up`
///
/// # Response
///
/// - **201 Created**: the new session and the billing onboarding link
/// - **400**: validation failed, field messages in `error.fields`
/// - **502**: a collaborator failed; whatever was already created is undone
pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<SignUpResponse>), AppError> {
    let response = auth_service::sign_up_user(&state, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// `POST /api/v1/auth/login`
///
/// Wrong credentials answer 401 with `invalid_credentials`.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let session = auth_service::login_user(&state, request).await?;
    Ok(Json(LoginResponse { session }))
}

/// `POST /api/v1/auth/logout`
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<LogoutResponse>, AppError> {
    let response = auth_service::logout_account(&state, &auth.session_secret).await?;
    Ok(Json(response))
}

/// `GET /api/v1/me`
pub async fn me(Extension(auth): Extension<AuthContext>) -> Json<User> {
    Json(auth.user)
}
