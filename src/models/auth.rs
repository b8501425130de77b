//! Signup, login and session request/response types.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::clients::{OnboardingLink, Session};

/// Request body for `POST /api/v1/auth/sign-up`.
///
/// # JSON Example
///
/// ```json
/// {
///   "name": "Ada Lovelace",
///   "email": "ada@example.com",
///   "password": "correct horse battery",
///   "taxId": "123456789"
/// }
/// ```
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    #[validate(length(min = 3, message = "Name is too short"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Social security / tax number forwarded to the billing provider
    #[validate(length(min = 4, max = 11, message = "Please provide a valid tax id"))]
    pub tax_id: String,
}

/// Request body for `POST /api/v1/auth/login`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResponse {
    /// Where the new user finishes billing onboarding
    pub onboarding_link: OnboardingLink,
    /// Session created for the new user
    pub session: Session,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub session: Session,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub logged_out: bool,
}
