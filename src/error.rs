//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::clients::ClientError;

/// A single rejected form field and the message to show next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Application-wide error type.
///
/// Every orchestration function returns `Result<_, AppError>` so callers can
/// branch on the kind of failure instead of guessing from a missing value.
///
/// # Error Categories
///
/// - **Validation Errors**: Form input rejected before any network call
/// - **Decode Errors**: Sharable account id not produced by this service
/// - **Resource Errors**: Bank or user lookup found nothing
/// - **External Errors**: Auth, billing or transfer platform call failed
/// - **Database Errors**: Any sqlx::Error from store operations
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// One or more form fields failed validation.
    ///
    /// Returns HTTP 400 Bad Request with the per-field messages.
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Request body is well formed but semantically unusable.
    #[error("Invalid request")]
    InvalidRequest(String),

    /// The sharable account id could not be decoded.
    ///
    /// Not retryable: the same input will always fail.
    #[error("Invalid sharable account id")]
    InvalidSharableId,

    /// Email/password pair was rejected by the auth provider.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Missing, expired or unknown session.
    #[error("Not authenticated")]
    Unauthorized,

    /// No bank record matches the lookup (or it belongs to someone else).
    #[error("Bank account not found")]
    BankNotFound,

    /// The authenticated identity has no user profile.
    #[error("User not found")]
    UserNotFound,

    /// A collaborator platform call failed.
    ///
    /// Returns HTTP 502 Bad Gateway; the upstream body is logged, not returned.
    #[error("{provider} service call failed: {source}")]
    External {
        provider: &'static str,
        #[source]
        source: ClientError,
    },
}

impl AppError {
    pub fn external(provider: &'static str) -> impl FnOnce(ClientError) -> AppError {
        move |source| AppError::External { provider, source }
    }
}

/// Request bodies are camelCase; report fields under the same names.
fn json_field_name(field: &str) -> String {
    let mut name = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = !name.is_empty();
        } else if upper_next {
            name.extend(c.to_uppercase());
            upper_next = false;
        } else {
            name.push(c);
        }
    }
    name
}

/// Collect every field-level message from a failed `validate()` call.
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = json_field_name(field);
                errs.iter().map(move |e| FieldError {
                    field: field.clone(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", e.code)),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));

        AppError::Validation(fields)
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message",
///     "fields": [{ "field": "amount", "message": "Amount is too short" }]
///   }
/// }
/// ```
///
/// `fields` is only present for validation failures.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                "validation_failed",
                self.to_string(),
            ),
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::InvalidSharableId => (
                StatusCode::BAD_REQUEST,
                "invalid_sharable_id",
                self.to_string(),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                self.to_string(),
            ),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", self.to_string()),
            AppError::BankNotFound => (StatusCode::NOT_FOUND, "bank_not_found", self.to_string()),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "user_not_found", self.to_string()),
            AppError::External { provider, source } => {
                tracing::error!(provider, error = %source, "External call failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "external_service_error",
                    format!("The {provider} service is unavailable"),
                )
            }
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let AppError::Validation(fields) = &self {
            error["fields"] = json!(fields);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
