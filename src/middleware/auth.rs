//! Session authentication middleware.
//!
//! Every protected request must carry the session secret issued at login or
//! signup. The middleware resolves it to the user's profile and injects an
//! [`AuthContext`] into the request, or rejects the request with HTTP 401.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

use crate::{
    error::AppError, models::user::User, services::auth_service, state::AppState,
};

/// Authentication context attached to authenticated requests.
///
/// Handlers extract it with `Extension<AuthContext>`.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Profile of the logged-in user
    pub user: User,

    /// Session secret the request was made with, needed for logout
    pub session_secret: String,
}

/// Pull the secret out of `Authorization: Bearer <secret>`.
fn bearer_secret(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|secret| !secret.is_empty())
}

/// Session authentication middleware function.
///
/// # Flow
///
/// 1. Extract `Authorization: Bearer <secret>` from the request
/// 2. Resolve the secret to an identity with the auth provider
/// 3. Load the user profile for that identity
/// 4. Inject `AuthContext` and call the next handler
///
/// # Errors
///
/// - `Unauthorized`: header missing or session not accepted
/// - `UserNotFound`: the session is valid but no profile exists
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let secret = bearer_secret(request.headers())
        .ok_or(AppError::Unauthorized)?
        .to_string();

    let user = auth_service::get_logged_in_user(&state, &secret).await?;

    request.extensions_mut().insert(AuthContext {
        user,
        session_secret: secret,
    });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_secret() {
        assert_eq!(bearer_secret(&headers("Bearer secret_1")), Some("secret_1"));
    }

    #[test]
    fn rejects_other_schemes_and_blank_secrets() {
        assert_eq!(bearer_secret(&headers("Basic abc")), None);
        assert_eq!(bearer_secret(&headers("Bearer   ")), None);
        assert_eq!(bearer_secret(&HeaderMap::new()), None);
    }
}
