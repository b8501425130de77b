//! Signup, login and session services.
//!
//! Signup creates resources on three platforms plus the store. Each completed
//! step registers a compensating action; when a later step fails the actions
//! run in reverse order and the original error is returned.

use tracing::{error, info, warn};
use validator::Validate;

use crate::{
    clients::{OnboardingLink, Session},
    error::AppError,
    models::{
        auth::{LoginRequest, LogoutResponse, SignUpRequest, SignUpResponse},
        user::{NewUser, User},
    },
    state::AppState,
};

/// Undo action for one completed signup step.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Compensation {
    DeleteBillingAccount(String),
    DeleteIdentity(String),
    DeleteUser(String),
    DeleteSession(String),
}

impl Compensation {
    async fn run(&self, state: &AppState) -> Result<(), AppError> {
        match self {
            Compensation::DeleteBillingAccount(id) => state
                .billing
                .delete_account(id)
                .await
                .map_err(AppError::external("billing")),
            Compensation::DeleteIdentity(id) => state
                .auth
                .delete_identity(id)
                .await
                .map_err(AppError::external("auth")),
            Compensation::DeleteUser(id) => state.store.delete_user(id).await,
            Compensation::DeleteSession(secret) => state
                .auth
                .delete_session(secret)
                .await
                .map_err(AppError::external("auth")),
        }
    }

    /// Loggable name that never includes a session secret.
    fn label(&self) -> &'static str {
        match self {
            Compensation::DeleteBillingAccount(_) => "delete billing account",
            Compensation::DeleteIdentity(_) => "delete identity",
            Compensation::DeleteUser(_) => "delete user profile",
            Compensation::DeleteSession(_) => "delete session",
        }
    }
}

/// Run compensations newest first. Failures are logged and skipped.
async fn roll_back(state: &AppState, compensations: Vec<Compensation>) {
    for compensation in compensations.into_iter().rev() {
        if let Err(e) = compensation.run(state).await {
            warn!(
                compensation = compensation.label(),
                error = %e,
                "Signup compensation failed, resource left behind"
            );
        }
    }
}

/// Sign up a new user.
///
/// # Process
///
/// 1. Create billing account
/// 2. Create identity at the auth provider
/// 3. Persist the user profile
/// 4. Create a session
/// 5. Fetch the billing onboarding link
///
/// A failing step stops the sequence; the steps already completed are undone.
pub async fn sign_up_user(
    state: &AppState,
    request: SignUpRequest,
) -> Result<SignUpResponse, AppError> {
    request.validate()?;

    let mut compensations = Vec::new();
    match run_sign_up(state, &request, &mut compensations).await {
        Ok((onboarding_link, session)) => {
            info!(identity_id = %session.identity_id, "User signed up");
            Ok(SignUpResponse {
                onboarding_link,
                session,
            })
        }
        Err(e) => {
            error!(
                error = %e,
                completed_steps = compensations.len(),
                "Signup failed, rolling back"
            );
            roll_back(state, compensations).await;
            Err(e)
        }
    }
}

async fn run_sign_up(
    state: &AppState,
    request: &SignUpRequest,
    compensations: &mut Vec<Compensation>,
) -> Result<(OnboardingLink, Session), AppError> {
    let billing_account = state
        .billing
        .create_account(&request.email, &request.tax_id)
        .await
        .map_err(AppError::external("billing"))?;
    compensations.push(Compensation::DeleteBillingAccount(
        billing_account.id.clone(),
    ));

    let identity = state
        .auth
        .create_identity(&request.email, &request.password, &request.name)
        .await
        .map_err(AppError::external("auth"))?;
    compensations.push(Compensation::DeleteIdentity(identity.id.clone()));

    let user = state
        .store
        .create_user(NewUser {
            identity_id: identity.id,
            name: request.name.clone(),
            email: request.email.clone(),
            billing_account_id: billing_account.id.clone(),
            image_url: state.auth.avatar_url(&request.name),
        })
        .await?;
    compensations.push(Compensation::DeleteUser(user.id));

    let session = state
        .auth
        .create_session(&request.email, &request.password)
        .await
        .map_err(AppError::external("auth"))?;
    compensations.push(Compensation::DeleteSession(session.secret.clone()));

    let onboarding_link = state
        .billing
        .create_onboarding_link(&billing_account.id)
        .await
        .map_err(AppError::external("billing"))?;

    Ok((onboarding_link, session))
}

/// Create a session from email and password.
///
/// # Errors
///
/// - `InvalidCredentials`: the auth provider refused the pair
/// - `External`: the auth provider is unreachable or failed
pub async fn login_user(state: &AppState, request: LoginRequest) -> Result<Session, AppError> {
    request.validate()?;

    state
        .auth
        .create_session(&request.email, &request.password)
        .await
        .map_err(|e| {
            if e.is_client_rejection() {
                AppError::InvalidCredentials
            } else {
                AppError::External {
                    provider: "auth",
                    source: e,
                }
            }
        })
}

/// End the session identified by `secret`.
pub async fn logout_account(state: &AppState, secret: &str) -> Result<LogoutResponse, AppError> {
    state
        .auth
        .delete_session(secret)
        .await
        .map_err(AppError::external("auth"))?;

    Ok(LogoutResponse { logged_out: true })
}

/// Resolve the user profile behind a session secret.
///
/// # Errors
///
/// - `Unauthorized`: unknown or expired session
/// - `UserNotFound`: the identity has no profile (signup never completed)
pub async fn get_logged_in_user(state: &AppState, secret: &str) -> Result<User, AppError> {
    let identity = state
        .auth
        .get_current_identity(secret)
        .await
        .map_err(|e| {
            if e.is_client_rejection() {
                AppError::Unauthorized
            } else {
                AppError::External {
                    provider: "auth",
                    source: e,
                }
            }
        })?;

    state
        .store
        .get_user_by_identity_id(&identity.id)
        .await?
        .ok_or(AppError::UserNotFound)
}
