//! Linked bank account HTTP handlers.
//!
//! - GET /api/v1/accounts - Banks of the authenticated user with totals
//! - POST /api/v1/banks - Link a new bank account
//! - GET /api/v1/banks/{id}/transactions - Transactions of one bank

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    error::AppError,
    middleware::auth::AuthContext,
    models::{
        bank::{AccountSummary, AccountsResponse, LinkBankRequest},
        transaction::Transaction,
    },
    services::account_service,
    state::AppState,
};

/// List the authenticated user's banks.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "data": [
///     {
///       "id": "5f0c...",
///       "accountId": "acc_123",
///       "name": "Everyday Checking",
///       "currentBalanceCents": 10000,
///       "currency": "USD",
///       "sharableId": "YWNjXzEyM..."
///     }
///   ],
///   "totalBanks": 1,
///   "totalCurrentBalanceCents": 10000
/// }
/// ```
pub async fn list_accounts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<AccountsResponse>, AppError> {
    let accounts = account_service::get_accounts(&state, &auth.user.id).await?;
    Ok(Json(accounts))
}

/// Link a bank account as a funding source.
///
/// # Endpoint
///
/// `POST /api/v1/banks`
///
/// # Response
///
/// - **201 Created**: the linked account, including its sharable id
/// - **400**: validation failed or the account is already linked
/// - **502**: the transfer network refused the funding source
pub async fn link_bank(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<LinkBankRequest>,
) -> Result<(StatusCode, Json<AccountSummary>), AppError> {
    let account = account_service::link_bank_account(&state, &auth.user, request).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// `GET /api/v1/banks/{id}/transactions`
///
/// Banks of other users answer 404, the same as unknown ones.
pub async fn list_bank_transactions(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(bank_id): Path<String>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let transactions =
        account_service::get_transactions_by_bank(&state, &auth.user, &bank_id).await?;
    Ok(Json(transactions))
}
