//! Fund transfer HTTP handler.

use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{
    error::AppError,
    middleware::auth::AuthContext,
    models::{transaction::Transaction, transfer::TransferForm},
    services::transfer_service,
    state::AppState,
};

/// Transfer funds to the bank behind a sharable id.
///
/// # Endpoint
///
/// `POST /api/v1/transfers`
///
/// # Request Body
///
/// ```json
/// {
///   "email": "friend@example.com",
///   "amount": "12.50",
///   "transferNote": "rent",
///   "senderBank": "bank_123",
///   "sharableId": "YWNjXzQ1N..."
/// }
/// ```
///
/// # Response
///
/// - **201 Created**: the recorded transaction
/// - **400**: validation failed, bad amount, bad sharable id or same bank
/// - **404**: sender or receiver bank not found
/// - **502**: the transfer network failed; nothing was recorded
pub async fn create_transfer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(form): Json<TransferForm>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let transaction = transfer_service::submit_transfer(&state, &auth.user, form).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}
