//! Transfer form submission.
//!
//! The form is validated declaratively before anything touches the store or
//! the network. Field names follow the front-end's camelCase form state.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppError;

/// Payment transfer form.
///
/// # JSON Example
///
/// ```json
/// {
///   "email": "a@b.com",
///   "amount": "12.50",
///   "transferNote": "rent",
///   "senderBank": "bank_123",
///   "sharableId": "YmFua180NTa7Zq3mWc1Pb1Vt-Q"
/// }
/// ```
///
/// # Validation
///
/// - `email`: valid email address
/// - `amount`, `transferNote`, `senderBank`: at least 4 characters
/// - `receiverBank`: at least 4 characters when present
/// - `sharableId`: at least 8 characters
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransferForm {
    /// Recipient email
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 4, message = "Amount is too short"))]
    pub amount: String,

    #[validate(length(min = 4, message = "Transfer note is too short"))]
    pub transfer_note: String,

    /// The recipient's bank comes from `sharable_id`; this selector is only checked for shape.
    #[serde(default)]
    #[validate(length(min = 4, message = "Please select a valid bank account"))]
    pub receiver_bank: Option<String>,

    /// Record id of one of the sender's own banks
    #[validate(length(min = 4, message = "Please select a valid bank account"))]
    pub sender_bank: String,

    #[validate(length(min = 8, message = "Please select a valid sharable Id"))]
    pub sharable_id: String,
}

/// Largest amount a transaction record can hold (`NUMERIC(14, 2)`).
pub fn max_amount() -> Decimal {
    Decimal::new(99_999_999_999_999, 2)
}

/// Parse a form amount into an exact, positive, two-place decimal.
///
/// Amounts the transaction record cannot store are refused here, before any
/// money moves.
pub fn parse_amount(raw: &str) -> Result<Decimal, AppError> {
    let amount = Decimal::from_str(raw.trim())
        .map_err(|_| AppError::InvalidRequest("Amount must be a number".to_string()))?;

    if amount <= Decimal::ZERO {
        return Err(AppError::InvalidRequest(
            "Amount must be positive".to_string(),
        ));
    }
    if amount.scale() > 2 {
        return Err(AppError::InvalidRequest(
            "Amount cannot have more than two decimal places".to_string(),
        ));
    }
    if amount > max_amount() {
        return Err(AppError::InvalidRequest(
            "Amount exceeds the largest supported transfer".to_string(),
        ));
    }

    Ok(amount)
}
