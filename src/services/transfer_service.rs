//! Transfer service - the fund-transfer request pipeline.
//!
//! # Process
//!
//! 1. Validate the form (no store or network access on failure)
//! 2. Parse the amount
//! 3. Decode the recipient's sharable id into an account id
//! 4. Look up the sender bank (must belong to the sender) and the receiver bank
//! 5. Create the transfer on the transfer network
//! 6. Record the transaction
//!
//! Steps run strictly in order and any failure aborts the rest. The only
//! consistency guarantee is sequencing: a transaction is recorded only after
//! the transfer network confirmed the transfer. There is no idempotency key,
//! so resubmitting after a recorder failure starts a second transfer.

use tracing::{error, info, warn};
use validator::Validate;

use crate::{
    clients::TransferParams,
    error::AppError,
    models::{
        bank::Bank,
        transaction::{NewTransaction, TRANSFER_CATEGORY, Transaction},
        transfer::{TransferForm, parse_amount},
        user::User,
    },
    state::AppState,
    store::Store,
};

/// Fetch a bank by record id.
///
/// # Errors
///
/// - `BankNotFound`: no bank has this id
pub async fn get_bank(store: &dyn Store, bank_id: &str) -> Result<Bank, AppError> {
    store
        .get_bank(bank_id)
        .await?
        .ok_or(AppError::BankNotFound)
}

/// Fetch a bank by the institution account id a sharable id decodes to.
pub async fn get_bank_by_account_id(store: &dyn Store, account_id: &str) -> Result<Bank, AppError> {
    store
        .get_bank_by_account_id(account_id)
        .await?
        .ok_or(AppError::BankNotFound)
}

/// Submit a transfer from one of `sender`'s banks to the bank behind the form's sharable id.
///
/// # Returns
///
/// The recorded transaction
///
/// # Errors
///
/// - `Validation`: form rejected, nothing else was attempted
/// - `InvalidRequest`: amount unusable or sender and receiver are the same bank
/// - `InvalidSharableId`: sharable id was not issued by this service
/// - `BankNotFound`: sender bank missing or not owned by `sender`, or no receiver bank
/// - `External`: the transfer network refused or failed; nothing was recorded
/// - `Database`: recording failed after the transfer went through
pub async fn submit_transfer(
    state: &AppState,
    sender: &User,
    form: TransferForm,
) -> Result<Transaction, AppError> {
    form.validate()?;
    let amount = parse_amount(&form.amount)?;

    let receiver_account_id = state.codec.decode(&form.sharable_id).map_err(|e| {
        warn!(user_id = %sender.id, error = %e, "Rejected sharable id");
        AppError::InvalidSharableId
    })?;

    let sender_bank = get_bank(state.store.as_ref(), &form.sender_bank).await?;
    // Report foreign banks exactly like missing ones
    if sender_bank.user_id != sender.id {
        return Err(AppError::BankNotFound);
    }

    let receiver_bank = get_bank_by_account_id(state.store.as_ref(), &receiver_account_id).await?;
    if receiver_bank.id == sender_bank.id {
        return Err(AppError::InvalidRequest(
            "Cannot transfer to same account".to_string(),
        ));
    }

    let params = TransferParams {
        source_funding_source_url: sender_bank.funding_source_url.clone(),
        destination_funding_source_url: receiver_bank.funding_source_url.clone(),
        amount,
    };
    let transfer = state
        .transfers
        .create_transfer(&params)
        .await
        .map_err(AppError::external("transfer"))?;

    info!(
        sender_bank_id = %sender_bank.id,
        receiver_bank_id = %receiver_bank.id,
        amount = %amount,
        transfer_url = %transfer.transfer_url,
        "Transfer created"
    );

    let record = NewTransaction {
        name: format!("Transfer to {}", receiver_bank.name),
        amount,
        email: form.email,
        note: form.transfer_note,
        category: TRANSFER_CATEGORY.to_string(),
        sender_id: sender_bank.user_id,
        sender_bank_id: sender_bank.id,
        receiver_id: receiver_bank.user_id,
        receiver_bank_id: receiver_bank.id,
        transfer_url: transfer.transfer_url.clone(),
    };

    state.store.create_transaction(record).await.map_err(|e| {
        error!(
            transfer_url = %transfer.transfer_url,
            error = %e,
            "Transfer went through but recording the transaction failed"
        );
        e
    })
}
