//! Account service - linked banks and their transactions.

use tracing::{error, info};
use validator::Validate;

use crate::{
    clients::{NewCustomer, NewFundingSource},
    error::AppError,
    models::{
        bank::{ALREADY_LINKED, AccountSummary, AccountsResponse, LinkBankRequest, NewBank},
        transaction::Transaction,
        user::User,
    },
    services::transfer_service::get_bank,
    state::AppState,
};

/// List a user's banks with their sharable ids and balance totals.
pub async fn get_accounts(state: &AppState, user_id: &str) -> Result<AccountsResponse, AppError> {
    let banks = state.store.list_banks(user_id).await?;

    let accounts: Vec<AccountSummary> = banks
        .into_iter()
        .map(|bank| {
            let sharable_id = state.codec.encode(&bank.account_id);
            AccountSummary::new(bank, sharable_id)
        })
        .collect();

    Ok(accounts.into())
}

/// Link a bank account to `user` as a transfer-network funding source.
///
/// # Process
///
/// 1. Validate the request and make sure the account isn't linked yet
/// 2. Create the user's transfer-network customer on first link
/// 3. Create the funding source
/// 4. Persist the bank
///
/// A link that loses a race for the same account id fails with
/// `InvalidRequest`; its funding source URL is logged for cleanup.
pub async fn link_bank_account(
    state: &AppState,
    user: &User,
    request: LinkBankRequest,
) -> Result<AccountSummary, AppError> {
    request.validate()?;

    if state
        .store
        .get_bank_by_account_id(&request.account_id)
        .await?
        .is_some()
    {
        return Err(AppError::InvalidRequest(ALREADY_LINKED.to_string()));
    }

    let customer_url = match &user.transfer_customer_url {
        Some(url) => url.clone(),
        None => {
            let (first_name, last_name) = user.first_and_last_name();
            let url = state
                .transfers
                .create_customer(&NewCustomer {
                    first_name,
                    last_name,
                    email: user.email.clone(),
                })
                .await
                .map_err(AppError::external("transfer"))?;
            state.store.set_transfer_customer(&user.id, &url).await?;
            url
        }
    };

    let funding_source_url = state
        .transfers
        .create_funding_source(
            &customer_url,
            &NewFundingSource {
                name: request.name.clone(),
                routing_number: request.routing_number,
                account_number: request.account_number,
                bank_account_type: request.bank_account_type,
            },
        )
        .await
        .map_err(AppError::external("transfer"))?;

    let bank = state
        .store
        .create_bank(NewBank {
            user_id: user.id.clone(),
            account_id: request.account_id,
            funding_source_url: funding_source_url.clone(),
            name: request.name,
            current_balance_cents: request.current_balance_cents,
            currency: request.currency,
        })
        .await
        .map_err(|e| {
            // A concurrent link of the same account can win the insert
            error!(
                user_id = %user.id,
                funding_source_url = %funding_source_url,
                error = %e,
                "Funding source created but the bank was not saved"
            );
            e
        })?;

    info!(user_id = %user.id, bank_id = %bank.id, "Bank account linked");

    let sharable_id = state.codec.encode(&bank.account_id);
    Ok(AccountSummary::new(bank, sharable_id))
}

/// Transactions sent from or received by one of `user`'s banks, newest first.
pub async fn get_transactions_by_bank(
    state: &AppState,
    user: &User,
    bank_id: &str,
) -> Result<Vec<Transaction>, AppError> {
    let bank = get_bank(state.store.as_ref(), bank_id).await?;
    if bank.user_id != user.id {
        return Err(AppError::BankNotFound);
    }

    state.store.list_transactions_by_bank(&bank.id).await
}
