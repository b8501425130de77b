//! Bank account data models and API request/response types.
//!
//! This module defines:
//! - `Bank`: Database entity representing a linked bank account
//! - `LinkBankRequest`: Request body for linking a bank account
//! - `AccountSummary` / `AccountsResponse`: what the accounts page shows

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::clients::BankAccountType;

/// Message for linking an account id that already has a bank record.
pub const ALREADY_LINKED: &str = "This bank account is already linked";

/// Represents a linked bank account from the database.
///
/// # Balance Storage
///
/// Balances are a snapshot stored as `i64` cents; transfers do not change
/// them locally, the transfer network owns the money.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bank {
    pub id: String,

    /// Owning user
    pub user_id: String,

    /// Institution account identifier. This is what a sharable id encodes.
    pub account_id: String,

    /// Funding source on the transfer network
    pub funding_source_url: String,

    pub name: String,
    pub current_balance_cents: i64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

/// Fields written when linking a bank account.
#[derive(Debug, Clone)]
pub struct NewBank {
    pub user_id: String,
    pub account_id: String,
    pub funding_source_url: String,
    pub name: String,
    pub current_balance_cents: i64,
    pub currency: String,
}

/// Request body for linking a bank account.
///
/// # JSON Example
///
/// ```json
/// {
///   "accountId": "vzeNDwK7KQIm4yEog683uElbp9GRLEFXGK98D",
///   "name": "Everyday Checking",
///   "routingNumber": "222222226",
///   "accountNumber": "123456789",
///   "bankAccountType": "checking",
///   "currentBalanceCents": 110000
/// }
/// ```
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LinkBankRequest {
    #[validate(length(min = 4, message = "Please provide a valid account id"))]
    pub account_id: String,

    #[validate(length(min = 1, max = 100, message = "Please name this bank account"))]
    pub name: String,

    #[validate(length(equal = 9, message = "Routing number must be 9 digits"))]
    pub routing_number: String,

    #[validate(length(min = 4, max = 17, message = "Please provide a valid account number"))]
    pub account_number: String,

    pub bank_account_type: BankAccountType,

    #[serde(default)]
    #[validate(range(min = 0, message = "Balance cannot be negative"))]
    pub current_balance_cents: i64,

    #[serde(default = "default_currency")]
    pub currency: String,
}

/// Default currency value when not specified in request.
fn default_currency() -> String {
    "USD".to_string()
}

/// One bank account as shown to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: String,
    pub account_id: String,
    pub name: String,
    pub current_balance_cents: i64,
    pub currency: String,
    /// Reference other users paste into the transfer form
    pub sharable_id: String,
}

impl AccountSummary {
    pub fn new(bank: Bank, sharable_id: String) -> Self {
        Self {
            id: bank.id,
            account_id: bank.account_id,
            name: bank.name,
            current_balance_cents: bank.current_balance_cents,
            currency: bank.currency,
            sharable_id,
        }
    }
}

/// Response body for `GET /api/v1/accounts`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountsResponse {
    pub data: Vec<AccountSummary>,
    pub total_banks: usize,
    pub total_current_balance_cents: i64,
}

impl From<Vec<AccountSummary>> for AccountsResponse {
    fn from(data: Vec<AccountSummary>) -> Self {
        Self {
            total_banks: data.len(),
            total_current_balance_cents: data.iter().map(|a| a.current_balance_cents).sum(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_request_defaults_and_validation() {
        let request: LinkBankRequest = serde_json::from_str(
            r#"{"accountId":"acc_1234","name":"Checking","routingNumber":"222222226",
                "accountNumber":"123456789","bankAccountType":"checking"}"#,
        )
        .unwrap();

        assert_eq!(request.currency, "USD");
        assert_eq!(request.current_balance_cents, 0);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn short_routing_number_is_rejected() {
        let request: LinkBankRequest = serde_json::from_str(
            r#"{"accountId":"acc_1234","name":"Checking","routingNumber":"2222",
                "accountNumber":"123456789","bankAccountType":"savings"}"#,
        )
        .unwrap();

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("routing_number"));
    }

    #[test]
    fn totals_sum_every_account() {
        let summary = |id: &str, cents| AccountSummary {
            id: id.to_string(),
            account_id: format!("acc_{id}"),
            name: "Bank".to_string(),
            current_balance_cents: cents,
            currency: "USD".to_string(),
            sharable_id: String::new(),
        };
        let response = AccountsResponse::from(vec![summary("a", 1_000), summary("b", 2_550)]);

        assert_eq!(response.total_banks, 2);
        assert_eq!(response.total_current_balance_cents, 3_550);
    }
}
