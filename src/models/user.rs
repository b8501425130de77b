//! User profile model.
//!
//! The profile links the auth provider identity to the billing account and
//! (once a bank has been linked) the transfer-network customer.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Represents a user record from the database.
///
/// # Database Table
///
/// Maps to the `users` table. The password is not a column: it is held,
/// hashed, by the auth provider only.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,

    /// Account id at the auth provider
    pub identity_id: String,

    pub name: String,
    pub email: String,

    /// Connected account at the billing provider
    pub billing_account_id: String,

    /// Customer resource on the transfer network, created on first bank link
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_customer_url: Option<String>,

    /// Avatar reference
    pub image_url: String,

    pub created_at: DateTime<Utc>,
}

impl User {
    /// Split the display name for the transfer network's customer record.
    pub fn first_and_last_name(&self) -> (String, String) {
        let mut parts = self.name.split_whitespace();
        let first = parts.next().unwrap_or_default().to_string();
        let rest = parts.collect::<Vec<_>>().join(" ");
        let last = if rest.is_empty() { first.clone() } else { rest };
        (first, last)
    }
}

/// Fields written when persisting a freshly signed up user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub identity_id: String,
    pub name: String,
    pub email: String,
    pub billing_account_id: String,
    pub image_url: String,
}
