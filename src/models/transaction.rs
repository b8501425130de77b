//! Transaction data models and API response types.
//!
//! This module defines:
//! - `Transaction`: Database entity recorded after a confirmed transfer
//! - `NewTransaction`: the fields the recorder writes

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Category stamped on every bank-to-bank transfer.
pub const TRANSFER_CATEGORY: &str = "Transfer";

/// Represents a transaction record from the database.
///
/// # Database Table
///
/// Maps to the `transactions` table. Each row:
/// - Is written exactly once, after the transfer network accepted the transfer
/// - Is never updated afterwards
/// - Stores the amount as an exact decimal with two places
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,

    /// Human-readable label
    pub name: String,

    /// Amount transferred
    pub amount: Decimal,

    /// Recipient email entered on the form
    pub email: String,

    pub note: String,
    pub category: String,

    pub sender_id: String,
    pub sender_bank_id: String,
    pub receiver_id: String,
    pub receiver_bank_id: String,

    /// Transfer resource on the transfer network
    pub transfer_url: String,

    pub created_at: DateTime<Utc>,
}

/// Fields written by the transaction recorder.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub name: String,
    pub amount: Decimal,
    pub email: String,
    pub note: String,
    pub category: String,
    pub sender_id: String,
    pub sender_bank_id: String,
    pub receiver_id: String,
    pub receiver_bank_id: String,
    pub transfer_url: String,
}
