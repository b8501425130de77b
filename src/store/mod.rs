//! Persistence of user profiles, linked banks and transaction records.
//!
//! Services only see the [`Store`] trait; production uses [`PgStore`].

pub mod postgres;

#[cfg(test)]
pub mod memory;

pub use postgres::PgStore;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        bank::{Bank, NewBank},
        transaction::{NewTransaction, Transaction},
        user::{NewUser, User},
    },
};

#[async_trait]
pub trait Store: Send + Sync {
    /// Verify the store is reachable.
    async fn ping(&self) -> Result<(), AppError>;

    async fn create_user(&self, user: NewUser) -> Result<User, AppError>;

    /// Compensation for `create_user` during a failed signup.
    async fn delete_user(&self, user_id: &str) -> Result<(), AppError>;

    async fn get_user_by_identity_id(&self, identity_id: &str) -> Result<Option<User>, AppError>;

    async fn set_transfer_customer(
        &self,
        user_id: &str,
        customer_url: &str,
    ) -> Result<(), AppError>;

    async fn create_bank(&self, bank: NewBank) -> Result<Bank, AppError>;

    /// Look a bank up by its record id.
    async fn get_bank(&self, bank_id: &str) -> Result<Option<Bank>, AppError>;

    /// Look a bank up by the institution account id a sharable id encodes.
    async fn get_bank_by_account_id(&self, account_id: &str) -> Result<Option<Bank>, AppError>;

    /// Banks owned by a user, oldest first.
    async fn list_banks(&self, user_id: &str) -> Result<Vec<Bank>, AppError>;

    /// Append one immutable transaction record.
    async fn create_transaction(&self, transaction: NewTransaction)
    -> Result<Transaction, AppError>;

    /// Transactions where the bank is sender or receiver, newest first.
    async fn list_transactions_by_bank(&self, bank_id: &str)
    -> Result<Vec<Transaction>, AppError>;
}
