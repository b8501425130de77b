//! In-memory store for testing

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use super::Store;
use crate::{
    clients::mock::CallLog,
    error::AppError,
    models::{
        bank::{ALREADY_LINKED, Bank, NewBank},
        new_document_id,
        transaction::{NewTransaction, Transaction},
        user::{NewUser, User},
    },
};

#[derive(Default)]
pub struct MemoryStore {
    pub users: Mutex<Vec<User>>,
    pub banks: Mutex<Vec<Bank>>,
    pub transactions: Mutex<Vec<Transaction>>,
    pub create_user_count: AtomicUsize,
    pub delete_user_count: AtomicUsize,
    pub fail_create_user: AtomicBool,
    pub fail_create_transaction: AtomicBool,
    pub log: CallLog,
}

fn unavailable() -> AppError {
    AppError::Database(sqlx::Error::PoolTimedOut)
}

impl MemoryStore {
    pub fn insert_user(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }

    pub fn insert_bank(&self, bank: Bank) {
        self.banks.lock().unwrap().push(bank);
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.transactions.lock().unwrap().clone()
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        self.create_user_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_create_user.load(Ordering::SeqCst) {
            return Err(unavailable());
        }

        let user = User {
            id: new_document_id(),
            identity_id: user.identity_id,
            name: user.name,
            email: user.email,
            billing_account_id: user.billing_account_id,
            transfer_customer_url: None,
            image_url: user.image_url,
            created_at: Utc::now(),
        };
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), AppError> {
        self.delete_user_count.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push("delete user profile");
        self.users.lock().unwrap().retain(|u| u.id != user_id);
        Ok(())
    }

    async fn get_user_by_identity_id(&self, identity_id: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.identity_id == identity_id)
            .cloned())
    }

    async fn set_transfer_customer(
        &self,
        user_id: &str,
        customer_url: &str,
    ) -> Result<(), AppError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(AppError::UserNotFound)?;
        user.transfer_customer_url = Some(customer_url.to_string());
        Ok(())
    }

    async fn create_bank(&self, bank: NewBank) -> Result<Bank, AppError> {
        let mut banks = self.banks.lock().unwrap();
        // Mirrors the unique index on banks.account_id
        if banks.iter().any(|b| b.account_id == bank.account_id) {
            return Err(AppError::InvalidRequest(ALREADY_LINKED.to_string()));
        }

        let bank = Bank {
            id: new_document_id(),
            user_id: bank.user_id,
            account_id: bank.account_id,
            funding_source_url: bank.funding_source_url,
            name: bank.name,
            current_balance_cents: bank.current_balance_cents,
            currency: bank.currency,
            created_at: Utc::now(),
        };
        banks.push(bank.clone());
        Ok(bank)
    }

    async fn get_bank(&self, bank_id: &str) -> Result<Option<Bank>, AppError> {
        Ok(self
            .banks
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == bank_id)
            .cloned())
    }

    async fn get_bank_by_account_id(&self, account_id: &str) -> Result<Option<Bank>, AppError> {
        Ok(self
            .banks
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.account_id == account_id)
            .cloned())
    }

    async fn list_banks(&self, user_id: &str) -> Result<Vec<Bank>, AppError> {
        Ok(self
            .banks
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_transaction(
        &self,
        transaction: NewTransaction,
    ) -> Result<Transaction, AppError> {
        if self.fail_create_transaction.load(Ordering::SeqCst) {
            return Err(unavailable());
        }

        let mut transactions = self.transactions.lock().unwrap();
        // Keep insertion order visible through created_at
        let created_at = Utc::now() + Duration::milliseconds(transactions.len() as i64);
        let transaction = Transaction {
            id: new_document_id(),
            name: transaction.name,
            amount: transaction.amount,
            email: transaction.email,
            note: transaction.note,
            category: transaction.category,
            sender_id: transaction.sender_id,
            sender_bank_id: transaction.sender_bank_id,
            receiver_id: transaction.receiver_id,
            receiver_bank_id: transaction.receiver_bank_id,
            transfer_url: transaction.transfer_url,
            created_at,
        };
        transactions.push(transaction.clone());
        Ok(transaction)
    }

    async fn list_transactions_by_bank(
        &self,
        bank_id: &str,
    ) -> Result<Vec<Transaction>, AppError> {
        let mut found: Vec<Transaction> = self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.sender_bank_id == bank_id || t.receiver_bank_id == bank_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }
}
