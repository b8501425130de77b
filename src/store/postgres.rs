//! PostgreSQL store.

use async_trait::async_trait;

use super::Store;
use crate::{
    db::DbPool,
    error::AppError,
    models::{
        bank::{ALREADY_LINKED, Bank, NewBank},
        new_document_id,
        transaction::{NewTransaction, Transaction},
        user::{NewUser, User},
    },
};

pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, identity_id, name, email, billing_account_id, image_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(new_document_id())
        .bind(user.identity_id)
        .bind(user.name)
        .bind(user.email)
        .bind(user.billing_account_id)
        .bind(user.image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_user_by_identity_id(&self, identity_id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE identity_id = $1")
            .bind(identity_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn set_transfer_customer(
        &self,
        user_id: &str,
        customer_url: &str,
    ) -> Result<(), AppError> {
        let updated = sqlx::query("UPDATE users SET transfer_customer_url = $1 WHERE id = $2")
            .bind(customer_url)
            .bind(user_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if updated == 0 {
            return Err(AppError::UserNotFound);
        }

        Ok(())
    }

    async fn create_bank(&self, bank: NewBank) -> Result<Bank, AppError> {
        let bank = sqlx::query_as::<_, Bank>(
            r#"
            INSERT INTO banks (
                id,
                user_id,
                account_id,
                funding_source_url,
                name,
                current_balance_cents,
                currency
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(new_document_id())
        .bind(bank.user_id)
        .bind(bank.account_id)
        .bind(bank.funding_source_url)
        .bind(bank.name)
        .bind(bank.current_balance_cents)
        .bind(bank.currency)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let unique_violation = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if unique_violation {
                AppError::InvalidRequest(ALREADY_LINKED.to_string())
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(bank)
    }

    async fn get_bank(&self, bank_id: &str) -> Result<Option<Bank>, AppError> {
        let bank = sqlx::query_as::<_, Bank>("SELECT * FROM banks WHERE id = $1")
            .bind(bank_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(bank)
    }

    async fn get_bank_by_account_id(&self, account_id: &str) -> Result<Option<Bank>, AppError> {
        let bank = sqlx::query_as::<_, Bank>("SELECT * FROM banks WHERE account_id = $1")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(bank)
    }

    async fn list_banks(&self, user_id: &str) -> Result<Vec<Bank>, AppError> {
        let banks = sqlx::query_as::<_, Bank>(
            "SELECT * FROM banks WHERE user_id = $1 ORDER BY created_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(banks)
    }

    async fn create_transaction(
        &self,
        transaction: NewTransaction,
    ) -> Result<Transaction, AppError> {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (
                id,
                name,
                amount,
                email,
                note,
                category,
                sender_id,
                sender_bank_id,
                receiver_id,
                receiver_bank_id,
                transfer_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(new_document_id())
        .bind(transaction.name)
        .bind(transaction.amount)
        .bind(transaction.email)
        .bind(transaction.note)
        .bind(transaction.category)
        .bind(transaction.sender_id)
        .bind(transaction.sender_bank_id)
        .bind(transaction.receiver_id)
        .bind(transaction.receiver_bank_id)
        .bind(transaction.transfer_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(transaction)
    }

    async fn list_transactions_by_bank(
        &self,
        bank_id: &str,
    ) -> Result<Vec<Transaction>, AppError> {
        let transactions = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT * FROM transactions
            WHERE sender_bank_id = $1 OR receiver_bank_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(bank_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }
}
