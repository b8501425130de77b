//! Collaborator platform clients.
//!
//! Every external platform sits behind a trait so the orchestration
//! services can be exercised without a live network:
//!
//! - [`AuthProvider`]: identities and sessions
//! - [`BillingProvider`]: billing accounts and onboarding links
//! - [`TransferNetwork`]: customers, funding sources and transfers

pub mod appwrite;
pub mod dwolla;
pub mod stripe;

pub use appwrite::AppwriteClient;
pub use dwolla::DwollaClient;
pub use stripe::StripeClient;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Failure of a single outbound platform call.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Connection, timeout or body decoding failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform answered with a non-success status.
    #[error("rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// A success response lacked something we need.
    #[error("response is missing {0}")]
    MissingField(&'static str),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ClientError {
    /// True when the platform refused the caller's credentials or input.
    pub fn is_client_rejection(&self) -> bool {
        matches!(self, ClientError::Rejected { status, .. } if (400..500).contains(status))
    }
}

/// Pass success responses through, turn everything else into `Rejected`.
pub(crate) async fn expect_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Rejected {
        status: status.as_u16(),
        body,
    })
}

/// Parse a base URL so that `join` appends instead of replacing the last segment.
pub(crate) fn directory_url(raw: &str) -> Result<url::Url, url::ParseError> {
    if raw.ends_with('/') {
        url::Url::parse(raw)
    } else {
        url::Url::parse(&format!("{raw}/"))
    }
}

/// Account held by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// Authenticated session issued by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub identity_id: String,
    /// Bearer token presented on later requests.
    pub secret: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingAccount {
    pub id: String,
}

/// URL where a new billing account finishes compliance setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingLink {
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

/// Arguments of a single money movement between two funding sources.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferParams {
    pub source_funding_source_url: String,
    pub destination_funding_source_url: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferResult {
    /// Location of the created transfer on the network.
    pub transfer_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BankAccountType {
    Checking,
    Savings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFundingSource {
    pub name: String,
    pub routing_number: String,
    pub account_number: String,
    pub bank_account_type: BankAccountType,
}

/// Identity and session operations of the auth provider.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn create_identity(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Identity, ClientError>;

    /// Compensation for `create_identity`.
    async fn delete_identity(&self, identity_id: &str) -> Result<(), ClientError>;

    async fn create_session(&self, email: &str, password: &str) -> Result<Session, ClientError>;

    async fn delete_session(&self, secret: &str) -> Result<(), ClientError>;

    /// Resolve the identity owning a session secret.
    async fn get_current_identity(&self, secret: &str) -> Result<Identity, ClientError>;

    /// Generated initials avatar for a display name.
    fn avatar_url(&self, name: &str) -> String;
}

/// Connected-account operations of the billing provider.
#[async_trait]
pub trait BillingProvider: Send + Sync {
    async fn create_account(&self, email: &str, tax_id: &str)
    -> Result<BillingAccount, ClientError>;

    /// Compensation for `create_account`.
    async fn delete_account(&self, account_id: &str) -> Result<(), ClientError>;

    async fn create_onboarding_link(&self, account_id: &str)
    -> Result<OnboardingLink, ClientError>;
}

/// Money movement on the transfer network.
#[async_trait]
pub trait TransferNetwork: Send + Sync {
    async fn create_transfer(&self, params: &TransferParams)
    -> Result<TransferResult, ClientError>;

    /// Returns the customer URL.
    async fn create_customer(&self, customer: &NewCustomer) -> Result<String, ClientError>;

    /// Returns the funding source URL.
    async fn create_funding_source(
        &self,
        customer_url: &str,
        source: &NewFundingSource,
    ) -> Result<String, ClientError>;
}
