//! Billing provider client (Stripe REST API, form encoded).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::{
    BillingAccount, BillingProvider, ClientError, OnboardingLink, directory_url, expect_success,
};

pub struct StripeClient {
    http: Client,
    base_url: Url,
    secret_key: String,
    refresh_url: String,
    return_url: String,
}

#[derive(Debug, Deserialize)]
struct AccountBody {
    id: String,
}

#[derive(Debug, Deserialize)]
struct AccountLinkBody {
    url: String,
    expires_at: i64,
}

impl StripeClient {
    pub fn new(
        http: Client,
        base_url: &str,
        secret_key: impl Into<String>,
        refresh_url: impl Into<String>,
        return_url: impl Into<String>,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            http,
            base_url: directory_url(base_url)?,
            secret_key: secret_key.into(),
            refresh_url: refresh_url.into(),
            return_url: return_url.into(),
        })
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }
}

/// Form fields for an individual custom account able to receive transfers.
fn account_form<'a>(email: &'a str, tax_id: &'a str) -> Vec<(&'static str, &'a str)> {
    vec![
        ("type", "custom"),
        ("country", "US"),
        ("email", email),
        ("business_type", "individual"),
        ("individual[email]", email),
        ("individual[id_number]", tax_id),
        ("capabilities[transfers][requested]", "true"),
    ]
}

#[async_trait]
impl BillingProvider for StripeClient {
    async fn create_account(
        &self,
        email: &str,
        tax_id: &str,
    ) -> Result<BillingAccount, ClientError> {
        let response = self
            .http
            .post(self.url("v1/accounts")?)
            .bearer_auth(&self.secret_key)
            .form(&account_form(email, tax_id))
            .send()
            .await?;

        let account: AccountBody = expect_success(response).await?.json().await?;
        Ok(BillingAccount { id: account.id })
    }

    async fn delete_account(&self, account_id: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("v1/accounts/{account_id}"))?)
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        expect_success(response).await?;
        Ok(())
    }

    async fn create_onboarding_link(
        &self,
        account_id: &str,
    ) -> Result<OnboardingLink, ClientError> {
        let response = self
            .http
            .post(self.url("v1/account_links")?)
            .bearer_auth(&self.secret_key)
            .form(&[
                ("account", account_id),
                ("refresh_url", self.refresh_url.as_str()),
                ("return_url", self.return_url.as_str()),
                ("type", "account_onboarding"),
            ])
            .send()
            .await?;

        let link: AccountLinkBody = expect_success(response).await?.json().await?;
        let expires_at = DateTime::<Utc>::from_timestamp(link.expires_at, 0)
            .ok_or(ClientError::MissingField("expires_at"))?;

        Ok(OnboardingLink {
            url: link.url,
            expires_at,
        })
    }
}
