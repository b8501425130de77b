//! Transfer network client (Dwolla REST API, HAL+JSON).
//!
//! Every call first exchanges the application key/secret for a short lived
//! bearer token. Created resources are identified by the `Location` header
//! of the `201 Created` response.

use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder, Response,
    header::{ACCEPT, CONTENT_TYPE, LOCATION},
};
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

use super::{
    ClientError, NewCustomer, NewFundingSource, TransferNetwork, TransferParams, TransferResult,
    directory_url, expect_success,
};

const HAL_JSON: &str = "application/vnd.dwolla.v1.hal+json";

/// Transfers are always settled in US dollars.
const TRANSFER_CURRENCY: &str = "USD";

pub struct DwollaClient {
    http: Client,
    base_url: Url,
    key: String,
    secret: String,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    access_token: String,
}

impl DwollaClient {
    pub fn new(
        http: Client,
        base_url: &str,
        key: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            http,
            base_url: directory_url(base_url)?,
            key: key.into(),
            secret: secret.into(),
        })
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    async fn access_token(&self) -> Result<String, ClientError> {
        let response = self
            .http
            .post(self.url("token")?)
            .basic_auth(&self.key, Some(&self.secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let token: TokenBody = expect_success(response).await?.json().await?;
        Ok(token.access_token)
    }

    /// POST a HAL+JSON body and return the created resource's location.
    async fn create(&self, url: Url, body: Value) -> Result<String, ClientError> {
        let token = self.access_token().await?;
        let request = self.http.post(url).bearer_auth(token);
        let response = hal(request).body(body.to_string()).send().await?;

        location(expect_success(response).await?)
    }
}

fn hal(request: RequestBuilder) -> RequestBuilder {
    request
        .header(ACCEPT, HAL_JSON)
        .header(CONTENT_TYPE, HAL_JSON)
}

fn location(response: Response) -> Result<String, ClientError> {
    let raw = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(ClientError::MissingField("location header"))?;

    Ok(Url::parse(raw)?.to_string())
}

fn transfer_body(params: &TransferParams) -> Value {
    json!({
        "_links": {
            "source": { "href": params.source_funding_source_url },
            "destination": { "href": params.destination_funding_source_url },
        },
        "amount": {
            "currency": TRANSFER_CURRENCY,
            "value": params.amount.to_string(),
        },
    })
}

fn funding_source_body(source: &NewFundingSource) -> Value {
    json!({
        "routingNumber": source.routing_number,
        "accountNumber": source.account_number,
        "bankAccountType": source.bank_account_type,
        "name": source.name,
    })
}

#[async_trait]
impl TransferNetwork for DwollaClient {
    async fn create_transfer(
        &self,
        params: &TransferParams,
    ) -> Result<TransferResult, ClientError> {
        let transfer_url = self
            .create(self.url("transfers")?, transfer_body(params))
            .await?;

        Ok(TransferResult { transfer_url })
    }

    async fn create_customer(&self, customer: &NewCustomer) -> Result<String, ClientError> {
        let body = json!({
            "firstName": customer.first_name,
            "lastName": customer.last_name,
            "email": customer.email,
        });

        self.create(self.url("customers")?, body).await
    }

    async fn create_funding_source(
        &self,
        customer_url: &str,
        source: &NewFundingSource,
    ) -> Result<String, ClientError> {
        let url = directory_url(customer_url)?.join("funding-sources")?;

        self.create(url, funding_source_body(source)).await
    }
}
