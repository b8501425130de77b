//! Auth provider client (Appwrite REST API).
//!
//! Identities are created with the server API key; session-scoped calls
//! (`/account`) carry the session secret in `X-Appwrite-Session`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use super::{AuthProvider, ClientError, Identity, Session, directory_url, expect_success};

const PROJECT_HEADER: &str = "X-Appwrite-Project";
const KEY_HEADER: &str = "X-Appwrite-Key";
const SESSION_HEADER: &str = "X-Appwrite-Session";

pub struct AppwriteClient {
    http: Client,
    endpoint: Url,
    project_id: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct UserBody {
    #[serde(rename = "$id")]
    id: String,
    email: String,
    name: String,
}

impl From<UserBody> for Identity {
    fn from(user: UserBody) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionBody {
    #[serde(rename = "$id")]
    id: String,
    user_id: String,
    secret: String,
    expire: DateTime<Utc>,
}

impl AppwriteClient {
    /// `endpoint` is the API root, e.g. `https://cloud.appwrite.io/v1`.
    pub fn new(
        http: Client,
        endpoint: &str,
        project_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            http,
            endpoint: directory_url(endpoint)?,
            project_id: project_id.into(),
            api_key: api_key.into(),
        })
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.endpoint.join(path)?)
    }
}

#[async_trait]
impl AuthProvider for AppwriteClient {
    async fn create_identity(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Identity, ClientError> {
        let response = self
            .http
            .post(self.url("users")?)
            .header(PROJECT_HEADER, &self.project_id)
            .header(KEY_HEADER, &self.api_key)
            .json(&json!({
                "userId": "unique()",
                "email": email,
                "password": password,
                "name": name,
            }))
            .send()
            .await?;

        let user: UserBody = expect_success(response).await?.json().await?;
        Ok(user.into())
    }

    async fn delete_identity(&self, identity_id: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("users/{identity_id}"))?)
            .header(PROJECT_HEADER, &self.project_id)
            .header(KEY_HEADER, &self.api_key)
            .send()
            .await?;

        expect_success(response).await?;
        Ok(())
    }

    async fn create_session(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        // The server key makes the provider include the session secret in the body
        let response = self
            .http
            .post(self.url("account/sessions/email")?)
            .header(PROJECT_HEADER, &self.project_id)
            .header(KEY_HEADER, &self.api_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let session: SessionBody = expect_success(response).await?.json().await?;
        if session.secret.is_empty() {
            return Err(ClientError::MissingField("session secret"));
        }

        Ok(Session {
            id: session.id,
            identity_id: session.user_id,
            secret: session.secret,
            expires_at: session.expire,
        })
    }

    async fn delete_session(&self, secret: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url("account/sessions/current")?)
            .header(PROJECT_HEADER, &self.project_id)
            .header(SESSION_HEADER, secret)
            .send()
            .await?;

        expect_success(response).await?;
        Ok(())
    }

    async fn get_current_identity(&self, secret: &str) -> Result<Identity, ClientError> {
        let response = self
            .http
            .get(self.url("account")?)
            .header(PROJECT_HEADER, &self.project_id)
            .header(SESSION_HEADER, secret)
            .send()
            .await?;

        let user: UserBody = expect_success(response).await?.json().await?;
        Ok(user.into())
    }

    fn avatar_url(&self, name: &str) -> String {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map(|mut segments| {
                segments.pop_if_empty().extend(["avatars", "initials"]);
            })
            .ok();
        url.query_pairs_mut()
            .append_pair("name", name)
            .append_pair("project", &self.project_id);
        url.to_string()
    }
}
