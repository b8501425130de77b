//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to deserialize environment variables into a type-safe struct.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `AUTH_ENDPOINT`, `AUTH_PROJECT_ID`, `AUTH_API_KEY` (required): auth/session provider
/// - `BILLING_API_URL` (optional), `BILLING_SECRET_KEY` (required): billing provider
/// - `ONBOARDING_REFRESH_URL`, `ONBOARDING_RETURN_URL` (required): where the
///   billing provider sends users during onboarding
/// - `TRANSFER_API_URL` (optional), `TRANSFER_KEY`, `TRANSFER_SECRET` (required): transfer network
/// - `SHARABLE_ID_SECRET` (required): key for signing sharable account ids
/// - `EXTERNAL_TIMEOUT_SECS` (optional): outbound HTTP timeout, defaults to 10
/// - `CORS_ORIGINS` (optional): comma separated list of allowed browser origins
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    pub auth_endpoint: String,
    pub auth_project_id: String,
    pub auth_api_key: String,

    #[serde(default = "default_billing_api_url")]
    pub billing_api_url: String,
    pub billing_secret_key: String,
    pub onboarding_refresh_url: String,
    pub onboarding_return_url: String,

    #[serde(default = "default_transfer_api_url")]
    pub transfer_api_url: String,
    pub transfer_key: String,
    pub transfer_secret: String,

    pub sharable_id_secret: String,

    #[serde(default = "default_external_timeout_secs")]
    pub external_timeout_secs: u64,

    #[serde(default)]
    pub cors_origins: String,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

fn default_billing_api_url() -> String {
    "https://api.stripe.com/".to_string()
}

fn default_transfer_api_url() -> String {
    "https://api-sandbox.dwolla.com/".to_string()
}

fn default_external_timeout_secs() -> u64 {
    10
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., DATABASE_URL)
    /// - Environment variable values cannot be parsed into expected types
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Field names are automatically converted: database_url -> DATABASE_URL
        envy::from_env::<Config>()
    }

    /// Browser origins allowed by the CORS layer.
    pub fn allowed_origins(&self) -> Vec<String> {
        self.cors_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }
}
