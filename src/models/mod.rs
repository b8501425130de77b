//! Data models representing store entities and API request/response types.

/// Signup, login and session payloads
pub mod auth;
/// Linked bank accounts
pub mod bank;
/// Recorded transfers
pub mod transaction;
/// Transfer form submission
pub mod transfer;
/// User profiles
pub mod user;

use uuid::Uuid;

/// Generate an opaque 32 character document id.
pub fn new_document_id() -> String {
    Uuid::new_v4().simple().to_string()
}
