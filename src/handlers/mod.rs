//! HTTP request handlers (route handlers).
//!
//! Handlers only unpack the request and delegate to `services`, which hold
//! the orchestration.

/// Linked banks and their transactions
pub mod accounts;
/// Signup, login, logout and the current profile
pub mod auth;
pub mod health;
pub mod transfers;
