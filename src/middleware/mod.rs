//! HTTP middleware components.
//!
//! Middleware run before route handlers and may short-circuit a request,
//! for example rejecting one without a valid session.

/// Session authentication middleware
pub mod auth;
