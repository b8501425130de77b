//! Business logic services.
//!
//! Services contain the orchestration separated from HTTP handlers. Each one
//! takes the collaborator handles in `AppState` explicitly and returns a
//! typed `AppError` on failure.

pub mod account_service;
pub mod auth_service;
pub mod transfer_service;
