//! HTTP request handlers.
//!
//! Controllers check access through `AuthGuard`, call into the service layer and
//! convert domain models into DTOs.

pub mod auth;
pub mod health;
pub mod purchase;
