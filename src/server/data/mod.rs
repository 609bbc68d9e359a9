//! Database repository layer for all domain entities.
//!
//! This module contains repository structs that handle database operations for each
//! domain in the application. Repositories use SeaORM entity models internally and return
//! domain models to maintain separation between the data layer and business logic layer.

pub mod purchase;
pub mod user;

#[cfg(test)]
mod test;

use sea_orm::{DbErr, SqlErr};

/// Whether a database error is a unique index violation.
///
/// Provider id uniqueness is enforced by the storage layer, so concurrent logins for the
/// same Steam or Discord account surface here rather than as duplicate rows.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
