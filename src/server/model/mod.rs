//! Domain models and operation-specific parameter types.

pub mod purchase;
pub mod user;
