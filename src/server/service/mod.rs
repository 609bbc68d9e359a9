//! Service layer for business logic and orchestration.
//!
//! Services sit between the controller (API) layer and the data (repository) layer.
//! They are responsible for:
//!
//! - **Identity linking**: Resolving a provider login to exactly one identity
//! - **Provider adapters**: Running the Steam OpenID and Discord OAuth2 exchanges
//! - **Domain Models**: Working with domain models rather than DTOs or entity models

pub mod identity;
pub mod oauth;
pub mod purchase;
