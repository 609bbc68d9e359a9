//! Factory methods for creating test data.
//!
//! Each entity has its own factory module with both a `Factory` struct for customization
//! and `create_*` convenience functions for quick default creation.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), sea_orm::DbErr> {
//!     let db = /* ... */;
//!
//!     let steam_only = factory::user::create_steam_user(&db, "76561197960287930").await?;
//!     let purchase = factory::purchase::create_purchase(&db, steam_only.id).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Customization
//!
//! ```rust,ignore
//! let user = factory::user::UserFactory::new(&db)
//!     .steam_id("76561197960287930")
//!     .discord_id("80351110224678912")
//!     .created_at(Utc::now() - Duration::hours(1))
//!     .build()
//!     .await?;
//! ```

pub mod helpers;
pub mod purchase;
pub mod user;

pub use purchase::create_purchase;
pub use user::{create_discord_user, create_linked_user, create_steam_user, create_user};
