//! Purchase factory for creating test purchase records.

use crate::factory::helpers::next_id;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating purchases owned by an identity.
pub struct PurchaseFactory<'a> {
    db: &'a DatabaseConnection,
    user_id: i32,
    transaction_id: String,
    package_name: String,
    amount_cents: i64,
    currency: String,
    purchased_at: DateTime<Utc>,
}

impl<'a> PurchaseFactory<'a> {
    /// Creates a new PurchaseFactory with default values.
    ///
    /// Defaults:
    /// - transaction_id: `"txn_{id}"` where id is auto-incremented
    /// - package_name: `"Package {id}"`
    /// - amount_cents: `499`, currency: `"USD"`
    /// - purchased_at: now
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    /// - `user_id` - Identity the purchase belongs to
    pub fn new(db: &'a DatabaseConnection, user_id: i32) -> Self {
        let id = next_id();
        Self {
            db,
            user_id,
            transaction_id: format!("txn_{}", id),
            package_name: format!("Package {}", id),
            amount_cents: 499,
            currency: "USD".to_string(),
            purchased_at: Utc::now(),
        }
    }

    pub fn package_name(mut self, package_name: impl Into<String>) -> Self {
        self.package_name = package_name.into();
        self
    }

    pub fn amount_cents(mut self, amount_cents: i64) -> Self {
        self.amount_cents = amount_cents;
        self
    }

    pub fn purchased_at(mut self, purchased_at: DateTime<Utc>) -> Self {
        self.purchased_at = purchased_at;
        self
    }

    /// Builds and inserts the purchase entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::purchase::Model)` - Created purchase entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::purchase::Model, DbErr> {
        entity::purchase::ActiveModel {
            user_id: ActiveValue::Set(self.user_id),
            transaction_id: ActiveValue::Set(self.transaction_id),
            package_name: ActiveValue::Set(self.package_name),
            amount_cents: ActiveValue::Set(self.amount_cents),
            currency: ActiveValue::Set(self.currency),
            purchased_at: ActiveValue::Set(self.purchased_at),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a purchase with default values for the given identity.
pub async fn create_purchase(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<entity::purchase::Model, DbErr> {
    PurchaseFactory::new(db, user_id).build().await
}
