//! Purchase data repository.
//!
//! Purchases are written by the store integration; the application only reads them
//! back for the identity that owns them.

use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};

use crate::server::model::purchase::Purchase;

/// Repository providing read access to purchase records.
pub struct PurchaseRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PurchaseRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets all purchases belonging to an identity, newest first.
    ///
    /// # Arguments
    /// - `user_id` - Durable id of the owning identity
    ///
    /// # Returns
    /// - `Ok(Vec<Purchase>)` - Purchases ordered by purchase time descending (empty if none)
    /// - `Err(DbErr)` - Database error during query
    pub async fn get_by_user(&self, user_id: i32) -> Result<Vec<Purchase>, DbErr> {
        let entities = entity::prelude::Purchase::find()
            .filter(entity::purchase::Column::UserId.eq(user_id))
            .order_by_desc(entity::purchase::Column::PurchasedAt)
            .order_by_desc(entity::purchase::Column::Id)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Purchase::from_entity).collect())
    }
}
