use sea_orm::DatabaseConnection;

use crate::server::{data::purchase::PurchaseRepository, model::purchase::Purchase};

pub struct PurchaseService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PurchaseService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the purchases of an identity, newest first.
    ///
    /// Purchase history is informational, so a failed fetch is logged and reported as an
    /// empty history rather than failing the request.
    ///
    /// # Arguments
    /// - `user_id` - Durable id of the identity
    ///
    /// # Returns
    /// - `Vec<Purchase>` - Purchases of the identity, empty when none exist or the fetch failed
    pub async fn list_for_user(&self, user_id: i32) -> Vec<Purchase> {
        match PurchaseRepository::new(self.db).get_by_user(user_id).await {
            Ok(purchases) => purchases,
            Err(err) => {
                tracing::warn!("Failed to fetch purchases for user {}: {}", user_id, err);
                Vec::new()
            }
        }
    }
}
