use chrono::{DateTime, Utc};

use crate::model::purchase::PurchaseDto;

/// Purchase recorded for an identity by the store integration.
#[derive(Debug, Clone, PartialEq)]
pub struct Purchase {
    pub id: i32,
    pub user_id: i32,
    pub transaction_id: String,
    pub package_name: String,
    pub amount_cents: i64,
    pub currency: String,
    pub purchased_at: DateTime<Utc>,
}

impl Purchase {
    pub fn from_entity(entity: entity::purchase::Model) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            transaction_id: entity.transaction_id,
            package_name: entity.package_name,
            amount_cents: entity.amount_cents,
            currency: entity.currency,
            purchased_at: entity.purchased_at,
        }
    }

    pub fn into_dto(self) -> PurchaseDto {
        PurchaseDto {
            id: self.id,
            transaction_id: self.transaction_id,
            package_name: self.package_name,
            amount_cents: self.amount_cents,
            currency: self.currency,
            purchased_at: self.purchased_at,
        }
    }
}
