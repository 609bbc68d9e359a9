use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDto {
    pub id: i32,
    pub transaction_id: String,
    pub package_name: String,
    pub amount_cents: i64,
    pub currency: String,
    pub purchased_at: DateTime<Utc>,
}
