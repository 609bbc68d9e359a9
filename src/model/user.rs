use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The currently authenticated identity as exposed to the front end.
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i32,
    pub steam_id: Option<String>,
    pub steam_name: Option<String>,
    pub is_fully_authenticated: bool,
}
