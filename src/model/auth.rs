use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The character currently logged in with EVE Online SSO
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct UserDto {
    /// Account the character belongs to
    pub account_id: i32,
    /// EVE Online character ID
    pub character_id: i64,
    /// EVE Online character name
    pub character_name: String,
}
