use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A cached EVE Online alliance
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct AllianceDto {
    /// EVE Online alliance ID
    pub alliance_id: i64,
    pub name: String,
    pub ticker: String,
    /// When the cached copy stops being served without asking ESI
    pub cached_until: NaiveDateTime,
}

/// A cached EVE Online corporation and the alliance it belongs to, if any
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct CorporationDto {
    /// EVE Online corporation ID
    pub corporation_id: i64,
    pub name: String,
    pub ticker: String,
    /// Absent when the corporation is in no alliance or its alliance could not be resolved
    pub alliance: Option<AllianceDto>,
    pub cached_until: NaiveDateTime,
}

/// A cached EVE Online character with its corporation & alliance
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct CharacterDto {
    /// EVE Online character ID
    pub character_id: i64,
    pub name: String,
    pub corporation: CorporationDto,
    pub cached_until: NaiveDateTime,
}
