//! EVE Online cache models.

use chrono::{DateTime, Utc};

use crate::model::eve::{AllianceDto, CharacterDto, CorporationDto};

/// The kinds of entity mirrored from ESI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// `/alliances/{alliance_id}`
    Alliance,
    /// `/corporations/{corporation_id}`
    Corporation,
    /// `/characters/{character_id}`
    Character,
}

/// Outcome of a conditional ESI request.
#[derive(Debug, Clone, PartialEq)]
pub enum EsiFetch<T> {
    /// ESI answered 304, the ETag sent still matches
    NotModified,
    /// ESI answered 404
    NotFound,
    /// ESI answered 200 with a new copy
    Fresh(Fetched<T>),
}

/// A fresh ESI model with its cache headers.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    /// Deserialized response body
    pub model: T,
    /// `ETag` header, sent back as `If-None-Match` on the next request
    pub etag: Option<String>,
    /// `Expires` header, when ESI will serve a new copy
    pub expires: Option<DateTime<Utc>>,
}

/// A cached corporation and its alliance, if it is in one.
#[derive(Debug, Clone, PartialEq)]
pub struct Corporation {
    /// Stored corporation row
    pub corporation: entity::eve_corporation::Model,
    /// Stored alliance row the corporation points at
    pub alliance: Option<entity::eve_alliance::Model>,
}

/// A cached character with its corporation resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    /// Stored character row
    pub character: entity::eve_character::Model,
    /// The character's corporation and alliance
    pub corporation: Corporation,
}

/// An entity of any [`EntityKind`] with its references resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedEntity {
    /// A resolved alliance
    Alliance(entity::eve_alliance::Model),
    /// A resolved corporation
    Corporation(Corporation),
    /// A resolved character
    Character(Character),
}

impl From<entity::eve_alliance::Model> for AllianceDto {
    fn from(alliance: entity::eve_alliance::Model) -> Self {
        Self {
            alliance_id: alliance.alliance_id,
            name: alliance.name,
            ticker: alliance.ticker,
            cached_until: alliance.cached_until,
        }
    }
}

impl From<Corporation> for CorporationDto {
    fn from(Corporation { corporation, alliance }: Corporation) -> Self {
        Self {
            corporation_id: corporation.corporation_id,
            name: corporation.name,
            ticker: corporation.ticker,
            alliance: alliance.map(AllianceDto::from),
            cached_until: corporation.cached_until,
        }
    }
}

impl From<Character> for CharacterDto {
    fn from(Character { character, corporation }: Character) -> Self {
        Self {
            character_id: character.character_id,
            name: character.name,
            corporation: corporation.into(),
            cached_until: character.cached_until,
        }
    }
}
