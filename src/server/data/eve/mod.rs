//! Repositories for EVE Online entities cached from ESI.
//!
//! Each upsert writes the ESI fields the cache keeps along with the ETag and
//! `cached_until` of the response they came from. Referenced rows (a corporation's
//! alliance, a character's corporation) must already exist.

pub mod alliance;
pub mod character;
pub mod corporation;
