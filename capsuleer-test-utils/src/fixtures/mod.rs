//! Test fixture modules for database rows and HTTP mock endpoints.
//!
//! - `auth` - EVE SSO token endpoints
//! - `eve` - ESI payloads, database rows, and conditional ESI endpoints

pub mod auth;
pub mod eve;
