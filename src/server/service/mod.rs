//! Business logic services.
//!
//! `eve` keeps the local copies of characters, corporations and alliances in sync with ESI,
//! `auth` drives the EVE SSO login flow on top of it.

pub mod auth;
pub mod eve;
