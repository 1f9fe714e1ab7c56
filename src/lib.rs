//! EVE Online SSO login with a locally cached mirror of characters, corporations and
//! alliances.

pub mod model;
pub mod server;
