//! Server application core modules.
//!
//! Capsuleer keeps a local cache of EVE Online characters, corporations and alliances in
//! sync with ESI, and signs characters in through EVE Online SSO. This module holds the
//! HTTP surface, the services behind it and the persistence layer they share.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod esi;
pub mod model;
pub mod router;
pub mod service;
pub mod sso;
pub mod startup;
pub mod util;
