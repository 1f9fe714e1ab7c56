//! Typed wrappers over session data.
//!
//! Keys are namespaced under `capsuleer:` so they cannot collide with other data in the
//! shared session store.

pub mod auth;
pub mod character;
