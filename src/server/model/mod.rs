//! Server-side models.
//!
//! Application state shared with handlers, the SSO state token and token grants used by the
//! login flow, the ESI fetch outcomes and resolved entity graphs used by the cache, and the
//! typed session wrappers.

/// Application state
pub mod app;
pub mod auth;
pub mod eve;
pub mod session;
