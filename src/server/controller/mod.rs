//! HTTP controller endpoints.
//!
//! Axum handlers for the EVE SSO login flow and read access to cached EVE entities. Each
//! handler is annotated for the OpenAPI document served at `/api/docs`.

pub mod auth;
pub mod eve;
