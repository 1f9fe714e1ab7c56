//! Error types for the capsuleer server.
//!
//! Domain errors (authentication, configuration, EVE Online) are kept in their own enums and
//! aggregated into [`Error`] alongside the external library errors so `?` works across every
//! layer. All of them implement `IntoResponse` so controllers can return them directly.

/// Login flow and session errors
pub mod auth;
/// Configuration errors
pub mod config;
/// EVE Online entity errors
pub mod eve;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::error::{auth::AuthError, config::ConfigError, eve::EveError},
};

/// Main error type for the capsuleer server.
///
/// # Error Categories
/// - Configuration errors (missing/invalid environment variables)
/// - Authentication errors (SSO state, token requests, session principal)
/// - EVE Online errors (missing entities, unexpected ESI responses)
/// - Caller errors (invalid arguments passed to the cache)
/// - External library errors (database, HTTP clients, sessions)
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Authentication error (SSO state, token exchange, session principal).
    #[error(transparent)]
    AuthError(#[from] AuthError),
    /// EVE Online-specific error (unresolvable entities, unexpected ESI status codes).
    #[error(transparent)]
    EveError(#[from] EveError),
    /// A caller passed a value the operation cannot work with; nothing was written.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// ESI client error (JWT validation, client configuration).
    #[error(transparent)]
    EsiError(#[from] eve_esi::Error),
    /// HTTP client error talking to ESI or EVE SSO.
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),
    /// Invalid URL in configuration.
    #[error(transparent)]
    UrlParseError(#[from] oauth2::url::ParseError),
    /// Database error (query failures, connection issues, constraint violations).
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    /// Session error (session retrieval, storage, serialization).
    #[error(transparent)]
    SessionError(#[from] tower_sessions::session::Error),
    /// Redis session store error (connection, command execution).
    #[error(transparent)]
    SessionRedisError(#[from] tower_sessions_redis_store::fred::prelude::Error),
    /// Failed to bind or serve the HTTP listener.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// Converts application errors into HTTP responses.
///
/// # Returns
/// - 400 Bad Request - SSO state missing, mismatched or undecodable
/// - 404 Not Found - No logged in character, or the requested EVE entity does not exist
/// - 500 Internal Server Error - For all other errors (with error logging)
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::ConfigError(err) => err.into_response(),
            Self::AuthError(err) => err.into_response(),
            Self::EveError(err) => err.into_response(),
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Wrapper type for converting any displayable error into a 500 Internal Server Error response.
///
/// Logs the error and returns a generic message to avoid leaking implementation details.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDto {
                error: "Internal server error".to_string(),
            }),
        )
            .into_response()
    }
}
