use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{model::api::ErrorDto, server::error::InternalServerError};

/// Login flow and session errors.
#[derive(Error, Debug)]
pub enum AuthError {
    /// No character is logged in (404).
    #[error("No character is logged in for this session")]
    CharacterNotInSession,
    /// The callback's state differs from the one stashed at login (400).
    #[error("Failed to login character due to SSO state mismatch")]
    CsrfValidationFailed,
    /// The callback arrived without a login pending in the session (400).
    #[error("Failed to login character due to no SSO state being stashed in the session")]
    CsrfMissingValue,
    /// A state token is not URL-safe base64 (400).
    #[error("SSO state is not valid base64: {0}")]
    StateEncoding(#[from] base64::DecodeError),
    /// A state token decodes to something other than a state payload (400).
    #[error("SSO state does not contain a valid payload: {0}")]
    StatePayload(#[from] serde_json::Error),
    /// EVE SSO rejected or failed a token, refresh or revocation request.
    #[error("EVE SSO token request failed: {0}")]
    TokenRequest(String),
    /// The character has no refresh token to refresh or revoke with.
    #[error("Character {0} has no refresh token stored")]
    NoRefreshToken(i64),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            Self::CharacterNotInSession => {
                tracing::debug!("{}", self);

                (
                    StatusCode::NOT_FOUND,
                    Json(ErrorDto {
                        error: "User not found".to_string(),
                    }),
                )
                    .into_response()
            }
            Self::CsrfValidationFailed
            | Self::CsrfMissingValue
            | Self::StateEncoding(_)
            | Self::StatePayload(_) => {
                tracing::debug!("{}", self);

                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorDto {
                        error: "There was an issue logging you in, please try again.".to_string(),
                    }),
                )
                    .into_response()
            }
            err => InternalServerError(err).into_response(),
        }
    }
}
