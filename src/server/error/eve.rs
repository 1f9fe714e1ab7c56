use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{model::api::ErrorDto, server::error::InternalServerError};

/// EVE Online entity errors.
#[derive(Error, Debug)]
pub enum EveError {
    /// ESI does not know the alliance (404).
    #[error("EVE Online alliance {0} does not exist")]
    AllianceNotFound(i64),
    /// ESI does not know the corporation (404).
    #[error("EVE Online corporation {0} does not exist")]
    CorporationNotFound(i64),
    /// ESI does not know the character (404).
    #[error("EVE Online character {0} does not exist")]
    CharacterNotFound(i64),
    /// ESI listed the character in a corporation it then reports as missing.
    ///
    /// Usually clears up once ESI's cache for the corporation expires.
    #[error(
        "Character {character_id} belongs to corporation {corporation_id} which could not be \
        resolved from ESI, the character was not saved"
    )]
    CorporationUnresolved {
        /// Character being resolved
        character_id: i64,
        /// Corporation ESI listed for it
        corporation_id: i64,
    },
    /// ESI answered with a status other than 200, 304 or 404.
    #[error("Unexpected ESI response status {status} from {url}")]
    UnexpectedStatus {
        /// Requested URL
        url: String,
        /// Response status code
        status: u16,
    },
}

impl IntoResponse for EveError {
    fn into_response(self) -> Response {
        match self {
            Self::AllianceNotFound(_) | Self::CorporationNotFound(_) | Self::CharacterNotFound(_) => {
                tracing::debug!("{}", self);

                (
                    StatusCode::NOT_FOUND,
                    Json(ErrorDto {
                        error: self.to_string(),
                    }),
                )
                    .into_response()
            }
            err => InternalServerError(err).into_response(),
        }
    }
}
