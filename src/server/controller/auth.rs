//! EVE SSO login, logout and session user endpoints.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect},
    Json,
};
use serde::Deserialize;
use tower_sessions::Session;
use utoipa::IntoParams;

use crate::{
    model::{api::ErrorDto, auth::UserDto},
    server::{
        error::{auth::AuthError, Error},
        esi::EsiClient,
        model::{app::AppState, session::character::SessionCharacter},
        service::auth::AuthService,
        sso::EveSso,
    },
};

/// OpenAPI tag of the auth endpoints
pub static AUTH_TAG: &str = "auth";

/// Query parameters of the login endpoint
#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LoginParams {
    /// Local path to return to once logged in
    pub redirect: Option<String>,
}

/// Query parameters EVE SSO appends to the callback URL
#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CallbackParams {
    /// State token sent with the login, echoed back by EVE SSO
    pub state: String,
    /// Authorization code to exchange for tokens
    pub code: String,
}

fn auth_service(state: &AppState) -> AuthService<'_, EsiClient, EveSso> {
    AuthService::new(
        &state.db,
        &state.esi,
        &state.locks,
        &state.sso,
        state.scopes.as_slice(),
    )
}

/// Login route to initiate login with EVE Online
///
/// Creates a URL to login with EVE Online and redirects the user to that URL to begin the login process.
#[utoipa::path(
    get,
    path = "/api/auth/login",
    tag = AUTH_TAG,
    params(LoginParams),
    responses(
        (status = 307, description = "Redirect to EVE Online's login page"),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<LoginParams>,
) -> Result<impl IntoResponse, Error> {
    let login_url = auth_service(&state).login(&session, params.redirect).await?;

    Ok(Redirect::temporary(&login_url))
}

/// Callback route user is redirected to after successful login at EVE Online's website
///
/// Validates the returned state, exchanges the authorization code for tokens and logs the
/// character in.
#[utoipa::path(
    get,
    path = "/api/auth/callback",
    tag = AUTH_TAG,
    params(CallbackParams),
    responses(
        (status = 307, description = "Logged in, redirect to the page the login started from"),
        (status = 400, description = "Login state missing or mismatched", body = ErrorDto),
        (status = 404, description = "Character not found on ESI", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<CallbackParams>,
) -> Result<impl IntoResponse, Error> {
    let redirect_url = auth_service(&state)
        .callback(&session, &params.code, &params.state)
        .await?;

    Ok(Redirect::temporary(&redirect_url))
}

/// Logs the character out of this session
#[utoipa::path(
    get,
    path = "/api/auth/logout",
    tag = AUTH_TAG,
    responses(
        (status = 307, description = "Logged out, redirect to home"),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    auth_service(&state).logout(&session).await?;

    Ok(Redirect::temporary("/"))
}

/// Get the character logged in with this session
#[utoipa::path(
    get,
    path = "/api/auth/user",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Logged in character", body = UserDto),
        (status = 404, description = "No character logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_user(session: Session) -> Result<impl IntoResponse, Error> {
    let Some(character) = SessionCharacter::get(&session).await? else {
        return Err(AuthError::CharacterNotInSession.into());
    };

    Ok(Json(UserDto::from(character)))
}
