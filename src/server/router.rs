//! HTTP routing and OpenAPI documentation.
//!
//! Every endpoint is registered here with its utoipa path annotation. The collected
//! document is served at `/api/docs/openapi.json` alongside a Swagger UI at `/api/docs`.

use axum::Router;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{controller, model::app::AppState};

/// Builds the application's router with all API endpoints and Swagger UI.
///
/// # Registered Endpoints
/// - `GET /api/auth/login` - Begin EVE Online SSO login
/// - `GET /api/auth/callback` - OAuth2 callback handler
/// - `GET /api/auth/logout` - End the current session
/// - `GET /api/auth/user` - Character authenticated in this session
/// - `GET /api/eve/characters/{character_id}` - Resolve a character
/// - `GET /api/eve/corporations/{corporation_id}` - Resolve a corporation
/// - `GET /api/eve/alliances/{alliance_id}` - Resolve an alliance
pub fn routes() -> Router<AppState> {
    #[derive(OpenApi)]
    #[openapi(info(title = "Capsuleer", description = "Capsuleer API"), tags(
        (name = controller::auth::AUTH_TAG, description = "Authentication API routes"),
        (name = controller::eve::EVE_TAG, description = "EVE Online entity API routes"),
    ))]
    struct ApiDoc;

    let (routes, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(controller::auth::login))
        .routes(routes!(controller::auth::callback))
        .routes(routes!(controller::auth::logout))
        .routes(routes!(controller::auth::get_user))
        .routes(routes!(controller::eve::get_character))
        .routes(routes!(controller::eve::get_corporation))
        .routes(routes!(controller::eve::get_alliance))
        .split_for_parts();

    routes.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
}
