//! Read access to cached EVE Online entities.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::ErrorDto,
        eve::{AllianceDto, CharacterDto, CorporationDto},
    },
    server::{
        error::{eve::EveError, Error},
        model::{
            app::AppState,
            eve::{EntityKind, ResolvedEntity},
        },
        service::eve::EveService,
    },
};

/// OpenAPI tag of the EVE entity endpoints
pub static EVE_TAG: &str = "eve";

async fn resolve(
    state: &AppState,
    kind: EntityKind,
    id: i64,
) -> Result<Option<ResolvedEntity>, Error> {
    EveService::new(&state.db, &state.esi, &state.locks)
        .resolve(kind, id)
        .await
}

/// Get a character with its corporation & alliance
#[utoipa::path(
    get,
    path = "/api/eve/characters/{character_id}",
    tag = EVE_TAG,
    params(("character_id" = i64, Path, description = "EVE Online character ID")),
    responses(
        (status = 200, description = "Character found", body = CharacterDto),
        (status = 404, description = "Character does not exist", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_character(
    State(state): State<AppState>,
    Path(character_id): Path<i64>,
) -> Result<impl IntoResponse, Error> {
    match resolve(&state, EntityKind::Character, character_id).await? {
        Some(ResolvedEntity::Character(character)) => Ok(Json(CharacterDto::from(character))),
        _ => Err(EveError::CharacterNotFound(character_id).into()),
    }
}

/// Get a corporation with its alliance
#[utoipa::path(
    get,
    path = "/api/eve/corporations/{corporation_id}",
    tag = EVE_TAG,
    params(("corporation_id" = i64, Path, description = "EVE Online corporation ID")),
    responses(
        (status = 200, description = "Corporation found", body = CorporationDto),
        (status = 404, description = "Corporation does not exist", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_corporation(
    State(state): State<AppState>,
    Path(corporation_id): Path<i64>,
) -> Result<impl IntoResponse, Error> {
    match resolve(&state, EntityKind::Corporation, corporation_id).await? {
        Some(ResolvedEntity::Corporation(corporation)) => {
            Ok(Json(CorporationDto::from(corporation)))
        }
        _ => Err(EveError::CorporationNotFound(corporation_id).into()),
    }
}

/// Get an alliance
#[utoipa::path(
    get,
    path = "/api/eve/alliances/{alliance_id}",
    tag = EVE_TAG,
    params(("alliance_id" = i64, Path, description = "EVE Online alliance ID")),
    responses(
        (status = 200, description = "Alliance found", body = AllianceDto),
        (status = 404, description = "Alliance does not exist", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_alliance(
    State(state): State<AppState>,
    Path(alliance_id): Path<i64>,
) -> Result<impl IntoResponse, Error> {
    match resolve(&state, EntityKind::Alliance, alliance_id).await? {
        Some(ResolvedEntity::Alliance(alliance)) => Ok(Json(AllianceDto::from(alliance))),
        _ => Err(EveError::AllianceNotFound(alliance_id).into()),
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use capsuleer_test_utils::prelude::*;

    use crate::server::{
        controller::eve::{get_alliance, get_character, get_corporation},
        util::test::app_state,
    };

    #[tokio::test]
    async fn get_character_returns_cached_character() -> Result<(), TestError> {
        let mut test = test_setup_with_eve_tables!()?;
        test.eve()
            .insert_mock_corporation(2, None, data::fresh_cache())
            .await?;
        test.eve()
            .insert_mock_character(3, 2, data::fresh_cache())
            .await?;

        let resp = get_character(State(app_state(&test)), Path(3))
            .await
            .unwrap()
            .into_response();

        assert_eq!(resp.status(), StatusCode::OK);

        Ok(())
    }

    #[tokio::test]
    async fn get_corporation_fetches_unknown_corporation() -> Result<(), TestError> {
        let mut test = test_setup_with_eve_tables!()?;
        let endpoint = test
            .eve()
            .create_corporation_endpoint(2, data::mock_corporation(None), 1);

        let resp = get_corporation(State(app_state(&test)), Path(2))
            .await
            .unwrap()
            .into_response();

        endpoint.assert();
        assert_eq!(resp.status(), StatusCode::OK);

        Ok(())
    }

    #[tokio::test]
    async fn get_alliance_returns_not_found() -> Result<(), TestError> {
        let mut test = test_setup_with_eve_tables!()?;
        let endpoint = test.eve().create_not_found_endpoint("/alliances/1", 1);

        let result = get_alliance(State(app_state(&test)), Path(1)).await;

        endpoint.assert();
        let resp = result.err().unwrap().into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        Ok(())
    }
}
