use capsuleer::model::eve::{AllianceDto, CharacterDto};
use capsuleer_test_utils::prelude::*;

use crate::setup::spawn_app;

#[tokio::test]
async fn get_character_resolves_whole_chain() -> Result<(), TestError> {
    let mut test = test_setup_with_eve_tables!()?;
    let alliance_endpoint = test
        .eve()
        .create_alliance_endpoint(1, data::mock_alliance(), 1);
    let corporation_endpoint = test
        .eve()
        .create_corporation_endpoint(2, data::mock_corporation(Some(1)), 1);
    let character_endpoint = test
        .eve()
        .create_character_endpoint(3, data::mock_character(2), 1);
    let app = spawn_app(&test).await?;

    let resp = app
        .http
        .get(app.url("/api/eve/characters/3"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let character: CharacterDto = resp.json().await.unwrap();
    assert_eq!(character.character_id, 3);
    assert_eq!(character.name, "Hyziri");
    assert_eq!(character.corporation.corporation_id, 2);
    assert_eq!(
        character.corporation.alliance.map(|a| a.alliance_id),
        Some(1)
    );

    alliance_endpoint.assert();
    corporation_endpoint.assert();
    character_endpoint.assert();

    Ok(())
}

#[tokio::test]
async fn get_alliance_serves_fresh_cache_without_esi() -> Result<(), TestError> {
    let mut test = test_setup_with_eve_tables!()?;
    test.eve()
        .insert_mock_alliance(1, data::fresh_cache())
        .await?;
    let endpoint = test
        .eve()
        .create_alliance_endpoint(1, data::mock_alliance(), 0);
    let app = spawn_app(&test).await?;

    let resp = app
        .http
        .get(app.url("/api/eve/alliances/1"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let alliance: AllianceDto = resp.json().await.unwrap();
    assert_eq!(alliance.name, "Stored Alliance");
    endpoint.assert();

    Ok(())
}

#[tokio::test]
async fn get_corporation_returns_404_for_unknown_id() -> Result<(), TestError> {
    let mut test = test_setup_with_eve_tables!()?;
    let endpoint = test
        .eve()
        .create_not_found_endpoint("/corporations/2", 1);
    let app = spawn_app(&test).await?;

    let resp = app
        .http
        .get(app.url("/api/eve/corporations/2"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
    endpoint.assert();

    Ok(())
}
