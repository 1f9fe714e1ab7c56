use capsuleer_test_utils::prelude::*;

use crate::setup::spawn_app;

#[tokio::test]
async fn openapi_document_lists_all_routes() -> Result<(), TestError> {
    let test = test_setup_with_eve_tables!()?;
    let app = spawn_app(&test).await?;

    let resp = app
        .http
        .get(app.url("/api/docs/openapi.json"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let doc: serde_json::Value = resp.json().await.unwrap();
    let paths = doc["paths"].as_object().unwrap();
    for path in [
        "/api/auth/login",
        "/api/auth/callback",
        "/api/auth/logout",
        "/api/auth/user",
        "/api/eve/characters/{character_id}",
        "/api/eve/corporations/{corporation_id}",
        "/api/eve/alliances/{alliance_id}",
    ] {
        assert!(paths.contains_key(path), "missing {}", path);
    }

    Ok(())
}
