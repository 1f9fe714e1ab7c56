use capsuleer_test_utils::prelude::*;
use reqwest::header::{COOKIE, LOCATION, SET_COOKIE};

use crate::setup::spawn_app;

#[tokio::test]
async fn login_redirects_to_sso_and_sets_session() -> Result<(), TestError> {
    let test = test_setup_with_eve_tables!()?;
    let app = spawn_app(&test).await?;

    let resp = app
        .http
        .get(app.url("/api/auth/login"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 307);
    let location = resp.headers()[LOCATION].to_str().unwrap();
    assert!(location.starts_with(&format!("{}/v2/oauth/authorize", test.url())));
    assert!(location.contains("state="));
    assert!(resp.headers().contains_key(SET_COOKIE));

    Ok(())
}

#[tokio::test]
async fn callback_rejects_state_from_another_login() -> Result<(), TestError> {
    let mut test = test_setup_with_eve_tables!()?;
    let token_endpoint = test
        .auth()
        .create_token_endpoint("access-token", "refresh-token", 0);
    let app = spawn_app(&test).await?;

    let login = app
        .http
        .get(app.url("/api/auth/login"))
        .send()
        .await
        .unwrap();
    let cookie = login.headers()[SET_COOKIE]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let resp = app
        .http
        .get(app.url("/api/auth/callback?state=forged&code=code"))
        .header(COOKIE, cookie)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    token_endpoint.assert();

    Ok(())
}

#[tokio::test]
async fn get_user_without_login_returns_404() -> Result<(), TestError> {
    let test = test_setup_with_eve_tables!()?;
    let app = spawn_app(&test).await?;

    let resp = app
        .http
        .get(app.url("/api/auth/user"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);

    Ok(())
}

#[tokio::test]
async fn logout_redirects_home() -> Result<(), TestError> {
    let test = test_setup_with_eve_tables!()?;
    let app = spawn_app(&test).await?;

    let resp = app
        .http
        .get(app.url("/api/auth/logout"))
        .send()
        .await
        .unwrap();

    assert!(resp.status().is_redirection());
    assert_eq!(resp.headers()[LOCATION], "/");

    Ok(())
}
