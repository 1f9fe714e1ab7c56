use std::{net::SocketAddr, sync::Arc};

use capsuleer::server::{
    esi::EsiClient,
    model::app::AppState,
    router,
    service::eve::lock::EntityLocks,
    sso::{EveSso, SsoEndpoints},
};
use capsuleer_test_utils::prelude::*;
use tokio::net::TcpListener;
use tower_sessions::{MemoryStore, SessionManagerLayer};

/// Capsuleer served on a random local port, talking to the [`TestSetup`]'s mock server.
pub struct TestApp {
    pub addr: SocketAddr,
    pub http: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

pub async fn spawn_app(test: &TestSetup) -> Result<TestApp, TestError> {
    let state = AppState {
        db: test.db.clone(),
        esi: EsiClient::new(&test.url(), TEST_USER_AGENT).unwrap(),
        sso: EveSso::new(SsoEndpoints {
            sso_url: test.url(),
            esi_url: test.url(),
            client_id: TEST_ESI_CLIENT_ID.to_string(),
            client_secret: TEST_ESI_CLIENT_SECRET.to_string(),
            callback_url: TEST_CALLBACK_URL.to_string(),
            user_agent: TEST_USER_AGENT.to_string(),
        })
        .unwrap(),
        locks: EntityLocks::new(),
        scopes: Arc::new(vec!["publicData".to_string()]),
    };

    let session = SessionManagerLayer::new(MemoryStore::default()).with_secure(false);
    let app = router::routes().with_state(state).layer(session);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let http = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    Ok(TestApp { addr, http })
}
