//! Construction of the clients, connections and state the server runs with.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tower_sessions::SessionManagerLayer;
use tower_sessions_redis_store::{fred::prelude::Pool, RedisStore};

use crate::server::{
    config::Config,
    error::Error,
    esi::EsiClient,
    model::app::AppState,
    service::eve::lock::EntityLocks,
    sso::{EveSso, SsoEndpoints},
};

/// Build the ESI client used for entity fetches
pub fn build_esi_client(config: &Config) -> Result<EsiClient, Error> {
    EsiClient::new(&config.esi_url, &config.user_agent)
}

/// Build the EVE Online SSO client with the configured credentials
pub fn build_sso(config: &Config) -> Result<EveSso, Error> {
    EveSso::new(SsoEndpoints::from(config))
}

/// Connect to the database and run migrations
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, Error> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    tracing::info!("Database connected and migrations applied");

    Ok(db)
}

/// Connect to Valkey/Redis and configure session management
pub async fn connect_to_session(
    config: &Config,
) -> Result<SessionManagerLayer<RedisStore<Pool>>, Error> {
    use time::Duration;
    use tower_sessions::{cookie::SameSite, Expiry};
    use tower_sessions_redis_store::fred::prelude::*;

    let config = Config::from_url(&config.valkey_url)?;
    let pool = Pool::new(config, None, None, None, 6)?;

    pool.connect();
    pool.wait_for_connect().await?;

    let session_store = RedisStore::new(pool);

    // Secure cookies outside of debug builds.
    let secure_cookies = !cfg!(debug_assertions);

    let session = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::days(7)));

    Ok(session)
}

/// Assemble the shared application state
pub async fn build_app_state(config: &Config) -> Result<AppState, Error> {
    Ok(AppState {
        db: connect_to_database(config).await?,
        esi: build_esi_client(config)?,
        sso: build_sso(config)?,
        locks: EntityLocks::new(),
        scopes: Arc::new(config.esi_scopes.clone()),
    })
}
