use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::server::{esi::EsiClient, service::eve::lock::EntityLocks, sso::EveSso};

/// State shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    /// Database holding accounts and cached entities
    pub db: DatabaseConnection,
    /// Conditional ESI client refreshing cached entities
    pub esi: EsiClient,
    /// EVE SSO client for the login flow
    pub sso: EveSso,
    /// Per-entity locks shared by all resolutions
    pub locks: EntityLocks,
    /// OAuth2 scopes requested on login
    pub scopes: Arc<Vec<String>>,
}
