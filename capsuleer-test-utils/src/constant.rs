//! Test configuration constants for ESI and EVE SSO client setup.
//!
//! None of these are real credentials.

/// User agent string for test ESI client requests.
pub static TEST_USER_AGENT: &str =
    "capsuleer-tests/1.0 (contact@example.com; +https://github.com/capsuleer/capsuleer)";

/// Mock EVE SSO OAuth2 client ID.
pub static TEST_ESI_CLIENT_ID: &str = "esi_client_id";

/// Mock EVE SSO OAuth2 client secret.
pub static TEST_ESI_CLIENT_SECRET: &str = "esi_client_secret";

/// Mock OAuth2 callback URL, points to localhost.
pub static TEST_CALLBACK_URL: &str = "http://localhost:8080/api/auth/callback";

/// ETag stored on database fixtures, sent back by the synchronizer as `If-None-Match`.
pub static MOCK_STORED_ETAG: &str = "\"stored-etag\"";

/// ETag returned by fresh mock ESI endpoints.
pub static MOCK_FRESH_ETAG: &str = "\"fresh-etag\"";
