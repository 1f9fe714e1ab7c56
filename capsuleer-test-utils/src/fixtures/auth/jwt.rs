//! Signed EVE SSO access tokens and the JWKS needed to validate them.
//!
//! Each [`MockJwtSigner`] generates its own RSA key pair, so a token signed by one signer
//! fails validation against the keys published for another.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use eve_esi::model::oauth2::{EveJwtClaims, EveJwtKey, EveJwtKeys};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use mockito::Mock;
use openssl::rsa::Rsa;

use crate::{constant::TEST_ESI_CLIENT_ID, fixtures::auth::AuthFixtures};

/// Path of the mock JWKS endpoint.
pub static MOCK_JWKS_PATH: &str = "/oauth/jwks";

/// Key ID of the RS256 key published by [`MockJwtSigner::jwks`].
pub static MOCK_JWT_KEY_ID: &str = "JWT-Signature-Key-1";

/// RSA key pair signing mock EVE SSO access tokens.
pub struct MockJwtSigner {
    encoding_key: EncodingKey,
    jwks: EveJwtKeys,
}

impl MockJwtSigner {
    /// Generates a fresh 2048 bit RSA key pair.
    ///
    /// # Panics
    /// Panics if OpenSSL fails to generate or export the key
    pub fn new() -> Self {
        let rsa = Rsa::generate(2048).unwrap();
        let encoding_key = EncodingKey::from_rsa_pem(&rsa.private_key_to_pem().unwrap()).unwrap();

        let jwks = EveJwtKeys {
            skip_unresolved_json_web_keys: false,
            keys: vec![EveJwtKey::RS256 {
                e: URL_SAFE_NO_PAD.encode(rsa.e().to_vec()),
                kid: MOCK_JWT_KEY_ID.to_string(),
                kty: "RSA".to_string(),
                n: URL_SAFE_NO_PAD.encode(rsa.n().to_vec()),
                r#use: "sig".to_string(),
            }],
        };

        Self { encoding_key, jwks }
    }

    /// Public keys validating tokens from this signer.
    pub fn jwks(&self) -> &EveJwtKeys {
        &self.jwks
    }

    /// Signs `claims` with RS256 into an access token secret.
    ///
    /// # Panics
    /// Panics if the claims cannot be encoded
    pub fn sign(&self, claims: &EveJwtClaims) -> String {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(MOCK_JWT_KEY_ID.to_string());

        encode(&header, claims, &self.encoding_key).unwrap()
    }
}

impl Default for MockJwtSigner {
    fn default() -> Self {
        Self::new()
    }
}

/// Claims EVE SSO issues for `character_id` logging in, valid for 15 minutes.
pub fn mock_jwt_claims(character_id: i64, character_name: &str) -> EveJwtClaims {
    let now = Utc::now();

    EveJwtClaims {
        iss: "https://login.eveonline.com".to_string(),
        sub: format!("CHARACTER:EVE:{}", character_id),
        aud: vec![TEST_ESI_CLIENT_ID.to_string(), "EVE Online".to_string()],
        jti: "mock-jwt-id".to_string(),
        kid: MOCK_JWT_KEY_ID.to_string(),
        tenant: "tranquility".to_string(),
        region: "world".to_string(),
        exp: now + Duration::minutes(15),
        iat: now,
        scp: vec!["publicData".to_string()],
        name: character_name.to_string(),
        owner: "mock-owner-hash".to_string(),
        azp: TEST_ESI_CLIENT_ID.to_string(),
    }
}

impl<'a> AuthFixtures<'a> {
    /// Create a JWKS endpoint publishing `keys`.
    ///
    /// Validation refetches the keys once after a failure, so the endpoint only checks it
    /// was called at least once.
    pub fn create_jwks_endpoint(&mut self, keys: &EveJwtKeys) -> Mock {
        self.setup
            .server
            .mock("GET", MOCK_JWKS_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(serde_json::to_string(keys).unwrap())
            .expect_at_least(1)
            .create()
    }
}
