//! EVE SSO OAuth2 HTTP mock endpoint creation utilities.

use mockito::Mock;
use serde_json::json;

use crate::fixtures::auth::AuthFixtures;

/// Path of the mock OAuth2 token endpoint.
pub static MOCK_TOKEN_PATH: &str = "/v2/oauth/token";

impl<'a> AuthFixtures<'a> {
    /// Create a token endpoint returning a bearer token valid for 20 minutes.
    pub fn create_token_endpoint(
        &mut self,
        access_token: &str,
        refresh_token: &str,
        expected_requests: usize,
    ) -> Mock {
        let body = json!({
            "access_token": access_token,
            "token_type": "Bearer",
            "expires_in": 1199,
            "refresh_token": refresh_token,
        });

        self.setup
            .server
            .mock("POST", MOCK_TOKEN_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a token endpoint rejecting every grant with `invalid_grant`.
    pub fn create_token_error_endpoint(&mut self, expected_requests: usize) -> Mock {
        let body = json!({
            "error": "invalid_grant",
            "error_description": "Invalid authorization code",
        });

        self.setup
            .server
            .mock("POST", MOCK_TOKEN_PATH)
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(expected_requests)
            .create()
    }
}
