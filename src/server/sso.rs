//! EVE SSO OAuth2 client.
//!
//! [`AuthorizationProvider`] is the seam between the login flow and EVE SSO. [`EveSso`]
//! implements it with the `oauth2` crate for the authorization code grant and validates
//! issued access tokens through `eve_esi` to learn which character logged in.

use std::future::Future;

use chrono::Utc;
use oauth2::{
    basic::BasicClient, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken,
    EndpointNotSet, EndpointSet, RedirectUrl, RefreshToken, RevocationUrl, Scope,
    StandardRevocableToken, TokenResponse, TokenUrl,
};

use crate::server::{
    config::Config,
    error::{auth::AuthError, Error},
    model::auth::{AuthenticatedCharacter, SsoLogin, TokenGrant},
};

type SsoOAuthClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointSet, EndpointSet>;

/// OAuth2 authorization server logging characters in.
pub trait AuthorizationProvider: Send + Sync {
    /// URL to send the user to, returning with `state` unchanged.
    fn authorization_url(&self, scopes: &[String], state: &str) -> String;

    /// Exchanges an authorization code for tokens and the character they belong to.
    fn exchange_code(&self, code: &str) -> impl Future<Output = Result<SsoLogin, Error>> + Send;

    /// Exchanges a refresh token for a new grant.
    fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> impl Future<Output = Result<TokenGrant, Error>> + Send;

    /// Revokes a refresh token so it can no longer be used.
    fn revoke_token(&self, refresh_token: &str) -> impl Future<Output = Result<(), Error>> + Send;
}

/// Endpoint URLs of an EVE SSO instance.
pub struct SsoEndpoints {
    /// EVE SSO base URL, serving `/v2/oauth/*` and `/oauth/jwks`
    pub sso_url: String,
    /// ESI base URL
    pub esi_url: String,
    /// OAuth2 client ID
    pub client_id: String,
    /// OAuth2 client secret
    pub client_secret: String,
    /// Callback URL registered for the client
    pub callback_url: String,
    /// `User-Agent` sent with every request
    pub user_agent: String,
}

impl From<&Config> for SsoEndpoints {
    fn from(config: &Config) -> Self {
        Self {
            sso_url: config.sso_url.clone(),
            esi_url: config.esi_url.clone(),
            client_id: config.esi_client_id.clone(),
            client_secret: config.esi_client_secret.clone(),
            callback_url: config.esi_callback_url.clone(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// EVE SSO [`AuthorizationProvider`].
#[derive(Clone)]
pub struct EveSso {
    oauth: SsoOAuthClient,
    http: reqwest::Client,
    esi_client: eve_esi::Client,
}

impl EveSso {
    /// Builds the OAuth2 and token validation clients for `endpoints`.
    ///
    /// # Returns
    /// - `Ok(EveSso)` - Client ready to use
    /// - `Err(Error::UrlParseError)` - An endpoint URL is not a valid URL
    /// - `Err(Error)` - HTTP or ESI client failed to build
    pub fn new(endpoints: SsoEndpoints) -> Result<Self, Error> {
        let sso_url = endpoints.sso_url.trim_end_matches('/');

        let oauth = BasicClient::new(ClientId::new(endpoints.client_id.clone()))
            .set_client_secret(ClientSecret::new(endpoints.client_secret.clone()))
            .set_auth_uri(AuthUrl::new(format!("{}/v2/oauth/authorize", sso_url))?)
            .set_token_uri(TokenUrl::new(format!("{}/v2/oauth/token", sso_url))?)
            .set_redirect_uri(RedirectUrl::new(endpoints.callback_url.clone())?)
            .set_revocation_url(RevocationUrl::new(format!("{}/v2/oauth/revoke", sso_url))?);

        // Token requests must never follow redirects.
        let http = reqwest::Client::builder()
            .user_agent(&endpoints.user_agent)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        let esi_config = eve_esi::Config::builder()
            .esi_url(&endpoints.esi_url)
            .token_url(&format!("{}/v2/oauth/token", sso_url))
            .jwk_url(&format!("{}/oauth/jwks", sso_url))
            .build()?;

        let esi_client = eve_esi::Client::builder()
            .config(esi_config)
            .user_agent(&endpoints.user_agent)
            .client_id(&endpoints.client_id)
            .client_secret(&endpoints.client_secret)
            .callback_url(&endpoints.callback_url)
            .build()?;

        Ok(Self {
            oauth,
            http,
            esi_client,
        })
    }
}

fn token_grant(token: &impl TokenResponse) -> TokenGrant {
    let expires_at = token
        .expires_in()
        .and_then(|expires_in| chrono::Duration::from_std(expires_in).ok())
        .and_then(|expires_in| Utc::now().checked_add_signed(expires_in));

    TokenGrant {
        access_token: token.access_token().secret().to_string(),
        refresh_token: token
            .refresh_token()
            .map(|refresh_token| refresh_token.secret().to_string()),
        expires_at,
    }
}

impl AuthorizationProvider for EveSso {
    fn authorization_url(&self, scopes: &[String], state: &str) -> String {
        let state = state.to_string();

        let (url, _) = self
            .oauth
            .authorize_url(move || CsrfToken::new(state))
            .add_scopes(scopes.iter().cloned().map(Scope::new))
            .url();

        url.to_string()
    }

    async fn exchange_code(&self, code: &str) -> Result<SsoLogin, Error> {
        let token = self
            .oauth
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&self.http)
            .await
            .map_err(|e| AuthError::TokenRequest(e.to_string()))?;

        let tokens = token_grant(&token);

        let claims = self
            .esi_client
            .oauth2()
            .validate_token(tokens.access_token.clone())
            .await?;

        let character = AuthenticatedCharacter {
            character_id: claims.character_id()?,
            character_name: claims.name,
        };

        Ok(SsoLogin { character, tokens })
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenGrant, Error> {
        let token = self
            .oauth
            .exchange_refresh_token(&RefreshToken::new(refresh_token.to_string()))
            .request_async(&self.http)
            .await
            .map_err(|e| AuthError::TokenRequest(e.to_string()))?;

        Ok(token_grant(&token))
    }

    async fn revoke_token(&self, refresh_token: &str) -> Result<(), Error> {
        let token = StandardRevocableToken::RefreshToken(RefreshToken::new(
            refresh_token.to_string(),
        ));

        self.oauth
            .revoke_token(token)
            .map_err(|e| AuthError::TokenRequest(e.to_string()))?
            .request_async(&self.http)
            .await
            .map_err(|e| AuthError::TokenRequest(e.to_string()))?;

        Ok(())
    }
}
