//! Server configuration loaded from environment variables.

use std::net::SocketAddr;

use crate::server::error::config::ConfigError;

/// ESI base URL used when `ESI_URL` is unset.
pub const DEFAULT_ESI_URL: &str = "https://esi.evetech.net/latest";
/// EVE SSO base URL used when `SSO_URL` is unset.
pub const DEFAULT_SSO_URL: &str = "https://login.eveonline.com";
/// Scopes requested at login when `ESI_SCOPES` is unset.
pub const DEFAULT_ESI_SCOPES: &str = "publicData";
/// Address the HTTP server binds when `LISTEN_ADDR` is unset.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Server configuration.
///
/// Required: `USER_AGENT`, `ESI_CLIENT_ID`, `ESI_CLIENT_SECRET`, `ESI_CALLBACK_URL`,
/// `DATABASE_URL` and `VALKEY_URL`. Optional: `ESI_URL`, `SSO_URL`, `ESI_SCOPES` and
/// `LISTEN_ADDR`.
pub struct Config {
    /// `User-Agent` sent to ESI and EVE SSO, should include a way to contact the developer
    pub user_agent: String,
    /// OAuth2 client ID from the EVE developer portal
    pub esi_client_id: String,
    /// OAuth2 client secret from the EVE developer portal
    pub esi_client_secret: String,
    /// Callback URL registered for the client, pointing at `/api/auth/callback`
    pub esi_callback_url: String,
    /// ESI base URL without a trailing slash
    pub esi_url: String,
    /// EVE SSO base URL without a trailing slash
    pub sso_url: String,
    /// Scopes requested at login
    pub esi_scopes: Vec<String>,
    /// Database connection URL
    pub database_url: String,
    /// Valkey/Redis URL for the session store
    pub valkey_url: String,
    /// Address the HTTP server binds to
    pub listen_addr: SocketAddr,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Returns
    /// - `Ok(Config)` - All required variables present and optional ones valid
    /// - `Err(ConfigError::MissingEnvVar)` - A required variable is unset
    /// - `Err(ConfigError::InvalidEnvValue)` - `LISTEN_ADDR` is not a socket address or
    ///   `ESI_SCOPES` is empty
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |var: &str| {
            lookup(var)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
        };
        let optional = |var: &str, default: &str| lookup(var).unwrap_or_else(|| default.to_string());

        let esi_scopes = parse_scopes(&optional("ESI_SCOPES", DEFAULT_ESI_SCOPES));
        if esi_scopes.is_empty() {
            return Err(ConfigError::InvalidEnvValue {
                var: "ESI_SCOPES".to_string(),
                reason: "at least one scope is required".to_string(),
            });
        }

        let listen_addr = optional("LISTEN_ADDR", DEFAULT_LISTEN_ADDR)
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvValue {
                var: "LISTEN_ADDR".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            user_agent: required("USER_AGENT")?,
            esi_client_id: required("ESI_CLIENT_ID")?,
            esi_client_secret: required("ESI_CLIENT_SECRET")?,
            esi_callback_url: required("ESI_CALLBACK_URL")?,
            esi_url: optional("ESI_URL", DEFAULT_ESI_URL)
                .trim_end_matches('/')
                .to_string(),
            sso_url: optional("SSO_URL", DEFAULT_SSO_URL)
                .trim_end_matches('/')
                .to_string(),
            esi_scopes,
            database_url: required("DATABASE_URL")?,
            valkey_url: required("VALKEY_URL")?,
            listen_addr,
        })
    }
}

/// Splits a scope list separated by commas and/or whitespace.
fn parse_scopes(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|scope| !scope.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn required_vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("USER_AGENT", "capsuleer/0.1 (admin@example.com)"),
            ("ESI_CLIENT_ID", "client_id"),
            ("ESI_CLIENT_SECRET", "client_secret"),
            ("ESI_CALLBACK_URL", "http://localhost:8080/api/auth/callback"),
            ("DATABASE_URL", "postgresql://localhost/capsuleer"),
            ("VALKEY_URL", "redis://localhost:6379"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<Config, ConfigError> {
        Config::from_lookup(|var| vars.get(var).map(|value| value.to_string()))
    }

    /// Expect defaults for every optional variable when only required ones are set
    #[test]
    fn applies_defaults() {
        let config = load(&required_vars()).unwrap();

        assert_eq!(config.esi_url, DEFAULT_ESI_URL);
        assert_eq!(config.sso_url, DEFAULT_SSO_URL);
        assert_eq!(config.esi_scopes, vec!["publicData".to_string()]);
        assert_eq!(config.listen_addr.port(), 8080);
    }

    /// Expect MissingEnvVar naming the first absent required variable
    #[test]
    fn fails_for_missing_required_var() {
        let mut vars = required_vars();
        vars.remove("ESI_CLIENT_SECRET");

        let result = load(&vars);

        assert!(matches!(
            result,
            Err(ConfigError::MissingEnvVar(var)) if var == "ESI_CLIENT_SECRET"
        ));
    }

    /// Expect scopes split on commas and whitespace with empty entries dropped
    #[test]
    fn parses_scope_list() {
        let mut vars = required_vars();
        vars.insert(
            "ESI_SCOPES",
            "publicData, esi-characters.read_contacts.v1  esi-wallet.read_character_wallet.v1,",
        );

        let config = load(&vars).unwrap();

        assert_eq!(
            config.esi_scopes,
            vec![
                "publicData".to_string(),
                "esi-characters.read_contacts.v1".to_string(),
                "esi-wallet.read_character_wallet.v1".to_string(),
            ]
        );
    }

    /// Expect InvalidEnvValue for an unparsable listen address
    #[test]
    fn fails_for_invalid_listen_addr() {
        let mut vars = required_vars();
        vars.insert("LISTEN_ADDR", "not-an-address");

        let result = load(&vars);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvValue { var, .. }) if var == "LISTEN_ADDR"
        ));
    }

    /// Expect trailing slashes trimmed from base URLs
    #[test]
    fn trims_trailing_slash_from_urls() {
        let mut vars = required_vars();
        vars.insert("ESI_URL", "http://127.0.0.1:1234/");

        let config = load(&vars).unwrap();

        assert_eq!(config.esi_url, "http://127.0.0.1:1234");
    }
}
