//! Conditional ESI requests for the entities the cache mirrors.
//!
//! ESI marks every response with an `ETag` and an `Expires` header. Sending the stored
//! `ETag` back as `If-None-Match` lets ESI answer 304 without a body when nothing changed.

use std::{future::Future, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use eve_esi::model::{alliance::Alliance, character::Character, corporation::Corporation};
use reqwest::{
    header::{HeaderMap, ETAG, EXPIRES, IF_NONE_MATCH},
    StatusCode,
};
use serde::de::DeserializeOwned;

use crate::server::{
    error::{eve::EveError, Error},
    model::eve::{EsiFetch, Fetched},
};

/// Source of fresh copies of cached entities.
pub trait EntityFetcher: Send + Sync {
    /// Fetches an alliance, conditionally on `etag` when one is stored.
    fn fetch_alliance(
        &self,
        alliance_id: i64,
        etag: Option<&str>,
    ) -> impl Future<Output = Result<EsiFetch<Alliance>, Error>> + Send;

    /// Fetches a corporation, conditionally on `etag` when one is stored.
    fn fetch_corporation(
        &self,
        corporation_id: i64,
        etag: Option<&str>,
    ) -> impl Future<Output = Result<EsiFetch<Corporation>, Error>> + Send;

    /// Fetches a character, conditionally on `etag` when one is stored.
    fn fetch_character(
        &self,
        character_id: i64,
        etag: Option<&str>,
    ) -> impl Future<Output = Result<EsiFetch<Character>, Error>> + Send;
}

/// Upper bound on a single ESI request, the entity's lock is held for its duration.
pub const ESI_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// ESI client making conditional GET requests.
#[derive(Clone)]
pub struct EsiClient {
    http: reqwest::Client,
    esi_url: Arc<str>,
}

impl EsiClient {
    /// Creates a client for the ESI instance at `esi_url`, e.g. `https://esi.evetech.net/latest`.
    ///
    /// ESI requires a `User-Agent` identifying the application and a way to contact its
    /// developer.
    pub fn new(esi_url: &str, user_agent: &str) -> Result<Self, Error> {
        Self::with_timeout(esi_url, user_agent, ESI_REQUEST_TIMEOUT)
    }

    /// Creates a client whose requests fail once they take longer than `timeout`.
    pub fn with_timeout(
        esi_url: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            esi_url: Arc::from(esi_url.trim_end_matches('/')),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        etag: Option<&str>,
    ) -> Result<EsiFetch<T>, Error> {
        let url = format!("{}{}", self.esi_url, path);

        let mut request = self.http.get(&url);
        if let Some(etag) = etag {
            request = request.header(IF_NONE_MATCH, etag);
        }

        let response = request.send().await?;

        match response.status() {
            StatusCode::NOT_MODIFIED => {
                tracing::debug!(url = %url, "ESI reported entity not modified");

                Ok(EsiFetch::NotModified)
            }
            StatusCode::NOT_FOUND => {
                tracing::debug!(url = %url, "ESI reported entity not found");

                Ok(EsiFetch::NotFound)
            }
            status if status.is_success() => {
                let etag = header_value(response.headers(), ETAG).map(str::to_string);
                let expires = header_value(response.headers(), EXPIRES).and_then(parse_http_date);
                let model = response.json::<T>().await?;

                Ok(EsiFetch::Fresh(Fetched {
                    model,
                    etag,
                    expires,
                }))
            }
            status => Err(EveError::UnexpectedStatus {
                url,
                status: status.as_u16(),
            }
            .into()),
        }
    }
}

impl EntityFetcher for EsiClient {
    async fn fetch_alliance(
        &self,
        alliance_id: i64,
        etag: Option<&str>,
    ) -> Result<EsiFetch<Alliance>, Error> {
        self.get(&format!("/alliances/{}", alliance_id), etag).await
    }

    async fn fetch_corporation(
        &self,
        corporation_id: i64,
        etag: Option<&str>,
    ) -> Result<EsiFetch<Corporation>, Error> {
        self.get(&format!("/corporations/{}", corporation_id), etag)
            .await
    }

    async fn fetch_character(
        &self,
        character_id: i64,
        etag: Option<&str>,
    ) -> Result<EsiFetch<Character>, Error> {
        self.get(&format!("/characters/{}", character_id), etag)
            .await
    }
}

fn header_value(headers: &HeaderMap, name: reqwest::header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Parses an HTTP date such as `Wed, 21 Oct 2015 07:28:00 GMT`.
fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .map(|date| date.with_timezone(&Utc))
        .ok()
}
