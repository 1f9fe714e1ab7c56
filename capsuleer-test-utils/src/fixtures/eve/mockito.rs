//! ESI HTTP mock endpoint creation utilities.
//!
//! Fresh endpoints answer 200 with an `ETag` of [`MOCK_FRESH_ETAG`] and an `Expires`
//! header, not-modified endpoints only answer when `If-None-Match` carries the expected
//! tag. Every mock verifies it was called exactly `expected_requests` times.

use chrono::{DateTime, Duration, Utc};
use eve_esi::model::{alliance::Alliance, character::Character, corporation::Corporation};
use mockito::{Matcher, Mock};
use serde::Serialize;

use crate::{constant::MOCK_FRESH_ETAG, fixtures::eve::EveFixtures};

/// Formats a timestamp as an HTTP date, the format ESI uses for `Expires`.
pub fn http_date(date: DateTime<Utc>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

impl<'a> EveFixtures<'a> {
    /// Create a 200 endpoint at `path` returning `body` with optional `ETag` & `Expires`.
    pub fn create_fresh_endpoint<T: Serialize>(
        &mut self,
        path: &str,
        body: &T,
        etag: Option<&str>,
        expires: Option<DateTime<Utc>>,
        expected_requests: usize,
    ) -> Mock {
        let mut mock = self
            .setup
            .server
            .mock("GET", path)
            .with_status(200)
            .with_header("content-type", "application/json");

        if let Some(etag) = etag {
            mock = mock.with_header("etag", etag);
        }
        if let Some(expires) = expires {
            mock = mock.with_header("expires", &http_date(expires));
        }

        mock.with_body(serde_json::to_string(body).unwrap())
            .expect(expected_requests)
            .create()
    }

    /// Create a 200 endpoint at `path` answering only requests without `If-None-Match`.
    ///
    /// Stands in for ESI when nothing is stored yet, so there is no tag to send.
    pub fn create_unconditional_endpoint<T: Serialize>(
        &mut self,
        path: &str,
        body: &T,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock("GET", path)
            .match_header("if-none-match", Matcher::Missing)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_header("etag", MOCK_FRESH_ETAG)
            .with_header("expires", &http_date(Utc::now() + Duration::hours(1)))
            .with_body(serde_json::to_string(body).unwrap())
            .expect(expected_requests)
            .create()
    }

    /// Create a 304 endpoint at `path` answering only requests with `If-None-Match: etag`.
    pub fn create_not_modified_endpoint(
        &mut self,
        path: &str,
        etag: &str,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock("GET", path)
            .match_header("if-none-match", etag)
            .with_status(304)
            .with_header("etag", etag)
            .expect(expected_requests)
            .create()
    }

    /// Create a 404 endpoint at `path` with ESI's error body.
    pub fn create_not_found_endpoint(&mut self, path: &str, expected_requests: usize) -> Mock {
        self.setup
            .server
            .mock("GET", path)
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"Not found"}"#)
            .expect(expected_requests)
            .create()
    }

    /// Fresh alliance endpoint at `/alliances/{alliance_id}` cached for one hour.
    pub fn create_alliance_endpoint(
        &mut self,
        alliance_id: i64,
        alliance: Alliance,
        expected_requests: usize,
    ) -> Mock {
        let path = format!("/alliances/{}", alliance_id);
        let expires = Utc::now() + Duration::hours(1);

        self.create_fresh_endpoint(
            &path,
            &alliance,
            Some(MOCK_FRESH_ETAG),
            Some(expires),
            expected_requests,
        )
    }

    /// Fresh corporation endpoint at `/corporations/{corporation_id}` cached for one hour.
    pub fn create_corporation_endpoint(
        &mut self,
        corporation_id: i64,
        corporation: Corporation,
        expected_requests: usize,
    ) -> Mock {
        let path = format!("/corporations/{}", corporation_id);
        let expires = Utc::now() + Duration::hours(1);

        self.create_fresh_endpoint(
            &path,
            &corporation,
            Some(MOCK_FRESH_ETAG),
            Some(expires),
            expected_requests,
        )
    }

    /// Fresh character endpoint at `/characters/{character_id}` cached for one hour.
    pub fn create_character_endpoint(
        &mut self,
        character_id: i64,
        character: Character,
        expected_requests: usize,
    ) -> Mock {
        let path = format!("/characters/{}", character_id);
        let expires = Utc::now() + Duration::hours(1);

        self.create_fresh_endpoint(
            &path,
            &character,
            Some(MOCK_FRESH_ETAG),
            Some(expires),
            expected_requests,
        )
    }
}
