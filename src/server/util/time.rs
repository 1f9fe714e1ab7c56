//! Cache freshness calculations for ESI-backed entities.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// How long an entity is cached when ESI does not send an `Expires` header.
pub const DEFAULT_CACHE_TTL_HOURS: i64 = 24;

/// Calculates the `cached_until` timestamp for a freshly fetched entity.
///
/// Uses ESI's `Expires` header when present, otherwise `now` plus
/// [`DEFAULT_CACHE_TTL_HOURS`]. Returned as naive UTC as stored in the database.
pub fn cache_expiry(expires: Option<DateTime<Utc>>, now: DateTime<Utc>) -> NaiveDateTime {
    expires
        .unwrap_or_else(|| now + Duration::hours(DEFAULT_CACHE_TTL_HOURS))
        .naive_utc()
}

/// A cached entity may be served without contacting ESI only while `cached_until` is
/// strictly in the future.
pub fn is_cache_fresh(cached_until: NaiveDateTime, now: DateTime<Utc>) -> bool {
    cached_until > now.naive_utc()
}
