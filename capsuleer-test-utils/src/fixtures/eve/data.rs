//! ESI payloads and cache timestamps with standard test values.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use eve_esi::model::{alliance::Alliance, character::Character, corporation::Corporation};

/// A `cached_until` one hour in the future; rows using it are served without an ESI request.
pub fn fresh_cache() -> NaiveDateTime {
    (Utc::now() + Duration::hours(1)).naive_utc()
}

/// A `cached_until` one hour in the past; rows using it must be revalidated against ESI.
pub fn expired_cache() -> NaiveDateTime {
    (Utc::now() - Duration::hours(1)).naive_utc()
}

pub fn mock_alliance() -> Alliance {
    Alliance {
        creator_corporation_id: 98784257,
        creator_id: 2114794365,
        faction_id: None,
        date_founded: DateTime::parse_from_rfc3339("2024-09-25T06:25:58Z")
            .unwrap()
            .with_timezone(&Utc),
        executor_corporation_id: Some(98787881),
        name: "Autumn.".to_string(),
        ticker: "AUTMN".to_string(),
    }
}

pub fn mock_corporation(alliance_id: Option<i64>) -> Corporation {
    Corporation {
        alliance_id,
        ceo_id: 2114794365,
        creator_id: 2114794365,
        date_founded: Some(
            DateTime::parse_from_rfc3339("2024-10-07T21:43:09Z")
                .unwrap()
                .with_timezone(&Utc),
        ),
        description: None,
        home_station_id: Some(60003760),
        member_count: 21,
        name: "The Order of Autumn".to_string(),
        shares: Some(1000),
        tax_rate: 0.0,
        ticker: "F4LL.".to_string(),
        url: Some("https://autumn-order.com".to_string()),
        war_eligible: Some(true),
        faction_id: None,
    }
}

pub fn mock_character(corporation_id: i64) -> Character {
    Character {
        alliance_id: None,
        birthday: DateTime::parse_from_rfc3339("2018-12-20T16:11:54Z")
            .unwrap()
            .with_timezone(&Utc),
        bloodline_id: 7,
        corporation_id,
        description: Some("description".to_string()),
        faction_id: None,
        gender: "male".to_string(),
        name: "Hyziri".to_string(),
        race_id: 8,
        security_status: Some(-0.100373643),
        title: Some("Title".to_string()),
    }
}
