//! Time utilities: uptime tracking and lenient ISO-8601 parsing

use std::time::Instant;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const SECONDS_PER_DAY: i64 = 86_400;

/// Server start time for uptime tracking
static SERVER_START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// Initialize server start time (call once at startup)
pub fn init_server_time() {
    SERVER_START.get_or_init(Instant::now);
}

/// Get server uptime in seconds
pub fn uptime_secs() -> u64 {
    SERVER_START
        .get()
        .map(|start| start.elapsed().as_secs())
        .unwrap_or(0)
}

/// Whole days from `now` until `then`, rounded towards negative infinity.
///
/// Something due in 36 hours is 1 day away; something 12 hours overdue is
/// -1 days away.
pub fn days_until(then: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (then - now).num_seconds().div_euclid(SECONDS_PER_DAY)
}

/// Midnight UTC of a calendar date
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

#[derive(Debug, thiserror::Error)]
#[error("invalid ISO-8601 timestamp: {0:?}")]
pub struct TimestampError(pub String);

/// Parse an ISO-8601 timestamp.
///
/// Accepts RFC 3339 with an offset, a naive date-time (read as UTC) and a bare
/// `YYYY-MM-DD` date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(start_of_day)
        .map_err(|_| TimestampError(raw.to_string()))
}

/// Serde `deserialize_with` helpers built on [`parse_timestamp`]
pub mod iso8601 {
    use super::*;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }

    /// `null` or missing becomes `None`
    pub mod option {
        use super::*;

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| parse_timestamp(&raw).map_err(serde::de::Error::custom))
                .transpose()
        }
    }

    /// For partial updates: a missing key stays `None` (via `#[serde(default)]`),
    /// an explicit `null` becomes `Some(None)`.
    pub mod patch {
        use super::*;

        pub fn deserialize<'de, D>(
            deserializer: D,
        ) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            super::option::deserialize(deserializer).map(Some)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn parses_rfc3339_with_offset() {
        let parsed = parse_timestamp("2026-10-19T12:00:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 10, 19, 10, 0, 0).unwrap());
    }

    #[test]
    fn parses_naive_datetime_as_utc() {
        let parsed = parse_timestamp("2026-10-19T08:30:15.250000").unwrap();
        assert_eq!(
            parsed,
            Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 15).unwrap() + Duration::milliseconds(250)
        );
        assert!(parse_timestamp("2026-10-19 08:30:15").is_ok());
    }

    #[test]
    fn parses_bare_date_as_midnight() {
        let parsed = parse_timestamp("2026-10-24").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 10, 24, 0, 0, 0).unwrap());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("next tuesday").is_err());
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn days_until_floors_towards_negative_infinity() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        assert_eq!(days_until(now + Duration::hours(36), now), 1);
        assert_eq!(days_until(now + Duration::hours(23), now), 0);
        assert_eq!(days_until(now - Duration::hours(12), now), -1);
        assert_eq!(days_until(now - Duration::days(3), now), -3);
    }
}
