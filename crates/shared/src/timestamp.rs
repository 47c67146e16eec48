//! Serde helpers for incident timestamps.
//!
//! Timestamps are written as RFC 3339 in UTC, with a fractional part only
//! when the instant has one. On input
//! the RFC 3339 form is accepted alongside the naive `YYYY-MM-DD HH:MM:SS`
//! and `YYYY-MM-DDTHH:MM` forms, which are read as UTC.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{de, Deserialize, Deserializer, Serializer};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

pub fn format(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(value))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp '{raw}'")))
}

pub mod option {
    use super::*;

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => super::serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid timestamp '{raw}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_sql_style_timestamps_as_utc() {
        let parsed = parse("2026-02-11 08:00:00").expect("parse");
        assert_eq!(format(&parsed), "2026-02-11T08:00:00Z");
    }

    #[test]
    fn normalizes_offsets_to_utc() {
        let parsed = parse("2026-02-11T10:30:00+02:00").expect("parse");
        assert_eq!(format(&parsed), "2026-02-11T08:30:00Z");
    }

    #[test]
    fn sub_second_instants_survive_the_wire() {
        let later = parse("2026-02-11T08:00:00.900Z").expect("parse");
        let earlier = parse("2026-02-11T08:00:00.100Z").expect("parse");
        assert_eq!(format(&later), "2026-02-11T08:00:00.900Z");

        let later_again = parse(&format(&later)).expect("reparse");
        let earlier_again = parse(&format(&earlier)).expect("reparse");
        assert_eq!(later_again, later);
        assert!(later_again > earlier_again);
    }

    #[test]
    fn accepts_datetime_local_input() {
        assert!(parse("2026-02-11T08:00").is_some());
        assert!(parse("yesterday").is_none());
    }
}
