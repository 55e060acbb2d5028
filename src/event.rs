//! Event records as delivered by an event source.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::types::Recurrence;

/// Formats accepted for a naive `dateTime` value, most specific first.
const NAIVE_DATETIME_FORMATS: [&str; 3] =
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// A calendar event. The grid only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    /// Literal ISO-8601 timestamp as sent by the server.
    pub date_time: String,
    #[serde(default)]
    pub recurrence: Recurrence,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_end_date: Option<String>,
}

impl Event {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        date_time: impl Into<String>,
    ) -> Self {
        Event {
            id: id.into(),
            name: name.into(),
            date_time: date_time.into(),
            recurrence: Recurrence::None,
            notes: String::new(),
            user_id: None,
            completed: None,
            recurrence_end_date: None,
        }
    }

    /// Calendar day the event belongs to.
    ///
    /// Taken from the literal `YYYY-MM-DD` text before the `T` separator, with no
    /// timezone conversion. `None` when that text is not a valid date.
    pub fn day_key(&self) -> Option<NaiveDate> {
        day_key(&self.date_time)
    }

    /// Wall-clock start as written in `date_time`, offset ignored.
    pub fn starts_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.date_time)
    }
}

/// Canonical day of a timestamp string (see [`Event::day_key`]).
pub fn day_key(timestamp: &str) -> Option<NaiveDate> {
    let prefix = timestamp.split('T').next()?;
    let date = NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()?;
    // Only the zero-padded spelling names a day; chrono also takes "2024-4-8"
    (date.format("%Y-%m-%d").to_string() == prefix).then_some(date)
}

/// Parse an RFC 3339 or naive `YYYY-MM-DDTHH:MM[:SS[.f]]` timestamp, keeping its
/// literal wall-clock time.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_key_ignores_offset() {
        let e = Event::new("1", "Late", "2024-04-08T23:30:00-07:00");
        assert_eq!(e.day_key(), NaiveDate::from_ymd_opt(2024, 4, 8));
    }

    #[test]
    fn day_key_without_time_part() {
        assert_eq!(day_key("2024-04-08"), NaiveDate::from_ymd_opt(2024, 4, 8));
    }

    #[test]
    fn day_key_rejects_garbage() {
        assert_eq!(day_key("tomorrow"), None);
        assert_eq!(day_key(""), None);
        assert_eq!(day_key("2024-02-30T10:00:00"), None);
    }

    #[test]
    fn day_key_requires_canonical_prefix() {
        for raw in [
            "2024-4-8T10:00:00",
            "2024-04-8T10:00",
            " 2024-04-08T10:00:00",
            "+2024-04-08T10:00:00",
        ] {
            assert_eq!(day_key(raw), None, "{raw:?}");
        }
    }

    #[test]
    fn starts_at_handles_zulu_and_naive() {
        let z = parse_timestamp("2024-04-08T10:00:00Z").unwrap();
        let naive = parse_timestamp("2024-04-08T10:00").unwrap();
        assert_eq!(z, naive);
        assert!(parse_timestamp("2024-04-08T10:00:00.250").is_some());
    }

    #[test]
    fn deserializes_wire_format() {
        let json = r#"{"id":"7","name":"Swim","dateTime":"2024-04-11T09:30:00",
            "recurrence":"WEEKLY","notes":"bring towel","userId":"u1"}"#;
        let e: Event = serde_json::from_str(json).unwrap();
        assert_eq!(e.recurrence, Recurrence::Weekly);
        assert_eq!(e.user_id.as_deref(), Some("u1"));
        assert_eq!(e.recurrence_end_date, None);
    }

    #[test]
    fn missing_optional_fields_default() {
        let e: Event =
            serde_json::from_str(r#"{"id":"1","name":"x","dateTime":"2024-04-08T10:00:00"}"#)
                .unwrap();
        assert_eq!(e.recurrence, Recurrence::None);
        assert!(e.notes.is_empty());
    }
}
