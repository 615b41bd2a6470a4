use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// Calendar fields derived from a raw source timestamp. Each field is
/// extracted independently and may be absent on its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DerivedDate {
    pub date: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub weekday: Option<String>,
}

impl DerivedDate {
    pub fn from_timestamp(timestamp: Option<&str>) -> Self {
        match timestamp {
            Some(raw) => DerivedDate {
                date: extract_date(raw),
                year: extract_year(raw),
                month: extract_month(raw),
                day: extract_day(raw),
                weekday: extract_weekday(raw),
            },
            None => DerivedDate::default(),
        }
    }
}

/// Structured parse of the timestamp formats seen in timeline exports:
/// RFC 3339 (trailing `Z` treated as UTC), offset-less date-times, and
/// bare dates. Formats are tried in order, first success wins.
fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.and_utc().fixed_offset());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc().fixed_offset())
}

/// YYYY-MM-DD, falling back to the first 10 bytes of the raw string.
pub fn extract_date(raw: &str) -> Option<String> {
    match parse_timestamp(raw) {
        Some(dt) => Some(dt.format("%Y-%m-%d").to_string()),
        None => raw.get(0..10).map(str::to_string),
    }
}

fn extract_year(raw: &str) -> Option<i32> {
    match parse_timestamp(raw) {
        Some(dt) => Some(dt.year()),
        None => raw.get(0..4).and_then(|s| s.parse().ok()),
    }
}

fn extract_month(raw: &str) -> Option<u32> {
    match parse_timestamp(raw) {
        Some(dt) => Some(dt.month()),
        None => raw.get(5..7).and_then(|s| s.parse().ok()),
    }
}

fn extract_day(raw: &str) -> Option<u32> {
    match parse_timestamp(raw) {
        Some(dt) => Some(dt.day()),
        None => raw.get(8..10).and_then(|s| s.parse().ok()),
    }
}

/// Full weekday name. Structured parse only; no substring fallback.
fn extract_weekday(raw: &str) -> Option<String> {
    parse_timestamp(raw).map(|dt| dt.format("%A").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc3339_timestamp_derives_all_fields() {
        let derived = DerivedDate::from_timestamp(Some("2024-01-15T08:00:00Z"));
        assert_eq!(derived.date.as_deref(), Some("2024-01-15"));
        assert_eq!(derived.year, Some(2024));
        assert_eq!(derived.month, Some(1));
        assert_eq!(derived.day, Some(15));
        assert_eq!(derived.weekday.as_deref(), Some("Monday"));
    }

    #[test]
    fn fractional_seconds_and_offsets_parse() {
        let derived = DerivedDate::from_timestamp(Some("2023-06-10T23:30:00.123+02:00"));
        assert_eq!(derived.date.as_deref(), Some("2023-06-10"));
        assert_eq!(derived.weekday.as_deref(), Some("Saturday"));
    }

    #[test]
    fn offsetless_and_bare_date_strings_parse() {
        let derived = DerivedDate::from_timestamp(Some("2024-03-01T12:00:00"));
        assert_eq!(derived.date.as_deref(), Some("2024-03-01"));
        assert_eq!(derived.weekday.as_deref(), Some("Friday"));

        let derived = DerivedDate::from_timestamp(Some("2024-03-01"));
        assert_eq!(derived.date.as_deref(), Some("2024-03-01"));
        assert_eq!(derived.weekday.as_deref(), Some("Friday"));
    }

    #[test]
    fn unparseable_string_falls_back_to_substrings() {
        let derived = DerivedDate::from_timestamp(Some("2024-01-15 around breakfast"));
        assert_eq!(derived.date.as_deref(), Some("2024-01-15"));
        assert_eq!(derived.year, Some(2024));
        assert_eq!(derived.month, Some(1));
        assert_eq!(derived.day, Some(15));
        // weekday has no substring fallback
        assert_eq!(derived.weekday, None);
    }

    #[test]
    fn short_or_garbage_strings_yield_nothing() {
        let derived = DerivedDate::from_timestamp(Some("abc"));
        assert_eq!(derived, DerivedDate::default());

        let derived = DerivedDate::from_timestamp(Some("not-a-date!!"));
        assert_eq!(derived.year, None);
        assert_eq!(derived.weekday, None);
    }

    #[test]
    fn absent_timestamp_yields_empty_fields() {
        assert_eq!(DerivedDate::from_timestamp(None), DerivedDate::default());
    }
}
