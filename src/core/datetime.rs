//! Date arithmetic - parsing, calendar arithmetic and day-level comparisons.
//!
//! Every function here is pure. Timestamps are local wall-clock times
//! (`NaiveDateTime`) exactly as the user entered them; values carrying an
//! explicit UTC offset are normalized to UTC on parse. Malformed input is
//! rejected with [`Error::InvalidTimestamp`] instead of being coerced to "now".

use crate::errors::{Error, Result};
use chrono::{
    DateTime, Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta,
};

const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a timestamp string.
///
/// Accepted forms:
/// - `2025-06-01T09:00:00` (optionally with fractional seconds)
/// - `2025-06-01T09:00`
/// - `2025-06-01 09:00:00`
/// - RFC 3339 with an offset, e.g. `2025-06-01T09:00:00Z` (converted to UTC)
/// - a bare date `2025-06-01`, read as midnight
///
/// # Errors
/// Returns [`Error::InvalidTimestamp`] for anything else.
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime> {
    let trimmed = input.trim();

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(with_offset.naive_utc());
    }

    for format in NAIVE_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(ts);
        }
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| Error::InvalidTimestamp {
            input: input.to_string(),
        })
}

/// Parses a calendar day. Full timestamps are accepted and truncated to their day.
///
/// # Errors
/// Returns [`Error::InvalidTimestamp`] if the input is not a date or timestamp.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .or_else(|_| parse_timestamp(input).map(|ts| ts.date()))
}

/// Adds (or with a negative value, subtracts) minutes.
pub fn add_minutes(ts: NaiveDateTime, minutes: i64) -> Result<NaiveDateTime> {
    TimeDelta::try_minutes(minutes)
        .and_then(|delta| ts.checked_add_signed(delta))
        .ok_or(Error::TimestampOutOfRange)
}

/// Adds (or with a negative value, subtracts) whole days, keeping the time of day.
pub fn add_days(ts: NaiveDateTime, days: i64) -> Result<NaiveDateTime> {
    TimeDelta::try_days(days)
        .and_then(|delta| ts.checked_add_signed(delta))
        .ok_or(Error::TimestampOutOfRange)
}

/// Adds (or subtracts) calendar months.
///
/// When the target month is shorter than the source day-of-month the result
/// is clamped to the target month's last day: Jan 31 + 1 month is Feb 28
/// (Feb 29 in leap years), never Mar 3.
pub fn add_months(ts: NaiveDateTime, months: i64) -> Result<NaiveDateTime> {
    let magnitude = u32::try_from(months.unsigned_abs()).map_err(|_| Error::TimestampOutOfRange)?;
    let shifted = if months >= 0 {
        ts.checked_add_months(Months::new(magnitude))
    } else {
        ts.checked_sub_months(Months::new(magnitude))
    };
    shifted.ok_or(Error::TimestampOutOfRange)
}

/// True when both timestamps fall on the same calendar day.
#[must_use]
pub fn is_same_day(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a.date() == b.date()
}

/// Strictly earlier.
#[must_use]
pub fn is_before(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a < b
}

/// Strictly later.
#[must_use]
pub fn is_after(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a > b
}

/// `a` is on `b`'s calendar day or any later moment.
#[must_use]
pub fn is_same_day_or_after(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a >= b || is_same_day(a, b)
}

/// `a` is on `b`'s calendar day or any earlier moment.
#[must_use]
pub fn is_same_day_or_before(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a <= b || is_same_day(a, b)
}

/// Monday 00:00:00 through Sunday 23:59:59 of the week containing `ts`.
#[must_use]
pub fn week_range(ts: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
    let date = ts.date();
    let monday = date
        .checked_sub_days(chrono::Days::new(u64::from(
            date.weekday().num_days_from_monday(),
        )))
        .unwrap_or(date);
    let sunday = monday
        .checked_add_days(chrono::Days::new(6))
        .unwrap_or(monday);
    let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    (monday.and_time(NaiveTime::MIN), sunday.and_time(end_of_day))
}

/// Weekday name for `0 = Sunday` through `6 = Saturday`, `None` otherwise.
#[must_use]
pub const fn day_name(day_of_week: u8) -> Option<&'static str> {
    match day_of_week {
        0 => Some("Sunday"),
        1 => Some("Monday"),
        2 => Some("Tuesday"),
        3 => Some("Wednesday"),
        4 => Some("Thursday"),
        5 => Some("Friday"),
        6 => Some("Saturday"),
        _ => None,
    }
}

/// `Jun 01, 2025`
#[must_use]
pub fn format_date(ts: NaiveDateTime) -> String {
    ts.format("%b %d, %Y").to_string()
}

/// `9:05 AM`
#[must_use]
pub fn format_time(ts: NaiveDateTime) -> String {
    ts.format("%-I:%M %p").to_string()
}

/// `Jun 01, 2025 9:05 AM`
#[must_use]
pub fn format_date_time(ts: NaiveDateTime) -> String {
    format!("{} {}", format_date(ts), format_time(ts))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::ts;

    #[test]
    fn test_parse_timestamp_accepts_supported_forms() {
        let expected = ts("2025-06-01T09:00:00");
        assert_eq!(parse_timestamp("2025-06-01T09:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-06-01T09:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-06-01 09:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp(" 2025-06-01T09:00:00.000 ").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-06-01T09:00:00Z").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2025-06-01T11:00:00+02:00").unwrap(),
            expected
        );
        assert_eq!(
            parse_timestamp("2025-06-01").unwrap(),
            ts("2025-06-01T00:00:00")
        );
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        for bad in ["", "yesterday", "2025-13-01", "2025-02-30T10:00:00", "NaN"] {
            let err = parse_timestamp(bad).unwrap_err();
            assert!(
                matches!(err, Error::InvalidTimestamp { ref input } if input == bad),
                "unexpected error for {bad:?}: {err}"
            );
        }
    }

    #[test]
    fn test_parse_date_truncates_timestamps() {
        let day = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(parse_date("2025-01-05").unwrap(), day);
        assert_eq!(parse_date("2025-01-05T23:10:00").unwrap(), day);
        assert!(parse_date("01/05/2025").is_err());
    }

    #[test]
    fn test_add_minutes_and_days() {
        let start = ts("2025-06-01T09:00:00");
        assert_eq!(add_minutes(start, -60).unwrap(), ts("2025-06-01T08:00:00"));
        assert_eq!(add_minutes(start, 900).unwrap(), ts("2025-06-02T00:00:00"));
        assert_eq!(add_days(start, 30).unwrap(), ts("2025-07-01T09:00:00"));
        assert_eq!(add_days(start, -1).unwrap(), ts("2025-05-31T09:00:00"));
    }

    #[test]
    fn test_add_months_clamps_to_month_end() {
        let jan31 = ts("2025-01-31T10:00:00");
        assert_eq!(add_months(jan31, 1).unwrap(), ts("2025-02-28T10:00:00"));
        assert_eq!(add_months(jan31, 2).unwrap(), ts("2025-03-31T10:00:00"));
        assert_eq!(add_months(jan31, 3).unwrap(), ts("2025-04-30T10:00:00"));
        assert_eq!(
            add_months(ts("2024-01-31T10:00:00"), 1).unwrap(),
            ts("2024-02-29T10:00:00")
        );
        assert_eq!(add_months(jan31, -2).unwrap(), ts("2024-11-30T10:00:00"));
    }

    #[test]
    fn test_arithmetic_overflow_is_an_error() {
        let start = ts("2025-06-01T09:00:00");
        assert!(matches!(
            add_days(start, i64::MAX),
            Err(Error::TimestampOutOfRange)
        ));
        assert!(matches!(
            add_months(start, i64::from(u32::MAX) + 1),
            Err(Error::TimestampOutOfRange)
        ));
    }

    #[test]
    fn test_day_level_comparisons() {
        let morning = ts("2025-06-01T08:00:00");
        let evening = ts("2025-06-01T20:00:00");
        let next_day = ts("2025-06-02T01:00:00");

        assert!(is_same_day(morning, evening));
        assert!(!is_same_day(evening, next_day));
        assert!(is_before(morning, evening));
        assert!(is_after(next_day, evening));
        assert!(is_same_day_or_after(morning, evening));
        assert!(!is_same_day_or_after(morning, next_day));
        assert!(is_same_day_or_before(evening, morning));
        assert!(!is_same_day_or_before(next_day, morning));
    }

    #[test]
    fn test_week_range_starts_monday() {
        // 2025-06-04 is a Wednesday
        let (start, end) = week_range(ts("2025-06-04T15:30:00"));
        assert_eq!(start, ts("2025-06-02T00:00:00"));
        assert_eq!(end, ts("2025-06-08T23:59:59"));

        let (start, _) = week_range(ts("2025-06-02T00:00:00"));
        assert_eq!(start, ts("2025-06-02T00:00:00"));
    }

    #[test]
    fn test_day_name_counts_from_sunday() {
        assert_eq!(day_name(0), Some("Sunday"));
        assert_eq!(day_name(3), Some("Wednesday"));
        assert_eq!(day_name(6), Some("Saturday"));
        assert_eq!(day_name(7), None);

        // agrees with chrono's numbering
        let wednesday = ts("2025-06-04T12:00:00").weekday().num_days_from_sunday();
        assert_eq!(day_name(u8::try_from(wednesday).unwrap()), Some("Wednesday"));
    }

    #[test]
    fn test_formatting() {
        let at = ts("2025-06-01T09:05:00");
        assert_eq!(format_date(at), "Jun 01, 2025");
        assert_eq!(format_time(at), "9:05 AM");
        assert_eq!(format_date_time(ts("2025-06-01T21:30:00")), "Jun 01, 2025 9:30 PM");
    }
}
