//! Kickoff time windows.
//!
//! A football "weekend" runs Thursday 00:00 UTC to the following Tuesday
//! 00:00 UTC, which captures Thursday-night, Sunday and Monday-night games.
//! Timestamp parsing here never fails loudly: a commence time that cannot
//! be read simply does not match any window.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Days from the window's Monday to its start (Thursday).
const START_OFFSET_DAYS: i64 = 3;
/// Days from the window's Monday to its end (next Tuesday).
const END_OFFSET_DAYS: i64 = 8;

/// Return the `[start, end)` weekend window for the week containing `now`.
///
/// The anchor is Monday 00:00 UTC on or before `now`. Early in the week
/// (Monday to Wednesday) `now` sits before `start`.
pub fn week_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let days_since_monday = i64::from(now.weekday().num_days_from_monday());
    let monday = (now.date_naive() - Duration::days(days_since_monday))
        .and_time(NaiveTime::MIN)
        .and_utc();
    (
        monday + Duration::days(START_OFFSET_DAYS),
        monday + Duration::days(END_OFFSET_DAYS),
    )
}

/// Parse an upstream `commence_time`.
///
/// Accepts RFC 3339 (a trailing `Z` is UTC) and offset-less ISO date-times,
/// which are read as UTC.
pub fn parse_commence(commence: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(commence) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(commence, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// True if `commence` falls in `[start, end)`. Unparseable input is false.
pub fn in_window(commence: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    match parse_commence(commence) {
        Some(dt) => start <= dt && dt < end,
        None => false,
    }
}

/// True if `commence` is on `date` in UTC. Unparseable input is false.
pub fn is_same_utc_date(commence: &str, date: NaiveDate) -> bool {
    parse_commence(commence).is_some_and(|dt| dt.date_naive() == date)
}
