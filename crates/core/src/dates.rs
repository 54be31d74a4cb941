//! Due-date parsing and day arithmetic.
//!
//! The backend stores due dates as ISO-8601 strings and is not strict about
//! the exact shape, so parsing here is lenient: RFC 3339 first, then a naive
//! datetime, then a bare date, each assumed UTC when no offset is present.
//! Every consumer (overdue checks, calendar bucketing, display) goes through
//! these helpers so a malformed value degrades the same way everywhere.

use chrono::{Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::task::TaskStatus;
use crate::types::Timestamp;

/// Largest UTC offset accepted for day bucketing, in minutes.
///
/// Real-world offsets stay within ±14h; values beyond this are clamped so a
/// misconfigured environment cannot push [`FixedOffset`] out of range.
pub const MAX_UTC_OFFSET_MINUTES: i32 = 18 * 60;

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse an ISO-8601-ish due date into a UTC instant.
///
/// Accepted shapes, tried in order:
/// - RFC 3339 with offset (`2026-03-01T09:00:00Z`, `...+02:00`)
/// - naive datetime, assumed UTC (`2026-03-01T09:00:00`, with optional
///   fractional seconds)
/// - bare date, assumed midnight UTC (`2026-03-01`)
///
/// Returns `None` for anything else; callers treat that as "no usable date"
/// rather than an error.
pub fn parse_timestamp(value: &str) -> Option<Timestamp> {
    if let Ok(parsed) = chrono::DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN).and_utc());
    }
    None
}

/// Render a due date for display: `YYYY-MM-DD HH:MM` in UTC.
///
/// Unparseable values are returned verbatim so the user still sees whatever
/// the backend stored.
pub fn display_date(value: &str) -> String {
    match parse_timestamp(value) {
        Some(ts) => ts.format("%Y-%m-%d %H:%M").to_string(),
        None => value.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Overdue
// ---------------------------------------------------------------------------

/// Whether a task is overdue at `now`.
///
/// True iff the due date parses to an instant strictly before `now` and the
/// status is not completed. Unparseable due dates are never overdue.
pub fn is_overdue(due_date: &str, status: TaskStatus, now: Timestamp) -> bool {
    if status == TaskStatus::Completed {
        return false;
    }
    match parse_timestamp(due_date) {
        Some(due) => due < now,
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Day bucketing
// ---------------------------------------------------------------------------

/// The fixed offset used for calendar-day math, clamped to a sane range.
fn fixed_offset(utc_offset_minutes: i32) -> FixedOffset {
    let clamped = utc_offset_minutes.clamp(-MAX_UTC_OFFSET_MINUTES, MAX_UTC_OFFSET_MINUTES);
    FixedOffset::east_opt(clamped * 60).expect("clamped offset is within chrono bounds")
}

/// The calendar date of an instant in the configured timezone.
pub fn local_day(ts: Timestamp, utc_offset_minutes: i32) -> NaiveDate {
    ts.with_timezone(&fixed_offset(utc_offset_minutes)).date_naive()
}

/// The calendar date a due date falls on, in the configured timezone.
pub fn due_day(due_date: &str, utc_offset_minutes: i32) -> Option<NaiveDate> {
    parse_timestamp(due_date).map(|ts| local_day(ts, utc_offset_minutes))
}

/// Whether a due date falls on the same calendar day as `now`.
pub fn same_day(due_date: &str, now: Timestamp, utc_offset_minutes: i32) -> bool {
    due_day(due_date, utc_offset_minutes) == Some(local_day(now, utc_offset_minutes))
}

/// Whether a due date falls between today and `days` days from now,
/// inclusive on both ends.
pub fn within_next_days(
    due_date: &str,
    now: Timestamp,
    days: i64,
    utc_offset_minutes: i32,
) -> bool {
    let today = local_day(now, utc_offset_minutes);
    match due_day(due_date, utc_offset_minutes) {
        Some(day) => day >= today && day <= today + Duration::days(days),
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(value: &str) -> Timestamp {
        parse_timestamp(value).expect("test timestamp must parse")
    }

    // -- parse_timestamp -----------------------------------------------------

    #[test]
    fn parses_rfc3339_utc() {
        let ts = parse_timestamp("2026-03-01T09:00:00Z").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap());
    }

    #[test]
    fn parses_rfc3339_with_offset_normalizing_to_utc() {
        let ts = parse_timestamp("2026-03-01T09:00:00+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2026, 3, 1, 7, 0, 0).unwrap());
    }

    #[test]
    fn parses_naive_datetime_as_utc() {
        let ts = parse_timestamp("2026-03-01T09:00:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap());
    }

    #[test]
    fn parses_fractional_seconds() {
        let ts = parse_timestamp("2026-03-01T09:00:00.250").unwrap();
        assert_eq!(ts.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn parses_bare_date_as_midnight_utc() {
        let ts = parse_timestamp("2026-03-01").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("next tuesday").is_none());
        assert!(parse_timestamp("2026-13-01").is_none());
    }

    // -- is_overdue ----------------------------------------------------------

    #[test]
    fn past_due_pending_is_overdue() {
        let now = at("2026-03-02T12:00:00Z");
        assert!(is_overdue("2026-03-01T09:00:00Z", TaskStatus::Pending, now));
        assert!(is_overdue("2026-03-01T09:00:00Z", TaskStatus::InProgress, now));
    }

    #[test]
    fn completed_is_never_overdue() {
        let now = at("2026-03-02T12:00:00Z");
        assert!(!is_overdue("2026-03-01T09:00:00Z", TaskStatus::Completed, now));
        assert!(!is_overdue("1999-01-01", TaskStatus::Completed, now));
    }

    #[test]
    fn future_due_is_not_overdue() {
        let now = at("2026-03-02T12:00:00Z");
        assert!(!is_overdue("2026-03-03T09:00:00Z", TaskStatus::Pending, now));
    }

    #[test]
    fn unparseable_due_fails_open() {
        let now = at("2026-03-02T12:00:00Z");
        assert!(!is_overdue("soon", TaskStatus::Pending, now));
        assert!(!is_overdue("", TaskStatus::Pending, now));
    }

    #[test]
    fn toggling_to_completed_clears_overdue() {
        let now = at("2026-03-02T12:00:00Z");
        let due = "2026-03-01T09:00:00Z";
        assert!(is_overdue(due, TaskStatus::Pending, now));
        assert!(!is_overdue(due, TaskStatus::Completed, now));
    }

    // -- display_date --------------------------------------------------------

    #[test]
    fn display_date_formats_parseable_values() {
        assert_eq!(display_date("2026-03-01T09:05:00Z"), "2026-03-01 09:05");
        assert_eq!(display_date("2026-03-01"), "2026-03-01 00:00");
    }

    #[test]
    fn display_date_passes_garbage_through() {
        assert_eq!(display_date("soon"), "soon");
    }

    // -- day bucketing -------------------------------------------------------

    #[test]
    fn local_day_shifts_across_midnight_with_positive_offset() {
        let ts = at("2026-03-01T23:30:00Z");
        assert_eq!(
            local_day(ts, 120),
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
        );
        assert_eq!(local_day(ts, 0), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
    }

    #[test]
    fn local_day_shifts_back_with_negative_offset() {
        let ts = at("2026-03-01T00:30:00Z");
        assert_eq!(
            local_day(ts, -60),
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()
        );
    }

    #[test]
    fn extreme_offsets_are_clamped() {
        let ts = at("2026-03-01T12:00:00Z");
        // Would be out of range for FixedOffset if taken literally.
        let day = local_day(ts, 10_000_000);
        assert_eq!(day, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
    }

    #[test]
    fn same_day_respects_offset() {
        let now = at("2026-03-02T00:30:00Z");
        // 23:30 UTC the day before is the same local day at +02:00.
        assert!(same_day("2026-03-01T23:30:00Z", now, 120));
        assert!(!same_day("2026-03-01T23:30:00Z", now, 0));
    }

    #[test]
    fn within_next_days_is_inclusive_on_both_ends() {
        let now = at("2026-03-02T12:00:00Z");
        assert!(within_next_days("2026-03-02T23:00:00Z", now, 7, 0));
        assert!(within_next_days("2026-03-09T01:00:00Z", now, 7, 0));
        assert!(!within_next_days("2026-03-10T01:00:00Z", now, 7, 0));
        assert!(!within_next_days("2026-03-01T09:00:00Z", now, 7, 0));
    }

    #[test]
    fn within_next_days_rejects_unparseable() {
        let now = at("2026-03-02T12:00:00Z");
        assert!(!within_next_days("whenever", now, 7, 0));
    }
}
