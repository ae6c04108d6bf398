//! Relative date resolution
//!
//! Lenient by policy: an unrecognised or unparseable token resolves to
//! today instead of failing the action. Calendar dates understand
//! `next <anything>` as "seven days from today"; task due dates do not, so
//! `next friday` as a due date falls through to today.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

const NAIVE_DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

/// Resolve a calendar `date` token to a local wall-clock start
///
/// Relative tokens and plain dates resolve to midnight; a full timestamp
/// keeps its time of day, converted into the zone of `now`.
pub fn resolve_event_start_date<Z: TimeZone>(token: Option<&str>, now: &DateTime<Z>) -> NaiveDateTime {
    let today = now.date_naive();
    let midnight = |date: NaiveDate| date.and_time(NaiveTime::MIN);

    let Some(raw) = token.map(str::trim).filter(|t| !t.is_empty()) else {
        return midnight(today);
    };

    match raw.to_lowercase().as_str() {
        "today" => return midnight(today),
        "tomorrow" => return midnight(today + Duration::days(1)),
        lower if lower.starts_with("next ") => return midnight(today + Duration::days(7)),
        _ => {}
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return midnight(date);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(&now.timezone()).naive_local();
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .unwrap_or_else(|| midnight(today))
}

/// Resolve a task `dueDate` token to a calendar date
pub fn resolve_task_due_date<Z: TimeZone>(token: &str, now: &DateTime<Z>) -> NaiveDate {
    let today = now.date_naive();
    let raw = token.trim();

    match raw.to_lowercase().as_str() {
        "today" => return today,
        "tomorrow" => return today + Duration::days(1),
        _ => {}
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.date_naive();
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map_or(today, |datetime| datetime.date())
}

/// Parse `HH:MM` (seconds tolerated) in 24h form
#[must_use]
pub fn parse_hh_mm(value: &str) -> Option<NaiveTime> {
    let mut parts = value.trim().split(':');
    let hours = parts.next()?.trim().parse::<u32>().ok()?;
    let minutes = parts.next()?.trim().parse::<u32>().ok()?;
    NaiveTime::from_hms_opt(hours, minutes, 0)
}

/// Replace the time of day of `base` with `time` when it parses
///
/// An absent or invalid time leaves `base` unchanged.
#[must_use]
pub fn apply_time(base: NaiveDateTime, time: Option<&str>) -> NaiveDateTime {
    time.and_then(parse_hh_mm).map_or(base, |parsed| base.date().and_time(parsed))
}

/// Attach `zone` to a wall-clock time
///
/// Ambiguous times (DST fall-back) take the earlier instant; times inside a
/// spring-forward gap move one hour later.
pub fn localize<Z: TimeZone>(zone: &Z, naive: NaiveDateTime) -> DateTime<Z> {
    zone.from_local_datetime(&naive)
        .earliest()
        .or_else(|| zone.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .unwrap_or_else(|| zone.from_utc_datetime(&naive))
}
