// File: ./src/model/time.rs
// Wall-clock helpers shared by the normalizer and the range helpers.
use chrono::{DateTime, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// Interprets a wall-clock value in the local zone.
///
/// Times inside a DST gap move forward one hour; ambiguous times resolve to
/// the earlier instant.
pub fn to_local(naive: NaiveDateTime) -> Option<DateTime<Local>> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => Local
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest(),
    }
}

/// Local midnight at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> Option<DateTime<Local>> {
    to_local(date.and_time(NaiveTime::MIN))
}

/// 23:59:59.999 local on `date`.
pub fn end_of_day(date: NaiveDate) -> Option<DateTime<Local>> {
    let last = NaiveTime::from_hms_milli_opt(23, 59, 59, 999)?;
    to_local(date.and_time(last))
}
