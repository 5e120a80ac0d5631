// File: ./src/model/normalizer.rs
//! Turns raw spreadsheet cells into points in time.
//!
//! Three inputs are understood:
//! - cells the decoder already resolved to a date (returned unchanged),
//! - spreadsheet date serials (whole days since the workbook epoch, the
//!   fraction being the time of day),
//! - text in one of a fixed set of date/time layouts.
//!
//! Everything else is [`Unparseable`]. Nothing in here panics.
use super::event::CellValue;
use super::time::to_local;
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Largest serial spreadsheet tools accept (9999-12-31 in the 1900 system).
const MAX_SERIAL: f64 = 2_958_465.0;
const SECONDS_PER_DAY: i64 = 86_400;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y", "%m/%d/%Y"];

/// The cell could not be read as a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("value cannot be read as a date")]
pub struct Unparseable;

/// Epoch convention of the workbook the serials come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateSystem {
    /// Serial 1 is 1900-01-01, with the phantom 1900-02-29 at serial 60.
    #[default]
    #[serde(rename = "1900")]
    Excel1900,
    /// Serial 0 is 1904-01-01.
    #[serde(rename = "1904")]
    Mac1904,
}

/// Normalizes a cell using the 1900 date system.
pub fn normalize(value: &CellValue) -> Result<DateTime<Local>, Unparseable> {
    normalize_with(value, DateSystem::default())
}

pub fn normalize_with(value: &CellValue, system: DateSystem) -> Result<DateTime<Local>, Unparseable> {
    match value {
        CellValue::DateTime(dt) => Ok(*dt),
        CellValue::Number(serial) => {
            let naive = serial_to_naive(*serial, system)?;
            to_local(naive).ok_or(Unparseable)
        }
        CellValue::Text(text) => parse_text(text),
        CellValue::Empty | CellValue::Bool(_) => Err(Unparseable),
    }
}

/// Converts a spreadsheet date serial to a wall-clock date and time.
///
/// Time of day is floored to whole seconds, except that a remainder above
/// 0.9999 s rounds up (possibly into the next day).
pub fn serial_to_naive(serial: f64, system: DateSystem) -> Result<NaiveDateTime, Unparseable> {
    if !serial.is_finite() || !(0.0..=MAX_SERIAL).contains(&serial) {
        return Err(Unparseable);
    }

    let mut days = serial.trunc() as i64;
    let exact = (serial - days as f64) * SECONDS_PER_DAY as f64;
    let mut seconds = exact.floor() as i64;
    if exact - seconds as f64 > 0.9999 {
        seconds += 1;
        if seconds == SECONDS_PER_DAY {
            seconds = 0;
            days += 1;
        }
    }

    let date = match system {
        DateSystem::Excel1900 => match days {
            // 1900 is treated as a leap year; serial 60 is the missing Feb 29.
            0..=59 => ymd(1899, 12, 31)?.checked_add_signed(Duration::days(days)),
            60 => ymd(1900, 3, 1).ok(),
            _ => ymd(1899, 12, 30)?.checked_add_signed(Duration::days(days)),
        },
        DateSystem::Mac1904 => ymd(1904, 1, 1)?.checked_add_signed(Duration::days(days)),
    }
    .ok_or(Unparseable)?;

    let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds as u32, 0).ok_or(Unparseable)?;
    Ok(date.and_time(time))
}

fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate, Unparseable> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or(Unparseable)
}

fn parse_text(raw: &str) -> Result<DateTime<Local>, Unparseable> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Unparseable);
    }

    // Timestamps with an explicit offset name an exact instant.
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Local));
    }

    let text = trimmed.replacen('T', " ", 1);

    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&text, fmt) {
            return to_local(naive).ok_or(Unparseable);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&text, fmt) {
            return to_local(date.and_time(NaiveTime::MIN)).ok_or(Unparseable);
        }
    }

    Err(Unparseable)
}
