// File: ./src/model/event.rs
// Core event and raw spreadsheet cell types.
use chrono::{DateTime, Local};
use std::collections::HashMap;

/// A single calendar entry loaded from a spreadsheet.
///
/// `start` is always resolved; rows without one never become an `Event`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub subject: String,
    pub location: String,
    pub start: DateTime<Local>,
    pub end: Option<DateTime<Local>>,
}

impl Event {
    pub fn new(subject: impl Into<String>, start: DateTime<Local>) -> Self {
        Self {
            subject: subject.into(),
            location: String::new(),
            start,
            end: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_end(mut self, end: DateTime<Local>) -> Self {
        self.end = Some(end);
        self
    }

    /// End used for display. Events without an end are zero-length instants.
    pub fn effective_end(&self) -> DateTime<Local> {
        self.end.unwrap_or(self.start)
    }
}

/// A raw cell as it comes out of the spreadsheet decoder.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    /// Plain number. Date columns store spreadsheet date serials here.
    Number(f64),
    Text(String),
    /// A date the source already resolved to a point in time.
    DateTime(DateTime<Local>),
    Bool(bool),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Text shown for the cell when it lands in a text field (subject, location).
    ///
    /// Whole numbers print without a fractional part, the way spreadsheet
    /// tools display them.
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            CellValue::Number(n) => n.to_string(),
            CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            CellValue::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<DateTime<Local>> for CellValue {
    fn from(dt: DateTime<Local>) -> Self {
        CellValue::DateTime(dt)
    }
}

/// One spreadsheet row, keyed by the header label of each column.
pub type RawRow = HashMap<String, CellValue>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_effective_end_falls_back_to_start() {
        let start = Local.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        let ev = Event::new("Standup", start);
        assert_eq!(ev.effective_end(), start);

        let end = Local.with_ymd_and_hms(2024, 6, 1, 11, 0, 0).unwrap();
        let ev = ev.with_end(end);
        assert_eq!(ev.effective_end(), end);
    }

    #[test]
    fn test_display_text() {
        assert_eq!(CellValue::Number(42.0).display_text(), "42");
        assert_eq!(CellValue::Number(2.5).display_text(), "2.5");
        assert_eq!(CellValue::Empty.display_text(), "");
        assert_eq!(CellValue::from("Room 4").display_text(), "Room 4");
        assert_eq!(CellValue::Bool(true).display_text(), "true");
    }
}
