// File: ./src/ingest.rs
// Maps decoded spreadsheet rows onto events.
use crate::model::{CellValue, DateSystem, Event, RawRow, normalize_with};
use serde::{Deserialize, Serialize};

fn default_subject() -> String {
    "Subject".to_string()
}
fn default_location() -> String {
    "Location".to_string()
}
fn default_start() -> String {
    "Start".to_string()
}
fn default_end() -> String {
    "End".to_string()
}

/// Header labels of the four columns an event is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLabels {
    #[serde(default = "default_subject")]
    pub subject: String,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default = "default_start")]
    pub start: String,
    #[serde(default = "default_end")]
    pub end: String,
}

impl Default for ColumnLabels {
    fn default() -> Self {
        Self {
            subject: default_subject(),
            location: default_location(),
            start: default_start(),
            end: default_end(),
        }
    }
}

/// Result of mapping one batch of rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Events in the order their rows appeared.
    pub events: Vec<Event>,
    /// Rows dropped because the start cell was missing or unreadable.
    pub skipped: usize,
}

impl IngestReport {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

static EMPTY_CELL: CellValue = CellValue::Empty;

fn cell<'a>(row: &'a RawRow, label: &str) -> &'a CellValue {
    row.get(label).unwrap_or(&EMPTY_CELL)
}

/// Builds events from rows. Rows without a readable start are counted in
/// `skipped`; an unreadable end leaves the event without one.
pub fn ingest(rows: &[RawRow], columns: &ColumnLabels, system: DateSystem) -> IngestReport {
    let mut report = IngestReport::default();

    for row in rows {
        let Ok(start) = normalize_with(cell(row, &columns.start), system) else {
            report.skipped += 1;
            continue;
        };

        report.events.push(Event {
            subject: cell(row, &columns.subject).display_text(),
            location: cell(row, &columns.location).display_text(),
            start,
            end: normalize_with(cell(row, &columns.end), system).ok(),
        });
    }

    log::debug!(
        "Ingested {} events from {} rows ({} skipped)",
        report.events.len(),
        rows.len(),
        report.skipped
    );
    report
}
