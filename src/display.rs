// File: ./src/display.rs
// Plain-text views of query results and status lines for the command line.
use crate::error::EventError;
use crate::ingest::ColumnLabels;
use crate::model::Event;
use crate::range::DateRange;
use crate::store::QueryOutcome;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use unicode_width::UnicodeWidthStr;

const NO_SUBJECT: &str = "(no subject)";

/// How a list of events is laid out.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Cards,
    Table,
}

fn format_date(dt: &DateTime<Local>) -> String {
    dt.format("%A, %d %B %Y").to_string()
}

fn format_time(dt: &DateTime<Local>) -> String {
    dt.format("%H:%M").to_string()
}

fn subject_or_placeholder(ev: &Event) -> &str {
    if ev.subject.is_empty() {
        NO_SUBJECT
    } else {
        &ev.subject
    }
}

fn hours(ev: &Event) -> String {
    format!(
        "{} - {}",
        format_time(&ev.start),
        format_time(&ev.effective_end())
    )
}

fn summary_line(count: usize, range: &DateRange) -> String {
    format!(
        "Showing {} events between {} and {}.",
        count,
        format_date(&range.start()),
        format_date(&range.end())
    )
}

/// Renders a query outcome in the chosen layout.
pub fn render(outcome: &QueryOutcome<'_>, mode: ViewMode) -> String {
    match outcome {
        QueryOutcome::NoData => "No spreadsheet has been loaded yet.".to_string(),
        QueryOutcome::NoneInRange { .. } => "No events in the selected range.".to_string(),
        QueryOutcome::Events { range, events } => match mode {
            ViewMode::Cards => render_cards(events, range),
            ViewMode::Table => render_table(events, range),
        },
    }
}

fn render_cards(events: &[&Event], range: &DateRange) -> String {
    let mut out = summary_line(events.len(), range);
    out.push('\n');
    for ev in events {
        out.push('\n');
        out.push_str(subject_or_placeholder(ev));
        out.push('\n');
        out.push_str(&format!("  Date:  {}\n", format_date(&ev.start)));
        out.push_str(&format!("  Time:  {}\n", hours(ev)));
        if !ev.location.is_empty() {
            out.push_str(&format!("  Where: {}\n", ev.location));
        }
    }
    out
}

fn render_table(events: &[&Event], range: &DateRange) -> String {
    let header = ["Subject", "Date", "Hours", "Location"].map(str::to_string);
    let rows: Vec<[String; 4]> = events
        .iter()
        .map(|ev| {
            [
                subject_or_placeholder(ev).to_string(),
                format_date(&ev.start),
                hours(ev),
                ev.location.clone(),
            ]
        })
        .collect();

    let mut widths = header.clone().map(|h| h.width());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.width());
        }
    }

    let line = |cells: &[String; 4]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, w)| format!("{}{}", cell, " ".repeat(w - cell.width())))
            .collect();
        padded.join(" | ").trim_end().to_string()
    };

    let mut out = summary_line(events.len(), range);
    out.push_str("\n\n");
    out.push_str(&line(&header));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');
    for row in &rows {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}

pub fn load_status(count: usize, skipped: usize) -> String {
    if skipped == 0 {
        format!("File loaded. Found {} events.", count)
    } else {
        format!(
            "File loaded. Found {} events ({} rows without a readable start were skipped).",
            count, skipped
        )
    }
}

pub fn restore_status(count: usize) -> String {
    format!("Restored {} events from saved data.", count)
}

/// User-facing line for a failed load or query.
pub fn error_status(err: &EventError, columns: &ColumnLabels) -> String {
    match err {
        EventError::UnreadableSource(_) => format!(
            "Could not load the file. Make sure it is a spreadsheet that is not open elsewhere, \
             with the columns: {}, {}, {}, {}.",
            columns.subject, columns.location, columns.start, columns.end
        ),
        EventError::NoValidEvents { .. } => {
            "No events found in the file, or the column format is different.".to_string()
        }
        EventError::LoadInProgress => "A file is already being loaded.".to_string(),
        other => other.to_string(),
    }
}
