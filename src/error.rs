// File: ./src/error.rs
// Error kinds surfaced by loading, restoring and querying events.
use chrono::{DateTime, Local, NaiveDate};

#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// The source file could not be read or decoded as a spreadsheet.
    #[error("could not read spreadsheet: {0}")]
    UnreadableSource(String),

    /// The spreadsheet was read but no row had a usable start time.
    #[error("no events found ({skipped} rows without a readable start)")]
    NoValidEvents { skipped: usize },

    /// The saved snapshot exists but cannot be decoded.
    #[error("saved events are corrupt: {0}")]
    CorruptPersistedState(String),

    #[error("invalid range: {from} is after {to}")]
    InvalidRange {
        from: DateTime<Local>,
        to: DateTime<Local>,
    },

    #[error("date {0} is outside the supported range")]
    DateOutOfRange(NaiveDate),

    #[error("another load is already running")]
    LoadInProgress,

    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}
