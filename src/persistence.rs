// File: ./src/persistence.rs
// Snapshot of the loaded events, saved after each successful load and
// restored at startup.
//
// The key carries the format version. A format change gets a new key; old
// snapshots are never migrated.
use crate::error::EventError;
use crate::model::Event;
use crate::storage::KeyValueStore;
use anyhow::Result;
use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const SNAPSHOT_KEY: &str = "calendarEventsV1";

/// Plain-data form of an [`Event`]. Instants are RFC 3339 UTC strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredEvent {
    #[serde(default)]
    subject: String,
    #[serde(default)]
    location: String,
    start: String,
    #[serde(default)]
    end: Option<String>,
}

impl From<&Event> for StoredEvent {
    fn from(ev: &Event) -> Self {
        Self {
            subject: ev.subject.clone(),
            location: ev.location.clone(),
            start: encode_instant(&ev.start),
            end: ev.end.as_ref().map(encode_instant),
        }
    }
}

impl TryFrom<StoredEvent> for Event {
    type Error = EventError;

    fn try_from(stored: StoredEvent) -> Result<Self, Self::Error> {
        Ok(Event {
            subject: stored.subject,
            location: stored.location,
            start: decode_instant(&stored.start)?,
            end: stored.end.as_deref().map(decode_instant).transpose()?,
        })
    }
}

fn encode_instant(dt: &DateTime<Local>) -> String {
    dt.with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn decode_instant(s: &str) -> Result<DateTime<Local>, EventError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Local))
        .map_err(|e| EventError::CorruptPersistedState(format!("bad timestamp {:?}: {}", s, e)))
}

/// Serializes `events` to the snapshot JSON text.
pub fn to_json(events: &[Event]) -> Result<String> {
    let records: Vec<StoredEvent> = events.iter().map(StoredEvent::from).collect();
    Ok(serde_json::to_string(&records)?)
}

/// Parses snapshot JSON text back into events.
pub fn from_json(json: &str) -> Result<Vec<Event>, EventError> {
    let records: Vec<StoredEvent> = serde_json::from_str(json)
        .map_err(|e| EventError::CorruptPersistedState(e.to_string()))?;
    records.into_iter().map(Event::try_from).collect()
}

/// Overwrites the snapshot with `events`.
pub fn save(store: &dyn KeyValueStore, events: &[Event]) -> Result<()> {
    let json = to_json(events)?;
    store.set(SNAPSHOT_KEY, &json)?;
    log::info!("Saved {} events to {}", events.len(), SNAPSHOT_KEY);
    Ok(())
}

/// Reads the snapshot. `Ok(None)` means nothing was ever saved.
pub fn restore(store: &dyn KeyValueStore) -> Result<Option<Vec<Event>>, EventError> {
    let Some(json) = store.get(SNAPSHOT_KEY)? else {
        return Ok(None);
    };
    from_json(&json).map(Some)
}
