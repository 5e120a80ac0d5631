// File: src/session.rs
//! Session state: the loaded events, their saved snapshot and the load gate.
//!
//! Every user action (load a file, ask for a range) goes through [`Session`].
//! A failed load never touches the events already in memory, and only a
//! successful load overwrites the snapshot.
use crate::config::Config;
use crate::context::AppContext;
use crate::error::EventError;
use crate::ingest::ingest;
use crate::model::RawRow;
use crate::persistence;
use crate::range::{DateRange, NamedRange};
use crate::source;
use crate::storage::{FileStore, KeyValueStore};
use crate::store::{EventStore, QueryOutcome};
use chrono::Local;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Admits one load at a time. Clones share the same flag, so a front end can
/// keep one to grey out its load control while [`LoadGate::is_busy`].
#[derive(Debug, Clone, Default)]
pub struct LoadGate {
    busy: Arc<AtomicBool>,
}

impl LoadGate {
    pub fn try_begin(&self) -> Result<LoadTicket, EventError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| EventError::LoadInProgress)?;
        Ok(LoadTicket {
            busy: Arc::clone(&self.busy),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Held for the duration of a load; releases the gate on drop.
#[derive(Debug)]
pub struct LoadTicket {
    busy: Arc<AtomicBool>,
}

impl Drop for LoadTicket {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Summary of a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOutcome {
    pub count: usize,
    pub skipped: usize,
    /// False when the snapshot could not be written. The events are still loaded.
    pub saved: bool,
}

pub struct Session {
    store: EventStore,
    backend: Box<dyn KeyValueStore>,
    config: Config,
    gate: LoadGate,
}

impl Session {
    pub fn new(backend: Box<dyn KeyValueStore>, config: Config) -> Self {
        Self {
            store: EventStore::new(),
            backend,
            config,
            gate: LoadGate::default(),
        }
    }

    /// Session backed by the file store under the context's data directory.
    pub fn open(ctx: &dyn AppContext, config: Config) -> anyhow::Result<Self> {
        let dir = ctx.get_store_dir()?;
        Ok(Self::new(Box::new(FileStore::new(dir)), config))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn load_gate(&self) -> LoadGate {
        self.gate.clone()
    }

    /// Loads the saved snapshot into memory.
    ///
    /// Returns the number of restored events, or `None` when there was no
    /// snapshot or it could not be decoded. Decode failures are only logged.
    pub fn restore(&mut self) -> Option<usize> {
        match persistence::restore(self.backend.as_ref()) {
            Ok(Some(events)) => {
                let count = events.len();
                self.store.replace(events);
                log::info!("Restored {} events from snapshot", count);
                Some(count)
            }
            Ok(None) => {
                log::debug!("No saved snapshot");
                None
            }
            Err(e) => {
                log::warn!("Ignoring saved events: {}", e);
                self.store.clear();
                None
            }
        }
    }

    /// Reads, decodes and loads a spreadsheet file.
    pub async fn load_file(&mut self, path: &Path) -> Result<LoadOutcome, EventError> {
        let _ticket = self.gate.try_begin()?;
        let rows = source::read_file(path).await.inspect_err(|e| {
            log::error!("Failed to load {}: {}", path.display(), e);
        })?;
        self.apply(&rows)
    }

    /// Decodes and loads spreadsheet bytes.
    pub fn load_bytes(&mut self, bytes: Vec<u8>) -> Result<LoadOutcome, EventError> {
        let _ticket = self.gate.try_begin()?;
        let rows = source::decode_workbook(bytes)?;
        self.apply(&rows)
    }

    /// Loads already decoded rows.
    pub fn load_rows(&mut self, rows: &[RawRow]) -> Result<LoadOutcome, EventError> {
        let _ticket = self.gate.try_begin()?;
        self.apply(rows)
    }

    fn apply(&mut self, rows: &[RawRow]) -> Result<LoadOutcome, EventError> {
        let report = ingest(rows, &self.config.columns, self.config.date_system);
        if report.is_empty() {
            log::warn!(
                "No usable events in {} rows; keeping {} loaded events",
                rows.len(),
                self.store.len()
            );
            return Err(EventError::NoValidEvents {
                skipped: report.skipped,
            });
        }

        let count = report.events.len();
        self.store.replace(report.events);

        let saved = match persistence::save(self.backend.as_ref(), self.store.events()) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to save events: {:#}", e);
                false
            }
        };

        log::info!("Loaded {} events ({} rows skipped)", count, report.skipped);
        Ok(LoadOutcome {
            count,
            skipped: report.skipped,
            saved,
        })
    }

    pub fn query(&self, range: &DateRange) -> QueryOutcome<'_> {
        self.store.query(range)
    }

    /// Resolves a named range against the current local time and queries it.
    pub fn query_named(&self, named: NamedRange) -> Result<QueryOutcome<'_>, EventError> {
        let window = named.resolve(Local::now())?;
        Ok(self.store.query_window(window.as_ref()))
    }
}
