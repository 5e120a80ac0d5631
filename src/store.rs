// File: src/store.rs
use crate::model::Event;
use crate::range::{DateRange, query};

/// In-memory event list for one session. Each load replaces it wholesale.
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

/// What a range query found.
///
/// `NoData` and `NoneInRange` are both "nothing to show", but the caller
/// presents them differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome<'a> {
    /// Nothing has been loaded.
    NoData,
    /// Events are loaded but none start inside the range. `range` is `None`
    /// when the requested window was empty to begin with.
    NoneInRange { range: Option<DateRange> },
    /// Matching events, earliest start first.
    Events {
        range: DateRange,
        events: Vec<&'a Event>,
    },
}

impl QueryOutcome<'_> {
    pub fn events(&self) -> &[&Event] {
        match self {
            QueryOutcome::Events { events, .. } => events,
            _ => &[],
        }
    }

    pub fn range(&self) -> Option<&DateRange> {
        match self {
            QueryOutcome::NoData => None,
            QueryOutcome::NoneInRange { range } => range.as_ref(),
            QueryOutcome::Events { range, .. } => Some(range),
        }
    }
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps in a new batch and returns the previous one.
    pub fn replace(&mut self, events: Vec<Event>) -> Vec<Event> {
        std::mem::replace(&mut self.events, events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn query(&self, range: &DateRange) -> QueryOutcome<'_> {
        if self.events.is_empty() {
            return QueryOutcome::NoData;
        }
        let events = query(&self.events, range);
        if events.is_empty() {
            QueryOutcome::NoneInRange {
                range: Some(*range),
            }
        } else {
            QueryOutcome::Events {
                range: *range,
                events,
            }
        }
    }

    /// Like [`EventStore::query`]; `None` is a window with no instants in it.
    pub fn query_window(&self, window: Option<&DateRange>) -> QueryOutcome<'_> {
        match window {
            Some(range) => self.query(range),
            None if self.events.is_empty() => QueryOutcome::NoData,
            None => QueryOutcome::NoneInRange { range: None },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, NaiveDate, TimeZone};

    fn day(d: u32) -> DateRange {
        let date = NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        DateRange::days(date, date).unwrap()
    }

    #[test]
    fn test_three_outcomes() {
        let mut store = EventStore::new();
        assert_eq!(store.query(&day(1)), QueryOutcome::NoData);

        let start = Local.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        store.replace(vec![Event::new("Standup", start)]);

        assert_eq!(
            store.query(&day(2)),
            QueryOutcome::NoneInRange {
                range: Some(day(2))
            }
        );

        let outcome = store.query(&day(1));
        assert_eq!(outcome.events().len(), 1);
        assert_eq!(outcome.events()[0].subject, "Standup");
        assert_eq!(outcome.range(), Some(&day(1)));
    }

    #[test]
    fn test_empty_window() {
        let mut store = EventStore::new();
        assert_eq!(store.query_window(None), QueryOutcome::NoData);

        let start = Local.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        store.replace(vec![Event::new("Standup", start)]);
        let outcome = store.query_window(None);
        assert_eq!(outcome, QueryOutcome::NoneInRange { range: None });
        assert_eq!(outcome.range(), None);
        assert_eq!(store.query_window(Some(&day(1))).events().len(), 1);
    }

    #[test]
    fn test_replace_is_wholesale() {
        let start = Local.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let mut store = EventStore::new();
        store.replace(vec![Event::new("a", start), Event::new("b", start)]);
        let old = store.replace(vec![Event::new("c", start)]);

        assert_eq!(old.len(), 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.events()[0].subject, "c");

        store.clear();
        assert!(store.is_empty());
    }
}
