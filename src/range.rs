// File: ./src/range.rs
//! Inclusive date ranges and the range filter.
//!
//! The named constructors take `now` explicitly so they can be tested; the
//! session passes `Local::now()`.
use crate::error::EventError;
use crate::model::Event;
use crate::model::time::{end_of_day, start_of_day};
use chrono::{DateTime, Days, Local, Months, NaiveDate};

/// Closed interval `[from, to]`. Construction guarantees `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    from: DateTime<Local>,
    to: DateTime<Local>,
}

impl DateRange {
    pub fn new(from: DateTime<Local>, to: DateTime<Local>) -> Result<Self, EventError> {
        if from > to {
            return Err(EventError::InvalidRange { from, to });
        }
        Ok(Self { from, to })
    }

    pub fn start(&self) -> DateTime<Local> {
        self.from
    }

    pub fn end(&self) -> DateTime<Local> {
        self.to
    }

    pub fn contains(&self, instant: &DateTime<Local>) -> bool {
        self.from <= *instant && *instant <= self.to
    }

    /// Whole local days from `first` to `last`.
    pub fn days(first: NaiveDate, last: NaiveDate) -> Result<Self, EventError> {
        let from = start_of_day(first).ok_or_else(|| out_of_range(first))?;
        let to = end_of_day(last).ok_or_else(|| out_of_range(last))?;
        Self::new(from, to)
    }

    pub fn today(now: DateTime<Local>) -> Result<Self, EventError> {
        let today = now.date_naive();
        Self::days(today, today)
    }

    pub fn tomorrow(now: DateTime<Local>) -> Result<Self, EventError> {
        let tomorrow = shift_days(now.date_naive(), 1)?;
        Self::days(tomorrow, tomorrow)
    }

    /// Today through the end of the day `n` days from now.
    pub fn next_days(now: DateTime<Local>, n: u64) -> Result<Self, EventError> {
        let today = now.date_naive();
        Self::days(today, shift_days(today, n)?)
    }

    /// Today through the same day next month, clamped to that month's last day.
    pub fn next_month(now: DateTime<Local>) -> Result<Self, EventError> {
        let today = now.date_naive();
        let last = today
            .checked_add_months(Months::new(1))
            .ok_or_else(|| out_of_range(today))?;
        Self::days(today, last)
    }

    /// Today through `last`, or just today when no date is given.
    ///
    /// A `last` before today leaves nothing to show and gives `Ok(None)`.
    pub fn until(
        now: DateTime<Local>,
        last: Option<NaiveDate>,
    ) -> Result<Option<Self>, EventError> {
        let today = now.date_naive();
        let last = last.unwrap_or(today);
        if last < today {
            return Ok(None);
        }
        Self::days(today, last).map(Some)
    }
}

fn shift_days(date: NaiveDate, n: u64) -> Result<NaiveDate, EventError> {
    date.checked_add_days(Days::new(n))
        .ok_or_else(|| out_of_range(date))
}

fn out_of_range(date: NaiveDate) -> EventError {
    EventError::DateOutOfRange(date)
}

/// The ranges a user can ask for by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedRange {
    Today,
    Tomorrow,
    NextDays(u64),
    NextMonth,
    Until(Option<NaiveDate>),
}

impl NamedRange {
    pub const WEEK: NamedRange = NamedRange::NextDays(7);

    /// The window this name covers at `now`; `None` when it is empty.
    ///
    /// Never `InvalidRange`. The only error is a date past the calendar's end.
    pub fn resolve(self, now: DateTime<Local>) -> Result<Option<DateRange>, EventError> {
        match self {
            NamedRange::Today => DateRange::today(now).map(Some),
            NamedRange::Tomorrow => DateRange::tomorrow(now).map(Some),
            NamedRange::NextDays(n) => DateRange::next_days(now, n).map(Some),
            NamedRange::NextMonth => DateRange::next_month(now).map(Some),
            NamedRange::Until(last) => DateRange::until(now, last),
        }
    }
}

/// Events whose start falls inside `range`, earliest first.
///
/// Only `start` decides membership. Equal starts keep their input order.
pub fn query<'a>(events: &'a [Event], range: &DateRange) -> Vec<&'a Event> {
    let mut hits: Vec<&Event> = events.iter().filter(|e| range.contains(&e.start)).collect();
    hits.sort_by_key(|e| e.start);
    hits
}
