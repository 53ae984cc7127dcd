//! Injectable calendar-day source
//!
//! Every analytics computation is a deterministic function of the ledger and a
//! calendar day. The store never reads the wall clock directly; it asks its
//! `Clock`, which tests replace with a fixed date.

use chrono::NaiveDate;

/// Source of the current calendar day
pub trait Clock {
    /// The current local calendar day
    fn today(&self) -> NaiveDate;
}

/// Wall-clock backed implementation used by the real application
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// A clock pinned to one day, for tests and scripted replays
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
