//! Schedule cursor
//!
//! Marks the last calendar day through which recurrence generation has been
//! applied. Persisted in its own record so the scheduler's progress survives
//! process restarts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Bookkeeping for the recurrence backfill scheduler
///
/// `last_run_date` only ever advances; the scheduler never processes a day at
/// or before it again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleCursor {
    /// Last day through which generation has run; `None` before the first run
    pub last_run_date: Option<NaiveDate>,
}

impl ScheduleCursor {
    /// Advance the cursor to the given day
    pub fn advance_to(&mut self, day: NaiveDate) {
        self.last_run_date = Some(day);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unset() {
        let cursor = ScheduleCursor::default();
        assert!(cursor.last_run_date.is_none());
    }

    #[test]
    fn test_advance() {
        let mut cursor = ScheduleCursor::default();
        let day = NaiveDate::from_ymd_opt(2026, 2, 20).unwrap();
        cursor.advance_to(day);
        assert_eq!(cursor.last_run_date, Some(day));
    }

    #[test]
    fn test_serialization() {
        let mut cursor = ScheduleCursor::default();
        cursor.advance_to(NaiveDate::from_ymd_opt(2026, 2, 20).unwrap());
        let json = serde_json::to_string(&cursor).unwrap();
        let deserialized: ScheduleCursor = serde_json::from_str(&json).unwrap();
        assert_eq!(cursor, deserialized);
    }
}
