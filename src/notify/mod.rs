//! Budget check-in reminders
//!
//! The notification collaborator. The core hands it `(enabled, hour, minute)`
//! and consumes nothing back; the module keeps the armed schedule and can
//! answer when the next check-in falls so the CLI can display it.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A recurring daily reminder time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSchedule {
    /// Whether the reminder is armed
    pub enabled: bool,
    /// Hour of day (0-23)
    pub hour: u32,
    /// Minute of hour (0-59)
    pub minute: u32,
}

impl Default for ReminderSchedule {
    fn default() -> Self {
        // Evening check-in, matching the default budget review habit.
        Self {
            enabled: false,
            hour: 20,
            minute: 0,
        }
    }
}

impl ReminderSchedule {
    /// Create a schedule; hour and minute are clamped to valid ranges
    pub fn new(enabled: bool, hour: u32, minute: u32) -> Self {
        Self {
            enabled,
            hour: hour.min(23),
            minute: minute.min(59),
        }
    }

    /// The next time this reminder fires strictly after `after`
    ///
    /// `None` when the reminder is disabled.
    pub fn next_occurrence(&self, after: NaiveDateTime) -> Option<NaiveDateTime> {
        if !self.enabled {
            return None;
        }

        let fire_time = NaiveTime::from_hms_opt(self.hour.min(23), self.minute.min(59), 0)?;
        let today_fire = after.date().and_time(fire_time);
        if today_fire > after {
            Some(today_fire)
        } else {
            Some(today_fire + Duration::days(1))
        }
    }
}

/// Arrange the recurring reminder
///
/// Fire-and-forget: the caller does not consume a result. The armed schedule
/// is what the settings persist; this just surfaces the change.
pub fn configure(schedule: ReminderSchedule) {
    if schedule.enabled {
        tracing::info!(
            hour = schedule.hour,
            minute = schedule.minute,
            "budget check-in reminder armed"
        );
    } else {
        tracing::info!("budget check-in reminder disarmed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_disabled_never_fires() {
        let schedule = ReminderSchedule::new(false, 20, 0);
        assert!(schedule.next_occurrence(at(2026, 2, 20, 9, 0)).is_none());
    }

    #[test]
    fn test_fires_later_today() {
        let schedule = ReminderSchedule::new(true, 20, 0);
        assert_eq!(
            schedule.next_occurrence(at(2026, 2, 20, 9, 0)),
            Some(at(2026, 2, 20, 20, 0))
        );
    }

    #[test]
    fn test_rolls_over_to_tomorrow() {
        let schedule = ReminderSchedule::new(true, 20, 0);
        assert_eq!(
            schedule.next_occurrence(at(2026, 2, 20, 21, 30)),
            Some(at(2026, 2, 21, 20, 0))
        );
        // Exactly at the fire time counts as passed.
        assert_eq!(
            schedule.next_occurrence(at(2026, 2, 20, 20, 0)),
            Some(at(2026, 2, 21, 20, 0))
        );
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let schedule = ReminderSchedule::new(true, 99, 99);
        assert_eq!(schedule.hour, 23);
        assert_eq!(schedule.minute, 59);
    }
}
