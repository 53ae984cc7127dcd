//! Recurring expense template
//!
//! A template describes an expense that repeats on a weekly or monthly cycle.
//! The `is_due` predicate is the single source of truth for whether a template
//! fires on a given calendar day; the backfill scheduler walks days and asks
//! it.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, TemplateId};
use super::money::Money;

/// Monthly anchors are capped at 28 so every month has a matching day;
/// anchoring on the 29th-31st would silently skip short months.
pub const MAX_DAY_OF_MONTH: u32 = 28;

/// How often a template fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Fires on a fixed weekday each week
    Weekly,
    /// Fires on a fixed day number each month
    Monthly,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
        }
    }
}

/// A recurring expense definition
///
/// Exactly one anchor field is meaningful per frequency: `weekday` (1 = Sunday
/// through 7 = Saturday) for weekly templates, `day_of_month` (1-28) for
/// monthly ones. The other anchor is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringTemplate {
    /// Unique identifier
    pub id: TemplateId,

    /// Category the generated expenses are charged to
    pub category_id: CategoryId,

    /// Amount of each generated expense
    pub amount: Money,

    /// Note copied onto each generated expense
    #[serde(default)]
    pub note: String,

    /// Cycle length
    pub frequency: Frequency,

    /// Weekday anchor for weekly templates (1 = Sunday ... 7 = Saturday)
    pub weekday: Option<u32>,

    /// Day-of-month anchor for monthly templates (1-28)
    pub day_of_month: Option<u32>,

    /// Inactive templates never fire
    pub active: bool,
}

impl RecurringTemplate {
    /// Create a weekly template anchored on a weekday (1 = Sunday)
    pub fn weekly(
        category_id: CategoryId,
        amount: Money,
        note: impl Into<String>,
        weekday: u32,
    ) -> Self {
        Self {
            id: TemplateId::new(),
            category_id,
            amount,
            note: note.into(),
            frequency: Frequency::Weekly,
            weekday: Some(weekday),
            day_of_month: None,
            active: true,
        }
    }

    /// Create a monthly template anchored on a day number (1-28)
    pub fn monthly(
        category_id: CategoryId,
        amount: Money,
        note: impl Into<String>,
        day_of_month: u32,
    ) -> Self {
        Self {
            id: TemplateId::new(),
            category_id,
            amount,
            note: note.into(),
            frequency: Frequency::Monthly,
            weekday: None,
            day_of_month: Some(day_of_month),
            active: true,
        }
    }

    /// Whether this template fires on the given calendar day
    ///
    /// Pure predicate: inactive templates and templates with an unset or
    /// out-of-range anchor never fire.
    pub fn is_due(&self, day: NaiveDate) -> bool {
        if !self.active {
            return false;
        }

        match self.frequency {
            Frequency::Weekly => match self.weekday {
                Some(weekday @ 1..=7) => day.weekday().number_from_sunday() == weekday,
                _ => false,
            },
            Frequency::Monthly => match self.day_of_month {
                Some(dom @ 1..=MAX_DAY_OF_MONTH) => day.day() == dom,
                _ => false,
            },
        }
    }

    /// Validate the template
    pub fn validate(&self) -> Result<(), TemplateValidationError> {
        if !self.amount.is_positive() {
            return Err(TemplateValidationError::NonPositiveAmount);
        }

        match self.frequency {
            Frequency::Weekly => match self.weekday {
                Some(1..=7) => Ok(()),
                Some(weekday) => Err(TemplateValidationError::WeekdayOutOfRange(weekday)),
                None => Err(TemplateValidationError::MissingAnchor),
            },
            Frequency::Monthly => match self.day_of_month {
                Some(1..=MAX_DAY_OF_MONTH) => Ok(()),
                Some(dom) => Err(TemplateValidationError::DayOfMonthOutOfRange(dom)),
                None => Err(TemplateValidationError::MissingAnchor),
            },
        }
    }
}

/// Validation errors for recurring templates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateValidationError {
    NonPositiveAmount,
    MissingAnchor,
    WeekdayOutOfRange(u32),
    DayOfMonthOutOfRange(u32),
}

impl fmt::Display for TemplateValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount => write!(f, "Template amount must be positive"),
            Self::MissingAnchor => write!(f, "Template is missing its schedule anchor"),
            Self::WeekdayOutOfRange(w) => {
                write!(f, "Weekday {} out of range (1 = Sunday ... 7 = Saturday)", w)
            }
            Self::DayOfMonthOutOfRange(d) => {
                write!(f, "Day of month {} out of range (1-{})", d, MAX_DAY_OF_MONTH)
            }
        }
    }
}

impl std::error::Error for TemplateValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_monthly_due_on_anchor_day() {
        let tpl = RecurringTemplate::monthly(CategoryId::new(), Money::from_cents(120000), "Rent", 1);
        assert!(tpl.is_due(day(2026, 1, 1)));
        assert!(tpl.is_due(day(2026, 2, 1)));
        assert!(!tpl.is_due(day(2026, 1, 2)));
    }

    #[test]
    fn test_weekly_due_on_anchor_weekday() {
        // 2026-01-05 is a Monday; weekday 2 in the 1 = Sunday numbering
        let tpl = RecurringTemplate::weekly(CategoryId::new(), Money::from_cents(5000), "Groceries", 2);
        assert!(tpl.is_due(day(2026, 1, 5)));
        assert!(tpl.is_due(day(2026, 1, 12)));
        assert!(!tpl.is_due(day(2026, 1, 6)));
    }

    #[test]
    fn test_inactive_never_fires() {
        let mut tpl = RecurringTemplate::monthly(CategoryId::new(), Money::from_cents(1000), "", 15);
        tpl.active = false;
        assert!(!tpl.is_due(day(2026, 3, 15)));
    }

    #[test]
    fn test_unset_anchor_never_fires() {
        let mut tpl = RecurringTemplate::weekly(CategoryId::new(), Money::from_cents(1000), "", 3);
        tpl.weekday = None;
        assert!(!tpl.is_due(day(2026, 1, 6)));
    }

    #[test]
    fn test_out_of_range_anchor_never_fires() {
        let mut tpl = RecurringTemplate::monthly(CategoryId::new(), Money::from_cents(1000), "", 5);
        tpl.day_of_month = Some(31);
        assert!(!tpl.is_due(day(2026, 1, 31)));

        let mut tpl = RecurringTemplate::weekly(CategoryId::new(), Money::from_cents(1000), "", 2);
        tpl.weekday = Some(8);
        assert!(!tpl.is_due(day(2026, 1, 5)));
    }

    #[test]
    fn test_validation() {
        let tpl = RecurringTemplate::monthly(CategoryId::new(), Money::from_cents(1000), "", 28);
        assert!(tpl.validate().is_ok());

        let tpl = RecurringTemplate::monthly(CategoryId::new(), Money::from_cents(1000), "", 29);
        assert_eq!(
            tpl.validate(),
            Err(TemplateValidationError::DayOfMonthOutOfRange(29))
        );

        let tpl = RecurringTemplate::weekly(CategoryId::new(), Money::from_cents(1000), "", 0);
        assert_eq!(
            tpl.validate(),
            Err(TemplateValidationError::WeekdayOutOfRange(0))
        );

        let tpl = RecurringTemplate::weekly(CategoryId::new(), Money::zero(), "", 2);
        assert_eq!(
            tpl.validate(),
            Err(TemplateValidationError::NonPositiveAmount)
        );
    }

    #[test]
    fn test_serialization() {
        let tpl = RecurringTemplate::weekly(CategoryId::new(), Money::from_cents(5000), "Groceries", 2);
        let json = serde_json::to_string(&tpl).unwrap();
        assert!(json.contains("\"weekly\""));
        let deserialized: RecurringTemplate = serde_json::from_str(&json).unwrap();
        assert_eq!(tpl.id, deserialized.id);
        assert_eq!(deserialized.weekday, Some(2));
    }
}
