use chrono::{Datelike, NaiveDate};
use std::fmt;

/// Leap year every stored month/day is anchored to, so February 29 is always
/// representable and comparable.
pub const REFERENCE_YEAR: i32 = 2020;

/// A yearless calendar date (month and day of month).
///
/// Ordering follows the calendar: January 1 sorts first, December 31 last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthDay(NaiveDate);

impl MonthDay {
    /// Builds a month/day pair, returning `None` for dates that do not exist
    /// (e.g. April 31 or February 30).
    pub fn new(month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(REFERENCE_YEAR, month, day).map(Self)
    }

    /// Drops the year from a calendar date.
    pub fn of(date: NaiveDate) -> Self {
        // Every month/day exists in the leap reference year.
        date.with_year(REFERENCE_YEAR).map(Self).unwrap_or(Self(date))
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Whether `date` falls on this month and day, whatever its year.
    pub fn matches(&self, date: NaiveDate) -> bool {
        self.month() == date.month() && self.day() == date.day()
    }
}

/// Renders as `"February 29"`, `"March 03"`.
impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%B %d"))
    }
}
