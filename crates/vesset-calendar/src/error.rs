//! Error type for calendar date construction.

use thiserror::Error;

/// Errors from constructing a [`crate::HebrewDate`] out of raw parts.
///
/// Construction is the only fallible operation in this crate; all date
/// arithmetic on an already-valid date is total.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CalendarError {
    /// Years before the Hebrew epoch (year 1) are not representable.
    #[error("year {0} is before the Hebrew epoch")]
    YearOutOfRange(i32),

    /// The month number does not exist in the given year.
    #[error("month {month} does not exist in Hebrew year {year}")]
    MonthOutOfRange { year: i32, month: u8 },

    /// The day number exceeds the length of the given month.
    #[error("day {day} does not exist in month {month} of year {year} ({month_length} days)")]
    DayOutOfRange {
        year: i32,
        month: u8,
        day: u8,
        month_length: u8,
    },
}
