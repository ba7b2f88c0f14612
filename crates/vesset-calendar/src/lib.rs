//! # Hebrew calendar arithmetic
//!
//! A small, pure implementation of the Hebrew (lunisolar) calendar: absolute
//! day numbers, day-of-week, variable month lengths, leap months and
//! Gregorian interop. This crate carries no halachic logic of its own; it is
//! the date substrate consumed by `vesset-core`.
//!
//! Months are numbered Nissan = 1 through Elul = 6, Tishrei = 7 through
//! Adar = 12 (Adar Sheini = 13 in leap years). The civil year increments at
//! Tishrei, so the months of year `y` run, in chronological order, Tishrei
//! of `y` through Elul of `y`.
//!
//! Absolute day numbers are Rata Die: day 1 is Monday, January 1 of the
//! proleptic Gregorian year 1. `chrono::NaiveDate` uses the same fixed-day
//! scheme (`num_days_from_ce`), which is what the Gregorian bridge leans on.

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

mod date;
mod error;

pub use date::{
    day_of_week_name, days_in_month, days_in_year, is_leap_year, month_name, months_in_year,
    HebrewDate, ADAR, ADAR_SHEINI, AV, CHESHVAN, ELUL, IYAR, KISLEV, NISSAN, SHVAT, SIVAN, TAMUZ,
    TEVES, TISHREI,
};
pub use error::CalendarError;
