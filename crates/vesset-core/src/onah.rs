//! The onah: the night-time or day-time half of a single Hebrew date.
//!
//! This is the atomic unit of all the date arithmetic in this crate. An
//! integer onah offset counts half-days, so an offset of 2 is one calendar
//! day.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use vesset_calendar::HebrewDate;

/// The night or day portion of a Hebrew date. Orders `Night < Day`, since
/// the Hebrew day begins at nightfall.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "lowercase")]
pub enum NightDay {
    /// From nightfall through dawn.
    Night,
    /// From dawn through nightfall.
    Day,
}

impl NightDay {
    /// The other half of the day.
    pub const fn invert(self) -> Self {
        match self {
            Self::Night => Self::Day,
            Self::Day => Self::Night,
        }
    }
}

/// A half-day: one [`HebrewDate`] paired with its [`NightDay`] portion.
///
/// Immutable value type, totally ordered by `(absolute day, night/day)`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Onah {
    /// The Hebrew date.
    pub date: HebrewDate,
    /// Which half of that date.
    pub night_day: NightDay,
}

impl Onah {
    /// Pair a date with a night/day portion.
    pub const fn new(date: HebrewDate, night_day: NightDay) -> Self {
        Self { date, night_day }
    }

    /// The onah directly after this one.
    pub fn next(&self) -> Self {
        match self.night_day {
            NightDay::Night => Self::new(self.date, NightDay::Day),
            NightDay::Day => Self::new(self.date.add_days(1), NightDay::Night),
        }
    }

    /// The onah directly before this one.
    pub fn previous(&self) -> Self {
        match self.night_day {
            NightDay::Night => Self::new(self.date.add_days(-1), NightDay::Day),
            NightDay::Day => Self::new(self.date, NightDay::Night),
        }
    }

    /// The onah `n` half-days away (negative `n` steps backwards).
    ///
    /// Computed in closed form (whole days via euclidean division plus at
    /// most one single step) and guaranteed to agree with `n` repeated
    /// [`Self::next`]/[`Self::previous`] calls.
    pub fn add_onahs(&self, n: i64) -> Self {
        if n == 0 {
            return *self;
        }
        let full_days = n.div_euclid(2);
        let onah = Self::new(self.date.add_days(full_days), self.night_day);
        // Euclidean remainder is 0 or 1.
        if n.rem_euclid(2) == 1 {
            onah.next()
        } else {
            onah
        }
    }

    /// Same date and same night/day portion.
    pub fn is_same_onah(&self, other: &Self) -> bool {
        self.date.abs() == other.date.abs() && self.night_day == other.night_day
    }
}

impl std::fmt::Display for Onah {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.night_day {
            NightDay::Night => write!(f, "Night-time of {}", self.date),
            NightDay::Day => write!(f, "Day-time of {}", self.date),
        }
    }
}
