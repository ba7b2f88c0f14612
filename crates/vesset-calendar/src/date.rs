//! The `HebrewDate` value type and the fixed-day arithmetic behind it.
//!
//! The year math is the classical molad-plus-postponements computation
//! (Dershowitz/Reingold formulation); month lengths for Cheshvan and Kislev
//! fall out of the resulting year length.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CalendarError;

/// Nissan, the first month in the traditional numbering.
pub const NISSAN: u8 = 1;
/// Iyar.
pub const IYAR: u8 = 2;
/// Sivan.
pub const SIVAN: u8 = 3;
/// Tamuz.
pub const TAMUZ: u8 = 4;
/// Av.
pub const AV: u8 = 5;
/// Elul, the last month of the civil year.
pub const ELUL: u8 = 6;
/// Tishrei, the first month of the civil year.
pub const TISHREI: u8 = 7;
/// Cheshvan (29 or 30 days depending on the year).
pub const CHESHVAN: u8 = 8;
/// Kislev (29 or 30 days depending on the year).
pub const KISLEV: u8 = 9;
/// Teves.
pub const TEVES: u8 = 10;
/// Shvat.
pub const SHVAT: u8 = 11;
/// Adar (Adar Rishon in leap years).
pub const ADAR: u8 = 12;
/// Adar Sheini, present only in leap years.
pub const ADAR_SHEINI: u8 = 13;

/// Rata Die offset of the Hebrew epoch (1 Tishrei, year 1).
const HEBREW_EPOCH: i64 = -1_373_429;

/// Is `year` a leap year (13 months) of the 19-year cycle?
pub const fn is_leap_year(year: i32) -> bool {
    ((7 * year as i64 + 1) % 19 + 19) % 19 < 7
}

/// Number of months in `year` (12, or 13 in a leap year).
pub const fn months_in_year(year: i32) -> u8 {
    if is_leap_year(year) {
        13
    } else {
        12
    }
}

/// Days from the Hebrew epoch to 1 Tishrei of `year`, including the
/// postponement (dechiyah) rules.
fn elapsed_days(year: i32) -> i64 {
    let prior = i64::from(year) - 1;
    let months_elapsed = 235 * (prior / 19) + 12 * (prior % 19) + (7 * (prior % 19) + 1) / 19;
    let parts_elapsed = 204 + 793 * (months_elapsed % 1080);
    let hours_elapsed =
        5 + 12 * months_elapsed + 793 * (months_elapsed / 1080) + parts_elapsed / 1080;
    let conjunction_day = 1 + 29 * months_elapsed + hours_elapsed / 24;
    let conjunction_parts = 1080 * (hours_elapsed % 24) + parts_elapsed % 1080;

    // Molad zaken, GaTaRaD and BeTU'TaKPaT postponements.
    let alternative_day = if conjunction_parts >= 19440
        || (conjunction_day % 7 == 2 && conjunction_parts >= 9924 && !is_leap_year(year))
        || (conjunction_day % 7 == 1 && conjunction_parts >= 16789 && is_leap_year(year - 1))
    {
        conjunction_day + 1
    } else {
        conjunction_day
    };

    // Lo ADU Rosh: Rosh Hashana may not fall on Sunday, Wednesday or Friday.
    if matches!(alternative_day % 7, 0 | 3 | 5) {
        alternative_day + 1
    } else {
        alternative_day
    }
}

/// Total days in `year` (353-355, or 383-385 in a leap year).
pub fn days_in_year(year: i32) -> i64 {
    elapsed_days(year + 1) - elapsed_days(year)
}

fn long_cheshvan(year: i32) -> bool {
    days_in_year(year) % 10 == 5
}

fn short_kislev(year: i32) -> bool {
    days_in_year(year) % 10 == 3
}

/// Length of `month` in `year`, in days (29 or 30).
pub fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        IYAR | TAMUZ | ELUL | TEVES | ADAR_SHEINI => 29,
        ADAR if !is_leap_year(year) => 29,
        CHESHVAN if !long_cheshvan(year) => 29,
        KISLEV if short_kislev(year) => 29,
        _ => 30,
    }
}

/// English month name, Adar-aware: month 12 reads "Adar Rishon" in a leap
/// year and plain "Adar" otherwise.
pub fn month_name(year: i32, month: u8) -> &'static str {
    match month {
        NISSAN => "Nissan",
        IYAR => "Iyar",
        SIVAN => "Sivan",
        TAMUZ => "Tamuz",
        AV => "Av",
        ELUL => "Elul",
        TISHREI => "Tishrei",
        CHESHVAN => "Cheshvan",
        KISLEV => "Kislev",
        TEVES => "Teves",
        SHVAT => "Shvat",
        ADAR if is_leap_year(year) => "Adar Rishon",
        ADAR => "Adar",
        ADAR_SHEINI => "Adar Sheini",
        _ => "?",
    }
}

/// English weekday name for a 0=Sunday .. 6=Shabbos index.
pub const fn day_of_week_name(day_of_week: u8) -> &'static str {
    match day_of_week {
        0 => "Sunday",
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        6 => "Shabbos",
        _ => "?",
    }
}

/// The chronological successor of a (year, month) pair.
const fn next_month(year: i32, month: u8) -> (i32, u8) {
    if month == ELUL {
        (year + 1, TISHREI)
    } else if month == months_in_year(year) {
        (year, NISSAN)
    } else {
        (year, month + 1)
    }
}

/// The chronological predecessor of a (year, month) pair.
const fn previous_month(year: i32, month: u8) -> (i32, u8) {
    if month == TISHREI {
        (year - 1, ELUL)
    } else if month == NISSAN {
        (year, months_in_year(year))
    } else {
        (year, month - 1)
    }
}

/// An immutable Hebrew calendar date.
///
/// Cheap to copy; ordered and compared by absolute day number. Serialized
/// as its `{ year, month, day }` parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HebrewDate {
    year: i32,
    month: u8,
    day: u8,
}

impl HebrewDate {
    /// Build a date, failing fast on out-of-range parts.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError`] when the year is before the epoch, the
    /// month does not exist in the year, or the day exceeds the month.
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, CalendarError> {
        if year < 1 {
            return Err(CalendarError::YearOutOfRange(year));
        }
        if month < NISSAN || month > months_in_year(year) {
            return Err(CalendarError::MonthOutOfRange { year, month });
        }
        let month_length = days_in_month(year, month);
        if day < 1 || day > month_length {
            return Err(CalendarError::DayOutOfRange {
                year,
                month,
                day,
                month_length,
            });
        }
        Ok(Self { year, month, day })
    }

    /// The date at the given Rata Die absolute day number. Total for any
    /// day on or after the Hebrew epoch.
    pub fn from_abs(abs: i64) -> Self {
        let mut year = i32::try_from(((abs - HEBREW_EPOCH) / 366).max(1)).unwrap_or(1);
        while abs >= Self::ymd_abs(year + 1, TISHREI, 1) {
            year += 1;
        }
        let mut month = if abs < Self::ymd_abs(year, NISSAN, 1) {
            TISHREI
        } else {
            NISSAN
        };
        while abs > Self::ymd_abs(year, month, days_in_month(year, month)) {
            month += 1;
        }
        let day = (abs - Self::ymd_abs(year, month, 1) + 1) as u8;
        Self { year, month, day }
    }

    /// Absolute day number of an unchecked (year, month, day) triple.
    fn ymd_abs(year: i32, month: u8, day: u8) -> i64 {
        let mut total = i64::from(day);
        if month < TISHREI {
            // Months of the civil year before Nissan, then Nissan onward.
            for m in TISHREI..=months_in_year(year) {
                total += i64::from(days_in_month(year, m));
            }
            for m in NISSAN..month {
                total += i64::from(days_in_month(year, m));
            }
        } else {
            for m in TISHREI..month {
                total += i64::from(days_in_month(year, m));
            }
        }
        total + elapsed_days(year) + HEBREW_EPOCH
    }

    /// The year.
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// The month number (Nissan = 1 .. Adar Sheini = 13).
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// The day of the month (1..30).
    pub const fn day(&self) -> u8 {
        self.day
    }

    /// Rata Die absolute day number; strictly monotonic, one per day.
    pub fn abs(&self) -> i64 {
        Self::ymd_abs(self.year, self.month, self.day)
    }

    /// Day of the week, 0 = Sunday through 6 = Shabbos.
    pub fn day_of_week(&self) -> u8 {
        self.abs().rem_euclid(7) as u8
    }

    /// The date `n` days later (earlier for negative `n`).
    pub fn add_days(&self, n: i64) -> Self {
        Self::from_abs(self.abs() + n)
    }

    /// The date `n` months later (earlier for negative `n`), walking the
    /// real month sequence and clamping the day to the target month length.
    pub fn add_months(&self, n: i32) -> Self {
        let (mut year, mut month) = (self.year, self.month);
        for _ in 0..n.unsigned_abs() {
            (year, month) = if n >= 0 {
                next_month(year, month)
            } else {
                previous_month(year, month)
            };
        }
        let day = self.day.min(days_in_month(year, month));
        Self { year, month, day }
    }

    /// Signed day count from `self` to `other` (positive when `other` is
    /// later). Exclusive of both endpoints' "inclusive" conventions: this
    /// is a plain difference of absolute day numbers.
    pub fn diff_days(&self, other: &Self) -> i64 {
        other.abs() - self.abs()
    }

    /// Signed count of month boundaries from `self`'s month to `other`'s
    /// month, leap months included. The day of the month is ignored.
    pub fn diff_months(&self, other: &Self) -> i32 {
        let forward =
            Self::ymd_abs(self.year, self.month, 1) <= Self::ymd_abs(other.year, other.month, 1);
        let (from, to) = if forward {
            ((self.year, self.month), (other.year, other.month))
        } else {
            ((other.year, other.month), (self.year, self.month))
        };
        let mut count = 0;
        let (mut year, mut month) = from;
        while (year, month) != to {
            (year, month) = next_month(year, month);
            count += 1;
        }
        if forward {
            count
        } else {
            -count
        }
    }

    /// The Hebrew date of the given Gregorian day.
    pub fn from_gregorian(date: NaiveDate) -> Self {
        Self::from_abs(i64::from(date.num_days_from_ce()))
    }

    /// The Gregorian day of this date, or `None` outside `chrono`'s range.
    pub fn to_gregorian(&self) -> Option<NaiveDate> {
        NaiveDate::from_num_days_from_ce_opt(i32::try_from(self.abs()).ok()?)
    }
}

impl PartialOrd for HebrewDate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HebrewDate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.abs().cmp(&other.abs())
    }
}

impl std::fmt::Display for HebrewDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.day,
            month_name(self.year, self.month),
            self.year
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leap_years_follow_the_nineteen_year_cycle() {
        // Years 3, 6, 8, 11, 14, 17 and 19 of each cycle are leap.
        // 5758 is year 1 of a cycle (5758 = 19 * 303 + 1).
        let leap_positions = [3, 6, 8, 11, 14, 17, 19];
        for offset in 1..=19 {
            let year = 5757 + offset;
            assert_eq!(
                is_leap_year(year),
                leap_positions.contains(&offset),
                "year {year} (cycle position {offset})"
            );
        }
        assert!(is_leap_year(5784));
        assert!(!is_leap_year(5785));
    }

    #[test]
    fn fixed_month_lengths() {
        assert_eq!(days_in_month(5785, NISSAN), 30);
        assert_eq!(days_in_month(5785, IYAR), 29);
        assert_eq!(days_in_month(5785, TISHREI), 30);
        assert_eq!(days_in_month(5785, TEVES), 29);
        assert_eq!(days_in_month(5785, ADAR), 29);
        assert_eq!(days_in_month(5784, ADAR), 30); // Adar Rishon in a leap year
        assert_eq!(days_in_month(5784, ADAR_SHEINI), 29);
    }

    #[test]
    fn year_length_matches_month_lengths() {
        for year in [5780, 5781, 5782, 5783, 5784, 5785, 5786] {
            let total: i64 = (NISSAN..=months_in_year(year))
                .map(|m| i64::from(days_in_month(year, m)))
                .sum();
            assert_eq!(total, days_in_year(year), "year {year}");
        }
    }

    #[test]
    fn golden_gregorian_anchors() {
        let rh_5760 = HebrewDate::new(5760, TISHREI, 1).unwrap();
        assert_eq!(rh_5760.abs(), 730_008);
        assert_eq!(rh_5760.day_of_week(), 6); // Shabbos, September 11 1999
        assert_eq!(
            rh_5760.to_gregorian(),
            NaiveDate::from_ymd_opt(1999, 9, 11)
        );

        let rh_5786 = HebrewDate::new(5786, TISHREI, 1).unwrap();
        assert_eq!(rh_5786.day_of_week(), 2); // Tuesday, September 23 2025
        assert_eq!(
            rh_5786.to_gregorian(),
            NaiveDate::from_ymd_opt(2025, 9, 23)
        );

        let pesach_5785 = HebrewDate::new(5785, NISSAN, 15).unwrap();
        assert_eq!(pesach_5785.day_of_week(), 0); // Sunday, April 13 2025
        assert_eq!(
            pesach_5785.to_gregorian(),
            NaiveDate::from_ymd_opt(2025, 4, 13)
        );
    }

    #[test]
    fn gregorian_roundtrip() {
        let greg = NaiveDate::from_ymd_opt(2025, 4, 13).unwrap();
        let heb = HebrewDate::from_gregorian(greg);
        assert_eq!(heb, HebrewDate::new(5785, NISSAN, 15).unwrap());
        assert_eq!(heb.to_gregorian(), Some(greg));
    }

    #[test]
    fn from_abs_roundtrip_across_year_boundaries() {
        let start = HebrewDate::new(5785, ELUL, 25).unwrap();
        for offset in 0..40 {
            let date = start.add_days(offset);
            assert_eq!(HebrewDate::from_abs(date.abs()), date);
            assert_eq!(date.abs(), start.abs() + offset);
        }
    }

    #[test]
    fn add_months_walks_the_month_sequence() {
        let date = HebrewDate::new(5785, NISSAN, 15).unwrap();
        let next = date.add_months(1);
        assert_eq!((next.year(), next.month(), next.day()), (5785, IYAR, 15));

        // Elul rolls into Tishrei of the next civil year.
        let elul = HebrewDate::new(5785, ELUL, 10).unwrap();
        let tishrei = elul.add_months(1);
        assert_eq!((tishrei.year(), tishrei.month()), (5786, TISHREI));

        // A leap year inserts Adar Sheini before Nissan.
        let adar = HebrewDate::new(5784, ADAR, 10).unwrap();
        assert_eq!(adar.add_months(1).month(), ADAR_SHEINI);
        assert_eq!(adar.add_months(2).month(), NISSAN);

        assert_eq!(date.add_months(3).add_months(-3), date);
    }

    #[test]
    fn add_months_clamps_the_day() {
        // 30 Nissan + 1 month lands in 29-day Iyar.
        let date = HebrewDate::new(5785, NISSAN, 30).unwrap();
        let next = date.add_months(1);
        assert_eq!((next.month(), next.day()), (IYAR, 29));
    }

    #[test]
    fn diff_months_counts_boundaries_both_ways() {
        let a = HebrewDate::new(5785, NISSAN, 15).unwrap();
        let b = HebrewDate::new(5785, SIVAN, 2).unwrap();
        assert_eq!(a.diff_months(&b), 2);
        assert_eq!(b.diff_months(&a), -2);
        assert_eq!(a.diff_months(&a), 0);

        // Across a leap year's Adar Sheini.
        let c = HebrewDate::new(5784, ADAR, 1).unwrap();
        let d = HebrewDate::new(5784, NISSAN, 1).unwrap();
        assert_eq!(c.diff_months(&d), 2);
    }

    #[test]
    fn construction_rejects_bad_parts() {
        assert!(matches!(
            HebrewDate::new(0, NISSAN, 1),
            Err(CalendarError::YearOutOfRange(0))
        ));
        assert!(matches!(
            HebrewDate::new(5785, ADAR_SHEINI, 1),
            Err(CalendarError::MonthOutOfRange { .. })
        ));
        assert!(matches!(
            HebrewDate::new(5785, IYAR, 30),
            Err(CalendarError::DayOutOfRange { .. })
        ));
        assert!(HebrewDate::new(5784, ADAR_SHEINI, 29).is_ok());
    }

    #[test]
    fn ordering_follows_absolute_days() {
        let a = HebrewDate::new(5785, ELUL, 29).unwrap();
        let b = HebrewDate::new(5786, TISHREI, 1).unwrap();
        assert!(a < b);
        assert_eq!(a.diff_days(&b), 1);
    }

    #[test]
    fn display_names_the_month() {
        let date = HebrewDate::new(5785, NISSAN, 15).unwrap();
        assert_eq!(date.to_string(), "15 Nissan 5785");
        let adar1 = HebrewDate::new(5784, ADAR, 3).unwrap();
        assert_eq!(adar1.to_string(), "3 Adar Rishon 5784");
    }

    #[test]
    fn serde_roundtrip() {
        let date = HebrewDate::new(5785, NISSAN, 15).unwrap();
        let json = serde_json::to_string(&date).unwrap();
        let back: HebrewDate = serde_json::from_str(&json).unwrap();
        assert_eq!(date, back);
    }
}
