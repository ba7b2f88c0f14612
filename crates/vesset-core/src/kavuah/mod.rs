//! The kavuah: a fixed recurrence pattern over entries.
//!
//! A kavuah is established when three (four, for the interval families)
//! entries occur in one of nine recognized patterns. The families split by
//! **independence**: an independent kavuah survives an unrelated entry in
//! between its matching entries, while a dependent one measures from the
//! immediately preceding entry and requires its entries to be consecutive.
//!
//! The nine families are a closed tagged union; adding a family forces the
//! detector, the matcher and the projector to handle it, or the crate stops
//! compiling.

pub mod detect;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vesset_calendar::{day_of_week_name, HebrewDate};

use crate::entry::EffectiveEntry;
use crate::entry_list::EntryList;
use crate::onah::{NightDay, Onah};
use crate::settings::Settings;

/// Error from [`KavuahId`] validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KavuahIdError {
    /// Identifiers come from the persistence layer and are never empty.
    #[error("kavuah id cannot be empty")]
    Empty,
}

/// Opaque identifier assigned to a persisted kavuah by the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KavuahId(String);

impl KavuahId {
    /// Validate and wrap a raw identifier.
    ///
    /// # Errors
    ///
    /// Returns [`KavuahIdError::Empty`] for an empty string.
    pub fn new(raw: impl Into<String>) -> Result<Self, KavuahIdError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(KavuahIdError::Empty);
        }
        Ok(Self(raw))
    }

    /// The underlying identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The nine kavuah families, each carrying its family-specific magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum KavuahKind {
    /// Fixed inclusive day interval between consecutive entries.
    Haflagah {
        /// The inclusive day count between consecutive entries.
        interval: i64,
    },
    /// The same day of the Hebrew month, every month.
    DayOfMonth {
        /// The day of the month (1..=30).
        day: u8,
    },
    /// The same weekday at a fixed whole-day interval.
    DayOfWeek {
        /// The day gap between entries (a multiple of 7).
        interval_days: i64,
    },
    /// The same day of the month at a fixed multi-month interval.
    Sirug {
        /// Months between entries (> 1).
        month_interval: i32,
    },
    /// An interval that grows or shrinks by a constant step each entry.
    DilugHaflaga {
        /// Days added to the haflaga per entry (may be negative).
        step: i64,
    },
    /// A day-of-month that shifts by a constant step each month.
    DilugDayOfMonth {
        /// Days the day-of-month shifts per month (may be negative).
        step: i64,
    },
    /// Haflagah recorded through an open wound (ma'ayan pasuach); kept as
    /// its own family for record-keeping.
    HaflagaMaayanPasuach {
        /// The inclusive day count between consecutive entries.
        interval: i64,
    },
    /// Day-of-month recorded through an open wound (ma'ayan pasuach).
    DayOfMonthMaayanPasuach {
        /// The day of the month (1..=30).
        day: u8,
    },
    /// Fixed interval counted in onahs (half-days), per Shulchan Aruch
    /// Harav.
    HaflagaOnahs {
        /// The half-day count between consecutive entries.
        onah_interval: i64,
    },
}

impl KavuahKind {
    /// Is this family independent?
    ///
    /// Independent kavuahs are anchored to the calendar, so an unrelated
    /// entry in between does not unset them. Dependent kavuahs measure the
    /// gap from the immediately previous entry, so an interloper breaks
    /// the chain.
    pub const fn is_independent(&self) -> bool {
        matches!(
            self,
            Self::DayOfMonth { .. }
                | Self::DayOfMonthMaayanPasuach { .. }
                | Self::DayOfWeek { .. }
                | Self::DilugDayOfMonth { .. }
                | Self::Sirug { .. }
        )
    }

    /// The family-specific magnitude as a bare integer.
    pub const fn magnitude(&self) -> i64 {
        match *self {
            Self::Haflagah { interval } | Self::HaflagaMaayanPasuach { interval } => interval,
            Self::DayOfMonth { day } | Self::DayOfMonthMaayanPasuach { day } => day as i64,
            Self::DayOfWeek { interval_days } => interval_days,
            Self::Sirug { month_interval } => month_interval as i64,
            Self::DilugHaflaga { step } | Self::DilugDayOfMonth { step } => step,
            Self::HaflagaOnahs { onah_interval } => onah_interval,
        }
    }

    /// Short display name of the family.
    pub const fn family_name(&self) -> &'static str {
        match self {
            Self::Haflagah { .. } => "Haflaga",
            Self::DayOfMonth { .. } => "Day of Month",
            Self::DayOfWeek { .. } => "Day of Week",
            Self::Sirug { .. } => "Sirug",
            Self::DilugHaflaga { .. } => "\"Dilug\" of Haflaga",
            Self::DilugDayOfMonth { .. } => "\"Dilug\" of Day of Month",
            Self::HaflagaMaayanPasuach { .. } => "Haflaga with Ma'ayan Pasuach",
            Self::DayOfMonthMaayanPasuach { .. } => "Day of Month with Ma'ayan Pasuach",
            Self::HaflagaOnahs { .. } => "Haflaga of Onahs",
        }
    }

    /// What the magnitude means for this family (form-label text).
    pub const fn magnitude_definition(&self) -> &'static str {
        match self {
            Self::DayOfMonth { .. } | Self::DayOfMonthMaayanPasuach { .. } => {
                "Day of each Jewish Month"
            }
            Self::DayOfWeek { .. } | Self::Haflagah { .. } | Self::HaflagaMaayanPasuach { .. } => {
                "Number of days between entries (Haflaga)"
            }
            Self::DilugDayOfMonth { .. } => "Number of days to add/subtract each month",
            Self::DilugHaflaga { .. } => "Number of days to add/subtract to Haflaga each Entry",
            Self::HaflagaOnahs { .. } => "Number of Onahs between entries",
            Self::Sirug { .. } => "Number of months separating the Entries",
        }
    }

    /// The magnitude a chosen setting entry pins down for this family, used
    /// to pre-fill the field when a kavuah is entered by hand.
    ///
    /// The interval families take the setting entry's own haflaga and the
    /// monthly families its day of the month; HaflagaOnahs measures the
    /// half-day count from the previous effective entry. Families whose
    /// magnitude the setting entry does not determine yield `None`, as does
    /// a first entry, which has no interval.
    pub fn default_magnitude(
        &self,
        setting: &EffectiveEntry,
        effective: &[EffectiveEntry],
    ) -> Option<i64> {
        match self {
            Self::Haflagah { .. } | Self::HaflagaMaayanPasuach { .. } => {
                (setting.haflaga > 0).then_some(setting.haflaga)
            }
            Self::DayOfMonth { .. } | Self::DayOfMonthMaayanPasuach { .. } => {
                Some(i64::from(setting.day()))
            }
            Self::HaflagaOnahs { .. } => {
                let index = effective
                    .iter()
                    .position(|e| e.entry.is_same_entry(&setting.entry))?;
                let previous = effective.get(index.checked_sub(1)?)?;
                Some(previous.onah_differential(setting))
            }
            _ => None,
        }
    }
}

/// A fixed pattern (vesset kavuah), detected or declared.
///
/// The anchor is the *setting onah* (the onah of the entry that
/// established the chazakah) rather than an embedded entry reference, so
/// a kavuah serializes independently of the log it was derived from.
/// Anything that needs the anchor entry's haflaga looks it up in the
/// effective list; a missing anchor makes the kavuah vacuously
/// non-matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kavuah {
    /// The family and its magnitude.
    pub kind: KavuahKind,
    /// The onah of the setting entry (the third or fourth of the pattern).
    pub setting_onah: Onah,
    /// Does this kavuah cancel the Onah Beinonis baseline flags?
    pub cancels_onah_beinonis: bool,
    /// Is the kavuah currently in force?
    pub active: bool,
    /// Excluded from all calculations without being deleted.
    pub ignored: bool,
    /// Storage identifier, when persisted.
    pub id: Option<KavuahId>,
}

impl Kavuah {
    /// A new active kavuah of the given family anchored at the given onah.
    pub const fn new(kind: KavuahKind, setting_onah: Onah) -> Self {
        Self {
            kind,
            setting_onah,
            cancels_onah_beinonis: false,
            active: true,
            ignored: false,
            id: None,
        }
    }

    /// Same family, magnitude and anchor onah. Activity flags and storage
    /// identity are not part of the comparison.
    pub fn matches_kavuah(&self, other: &Self) -> bool {
        self.kind == other.kind && self.setting_onah.is_same_onah(&other.setting_onah)
    }

    /// Does the magnitude agree with the anchor, for the families where
    /// the anchor pins it down?
    ///
    /// A pure validation predicate: construction never rejects an
    /// inconsistent kavuah (records may legitimately be hand-edited), so
    /// callers validate before persisting. Looks up the anchor entry's
    /// haflaga in `list`; an absent anchor fails the interval families.
    pub fn magnitude_matches_anchor(&self, list: &EntryList) -> bool {
        if self.kind.magnitude() == 0 {
            return false;
        }
        match self.kind {
            KavuahKind::Haflagah { interval } | KavuahKind::HaflagaMaayanPasuach { interval } => {
                interval > 0
                    && self.anchor_entry(&list.effective()).is_some_and(|anchor| {
                        anchor.haflaga == interval || anchor.haflaga == 0
                    })
            }
            KavuahKind::DayOfMonth { day } | KavuahKind::DayOfMonthMaayanPasuach { day } => {
                (1..=30).contains(&day) && day == self.setting_onah.date.day()
            }
            KavuahKind::HaflagaOnahs { onah_interval } => onah_interval > 0,
            KavuahKind::DayOfWeek { .. }
            | KavuahKind::Sirug { .. }
            | KavuahKind::DilugHaflaga { .. }
            | KavuahKind::DilugDayOfMonth { .. } => true,
        }
    }

    /// The anchor entry as it appears in the given effective list, if it
    /// is still there.
    fn anchor_entry<'a>(&self, effective: &'a [EffectiveEntry]) -> Option<&'a EffectiveEntry> {
        effective
            .iter()
            .find(|e| e.onah().is_same_onah(&self.setting_onah))
    }

    /// Does the given effective entry fall on this kavuah's pattern?
    ///
    /// Dependent families compare the entry's own haflaga (or its delta
    /// from the immediately preceding entry); independent families test
    /// membership in the theoretical occurrence list up to the entry's
    /// date. `HaflagaOnahs` is never matched here.
    pub fn is_entry_in_pattern(
        &self,
        entry: &EffectiveEntry,
        effective: &[EffectiveEntry],
        settings: &Settings,
    ) -> bool {
        if entry.night_day() != self.setting_onah.night_day {
            return false;
        }
        match self.kind {
            KavuahKind::Haflagah { interval } | KavuahKind::HaflagaMaayanPasuach { interval } => {
                entry.haflaga == interval
            }
            KavuahKind::DayOfMonth { day } | KavuahKind::DayOfMonthMaayanPasuach { day } => {
                entry.day() == day
            }
            KavuahKind::Sirug { month_interval } => {
                previous_of(entry, effective).is_some_and(|previous| {
                    entry.day() == self.setting_onah.date.day()
                        && previous.date().diff_months(&entry.date()) == month_interval
                })
            }
            KavuahKind::DilugHaflaga { step } => previous_of(entry, effective)
                .is_some_and(|previous| entry.haflaga == previous.haflaga + step),
            KavuahKind::DilugDayOfMonth { .. } | KavuahKind::DayOfWeek { .. } => self
                .independent_iterations(entry.date(), settings)
                .iter()
                .any(|onah| entry.onah().is_same_onah(onah)),
            KavuahKind::HaflagaOnahs { .. } => false,
        }
    }

    /// The onahs that theoretically should carry entries according to this
    /// kavuah's pattern, from the anchor up to (and one step past) `until`.
    /// Empty for dependent families.
    pub fn independent_iterations(&self, until: HebrewDate, settings: &Settings) -> Vec<Onah> {
        let night_day = self.setting_onah.night_day;
        let mut iterations = Vec::new();
        match self.kind {
            KavuahKind::DayOfWeek { interval_days } => {
                if interval_days <= 0 {
                    return iterations;
                }
                let mut next = self.setting_onah.date;
                while next.abs() < until.abs() {
                    next = next.add_days(interval_days);
                    iterations.push(Onah::new(next, night_day));
                }
            }
            KavuahKind::DilugDayOfMonth { step } => {
                let mut month = self.setting_onah.date;
                for i in 1.. {
                    month = month.add_months(1);
                    let next = month.add_days(step * i);
                    if next.abs() > until.abs() || next.abs() <= self.setting_onah.date.abs() {
                        break;
                    }
                    // The dilug ran off the end (or the start) of the month.
                    let drift = i64::from(self.setting_onah.date.day()) - i64::from(next.day());
                    if !settings.dilug_chodesh_past_ends && drift.signum() == step.signum() {
                        break;
                    }
                    iterations.push(Onah::new(next, night_day));
                }
            }
            KavuahKind::DayOfMonth { .. }
            | KavuahKind::DayOfMonthMaayanPasuach { .. }
            | KavuahKind::Sirug { .. } => {
                let months = match self.kind {
                    KavuahKind::Sirug { month_interval } => month_interval,
                    _ => 1,
                };
                if months <= 0 {
                    return iterations;
                }
                let mut next = self.setting_onah.date;
                while next.abs() < until.abs() {
                    next = next.add_months(months);
                    iterations.push(Onah::new(next, night_day));
                }
            }
            KavuahKind::Haflagah { .. }
            | KavuahKind::HaflagaMaayanPasuach { .. }
            | KavuahKind::DilugHaflaga { .. }
            | KavuahKind::HaflagaOnahs { .. } => {}
        }
        iterations
    }
}

/// The effective entry immediately before `entry`, located by onah.
fn previous_of<'a>(
    entry: &EffectiveEntry,
    effective: &'a [EffectiveEntry],
) -> Option<&'a EffectiveEntry> {
    let index = effective
        .iter()
        .position(|e| e.onah().is_same_onah(&entry.onah()))?;
    index.checked_sub(1).and_then(|i| effective.get(i))
}

/// English ordinal suffix ("1st", "2nd", ...).
fn ordinal(n: i64) -> String {
    let j = n % 10;
    let k = n % 100;
    let suffix = if j == 1 && k != 11 {
        "st"
    } else if j == 2 && k != 12 {
        "nd"
    } else if j == 3 && k != 13 {
        "rd"
    } else {
        "th"
    };
    format!("{n}{suffix}")
}

impl std::fmt::Display for Kavuah {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.ignored {
            write!(f, "[IGNORED] ")?;
        } else if !self.active {
            write!(f, "[INACTIVE] ")?;
        }
        match self.setting_onah.night_day {
            NightDay::Night => write!(f, "Night-time ")?,
            NightDay::Day => write!(f, "Day-time ")?,
        }
        match self.kind {
            KavuahKind::Haflagah { interval } => write!(f, "every {interval} days")?,
            KavuahKind::DayOfMonth { day } => write!(
                f,
                "on every {} day of the Jewish Month",
                ordinal(i64::from(day))
            )?,
            KavuahKind::DayOfWeek { interval_days } => write!(
                f,
                "on the {} of every {} week",
                day_of_week_name(self.setting_onah.date.day_of_week()),
                ordinal(interval_days / 7)
            )?,
            KavuahKind::Sirug { month_interval } => write!(
                f,
                "on the {} day of every {} month",
                ordinal(i64::from(self.setting_onah.date.day())),
                ordinal(i64::from(month_interval))
            )?,
            KavuahKind::HaflagaMaayanPasuach { interval } => {
                write!(f, "every {interval} days (through Ma'ayan Pasuach)")?;
            }
            KavuahKind::DayOfMonthMaayanPasuach { day } => write!(
                f,
                "on the {} day of the Jewish Month (through Ma'ayan Pasuach)",
                ordinal(i64::from(day))
            )?,
            KavuahKind::DilugHaflaga { step } => write!(
                f,
                "of \"Dilug Haflaga\" in the interval pattern of \"{} {} days\"",
                if step < 0 { "subtract" } else { "add" },
                step.abs()
            )?,
            KavuahKind::DilugDayOfMonth { step } => write!(
                f,
                "of \"Dilug Yom Hachodesh\" in the interval pattern of \"{} {} days\"",
                if step < 0 { "subtract" } else { "add" },
                step.abs()
            )?,
            KavuahKind::HaflagaOnahs { onah_interval } => {
                write!(f, "every {onah_interval} Onahs")?;
            }
        }
        write!(f, ".")
    }
}
