//! The entry: a single recorded onset, anchored to one [`Onah`].
//!
//! An [`Entry`] is the raw, persisted record and carries no interval of its
//! own. The haflaga (inclusive day count from the previous effective entry)
//! lives on [`EffectiveEntry`], the derived view handed out by
//! [`crate::EntryList::effective`], so the raw record can never be observed
//! with a stale interval.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vesset_calendar::HebrewDate;

use crate::onah::{NightDay, Onah};

/// Error from [`EntryId`] validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EntryIdError {
    /// Identifiers come from the persistence layer and are never empty.
    #[error("entry id cannot be empty")]
    Empty,
}

/// Opaque identifier assigned to a persisted entry by the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Validate and wrap a raw identifier.
    ///
    /// # Errors
    ///
    /// Returns [`EntryIdError::Empty`] for an empty string.
    pub fn new(raw: impl Into<String>) -> Result<Self, EntryIdError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(EntryIdError::Empty);
        }
        Ok(Self(raw))
    }

    /// The underlying identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single recorded onset.
///
/// Two entries are "the same" when they share an onah; there can never be
/// more than one entry per onah (see [`crate::EntryList::add`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// The half-day the onset was observed on.
    pub onah: Onah,
    /// Storage identifier, when persisted.
    pub id: Option<EntryId>,
    /// Not a real onset: excluded from flagged-date projection (and,
    /// transitively, from the effective list).
    pub ignore_for_flagged_dates: bool,
    /// Excluded from kavuah detection only.
    pub ignore_for_kavuah: bool,
    /// Free-form notes.
    pub comments: Option<String>,
}

impl Entry {
    /// A plain entry at the given onah, included everywhere.
    pub const fn new(onah: Onah) -> Self {
        Self {
            onah,
            id: None,
            ignore_for_flagged_dates: false,
            ignore_for_kavuah: false,
            comments: None,
        }
    }

    /// The entry's Hebrew date.
    pub const fn date(&self) -> HebrewDate {
        self.onah.date
    }

    /// The entry's night/day portion.
    pub const fn night_day(&self) -> NightDay {
        self.onah.night_day
    }

    /// Day of the Hebrew month.
    pub const fn day(&self) -> u8 {
        self.onah.date.day()
    }

    /// Absolute day number of the entry's date.
    pub fn abs(&self) -> i64 {
        self.onah.date.abs()
    }

    /// Day of the week (0 = Sunday .. 6 = Shabbos).
    pub fn day_of_week(&self) -> u8 {
        self.onah.date.day_of_week()
    }

    /// Same onah (the identity used for duplicate rejection and removal).
    pub fn is_same_entry(&self, other: &Self) -> bool {
        self.onah.is_same_onah(&other.onah)
    }

    /// Signed half-day count from this entry to a later one.
    pub fn onah_differential(&self, later: &Self) -> i64 {
        let mut count = self.date().diff_days(&later.date()) * 2;
        match self.night_day().cmp(&later.night_day()) {
            std::cmp::Ordering::Less => count += 1,
            std::cmp::Ordering::Greater => count -= 1,
            std::cmp::Ordering::Equal => {}
        }
        count
    }

    /// The hefsek tahara date for this onset: four or five days from the
    /// entry inclusive, per the configured custom.
    pub fn hefsek_date(&self, four_day_hefsek: bool) -> HebrewDate {
        self.date().add_days(if four_day_hefsek { 3 } else { 4 })
    }
}

impl std::fmt::Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.onah)
    }
}

/// An entry as seen through the effective list, with its haflaga attached.
///
/// `haflaga` is the inclusive day count from the previous effective entry
/// (same day = 1, next day = 2); 0 marks the first effective entry, which
/// has no interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveEntry {
    /// The underlying raw entry.
    pub entry: Entry,
    /// Inclusive day count from the previous effective entry; 0 for the
    /// first.
    pub haflaga: i64,
}

impl EffectiveEntry {
    /// The entry's onah.
    pub const fn onah(&self) -> Onah {
        self.entry.onah
    }

    /// The entry's Hebrew date.
    pub const fn date(&self) -> HebrewDate {
        self.entry.onah.date
    }

    /// The entry's night/day portion.
    pub const fn night_day(&self) -> NightDay {
        self.entry.onah.night_day
    }

    /// Day of the Hebrew month.
    pub const fn day(&self) -> u8 {
        self.entry.onah.date.day()
    }

    /// Absolute day number.
    pub fn abs(&self) -> i64 {
        self.entry.abs()
    }

    /// Day of the week (0 = Sunday .. 6 = Shabbos).
    pub fn day_of_week(&self) -> u8 {
        self.entry.day_of_week()
    }

    /// Signed half-day count to a later effective entry.
    pub fn onah_differential(&self, later: &Self) -> i64 {
        self.entry.onah_differential(&later.entry)
    }
}

impl std::fmt::Display for EffectiveEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.entry)?;
        if self.haflaga > 0 {
            write!(f, " [Haflaga of {}]", self.haflaga)?;
        }
        Ok(())
    }
}
