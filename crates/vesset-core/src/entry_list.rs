//! The entry list: a chronologically ordered log of entries, unique per
//! onah, with the derived effective view that carries haflagas.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::entry::{EffectiveEntry, Entry, EntryId};
use crate::flagged::{FlaggedDatesGenerator, ProblemOnah};
use crate::kavuah::Kavuah;
use crate::settings::Settings;

/// An ordered collection of [`Entry`] records.
///
/// The list is kept chronologically sorted at all times and enforces
/// uniqueness on the onah. Mutation happens only through [`Self::add`] and
/// the removal methods; every derived view ([`Self::effective`] and
/// everything built on it) is recomputed from scratch on each call, so a
/// caller can never observe the log mid-mutation with stale intervals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryList {
    entries: Vec<Entry>,
}

impl EntryList {
    /// An empty log.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a log from unordered records, dropping onah duplicates
    /// (first occurrence wins).
    pub fn from_entries(entries: impl IntoIterator<Item = Entry>) -> Self {
        let mut list = Self::new();
        for entry in entries {
            let _ = list.add(entry);
        }
        list
    }

    /// Insert an entry in chronological position.
    ///
    /// Returns the insertion index, or `None` (without inserting) when an
    /// entry for the same onah already exists. Duplication is not an error;
    /// callers that care must check the result.
    pub fn add(&mut self, entry: Entry) -> Option<usize> {
        if self.entries.iter().any(|e| e.is_same_entry(&entry)) {
            return None;
        }
        let index = self.entries.partition_point(|e| e.onah < entry.onah);
        self.entries.insert(index, entry);
        Some(index)
    }

    /// Remove the first entry matching the given one by onah equality.
    pub fn remove(&mut self, entry: &Entry) -> Option<Entry> {
        let index = self.entries.iter().position(|e| e.is_same_entry(entry))?;
        Some(self.entries.remove(index))
    }

    /// Remove the entry carrying the given storage identifier.
    pub fn remove_by_id(&mut self, id: &EntryId) -> Option<Entry> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id.as_ref() == Some(id))?;
        Some(self.entries.remove(index))
    }

    /// Is an entry with the same onah present?
    pub fn contains(&self, entry: &Entry) -> bool {
        self.entries.iter().any(|e| e.is_same_entry(entry))
    }

    /// Look an entry up by its storage identifier.
    pub fn find_by_id(&self, id: &EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id.as_ref() == Some(id))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the log empty?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Chronological iteration over all entries.
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Entry at the given chronological index.
    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// All entries, most recent first.
    pub fn descending(&self) -> Vec<&Entry> {
        self.entries.iter().rev().collect()
    }

    /// The chronologically last entry of any kind.
    pub fn last_entry(&self) -> Option<&Entry> {
        self.entries.last()
    }

    /// The effective list: entries not excluded from projection, in
    /// chronological order, each with its haflaga.
    ///
    /// The haflaga of element `i` is the inclusive day count from element
    /// `i - 1` (same day = 1, next day = 2); the first element carries 0.
    /// Recomputed in full on every call.
    pub fn effective(&self) -> Vec<EffectiveEntry> {
        let real: Vec<&Entry> = self
            .entries
            .iter()
            .filter(|e| !e.ignore_for_flagged_dates)
            .collect();
        let mut out = Vec::with_capacity(real.len());
        if let Some(first) = real.first() {
            out.push(EffectiveEntry {
                entry: (*first).clone(),
                haflaga: 0,
            });
        }
        out.extend(real.iter().tuple_windows().map(|(prev, cur)| {
            EffectiveEntry {
                entry: (*cur).clone(),
                haflaga: prev.date().diff_days(&cur.date()) + 1,
            }
        }));
        out
    }

    /// The chronologically last effective entry, with its haflaga.
    pub fn last_effective(&self) -> Option<EffectiveEntry> {
        self.effective().pop()
    }

    /// All flagged half-days generated from this log, the given kavuahs
    /// and the halachic settings. Pure pass-through to
    /// [`FlaggedDatesGenerator`].
    pub fn problem_onahs(&self, kavuahs: &[Kavuah], settings: &Settings) -> Vec<ProblemOnah> {
        FlaggedDatesGenerator::new(self, kavuahs, settings).problem_onahs()
    }
}

impl<'a> IntoIterator for &'a EntryList {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
