//! Tahara milestones derived from the entry log: the hefsek tahara, the
//! seven-clean-days bedikas and the mikvah night.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use vesset_calendar::HebrewDate;

use crate::entry::EntryId;
use crate::entry_list::EntryList;
use crate::settings::Settings;

/// The kind of a tahara milestone.
///
/// The string forms round-trip through the persistence layer (`"hefsek"`,
/// `"bedika"`, `"shailah"`, `"mikvah"`); `Display` gives the label shown
/// on the calendar.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TaharaEventKind {
    /// The internal examination before sunset that ends the niddah flow.
    #[strum(to_string = "Hefsek Tahara", serialize = "hefsek")]
    Hefsek,
    /// An internal examination during the seven clean days.
    #[strum(to_string = "Bedika", serialize = "bedika")]
    Bedika,
    /// A question pending rabbinic decision.
    #[strum(to_string = "Shailah", serialize = "shailah")]
    Shailah,
    /// Immersion on the night after the seventh clean day.
    #[strum(to_string = "Mikvah", serialize = "mikvah")]
    Mikvah,
}

/// A single milestone on the tahara calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaharaEvent {
    /// The Hebrew date the milestone falls on.
    pub date: HebrewDate,
    /// What kind of milestone it is.
    pub kind: TaharaEventKind,
    /// The entry that generated it, when derived rather than recorded.
    pub source_entry: Option<EntryId>,
    /// Storage identifier, when persisted.
    pub id: Option<String>,
}

impl TaharaEvent {
    /// A derived milestone with no storage identity.
    pub const fn new(date: HebrewDate, kind: TaharaEventKind) -> Self {
        Self {
            date,
            kind,
            source_entry: None,
            id: None,
        }
    }

    /// Sort a list of milestones chronologically, in place.
    pub fn sort_list(events: &mut [Self]) {
        events.sort_by_key(|e| e.date.abs());
    }
}

impl std::fmt::Display for TaharaEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} on {}", self.kind, self.date)
    }
}

/// The projected milestone chain for every entry in the log.
///
/// Per entry: the hefsek at four or five days from the onset inclusive
/// (per `four_day_hefsek`), a bedika on the first and seventh clean days,
/// and the mikvah night after the seventh. A following entry on or before
/// the hefsek cancels the entry's whole chain; each later milestone is
/// individually cancelled when the next entry arrives before it. The
/// mikvah night belongs to the following date, so its cutoff is a day
/// earlier than its date.
pub fn generate_tahara_events(list: &EntryList, settings: &Settings) -> Vec<TaharaEvent> {
    let mut events = Vec::new();
    let entries: Vec<_> = list.iter().filter(|e| !e.ignore_for_flagged_dates).collect();

    for (i, entry) in entries.iter().enumerate() {
        let next = entries.get(i + 1);
        let cancelled_by_next = |abs: i64| next.is_some_and(|n| n.abs() <= abs);

        let hefsek = entry.hefsek_date(settings.four_day_hefsek);
        if cancelled_by_next(hefsek.abs()) {
            continue;
        }
        let mut push = |date: HebrewDate, kind: TaharaEventKind| {
            events.push(TaharaEvent {
                date,
                kind,
                source_entry: entry.id.clone(),
                id: None,
            });
        };
        push(hefsek, TaharaEventKind::Hefsek);

        let day1 = hefsek.add_days(1);
        if cancelled_by_next(day1.abs()) {
            continue;
        }
        push(day1, TaharaEventKind::Bedika);

        let day7 = hefsek.add_days(7);
        if cancelled_by_next(day7.abs()) {
            continue;
        }
        push(day7, TaharaEventKind::Bedika);

        // The mikvah night opens the eighth date but follows the seventh
        // clean day, so an entry on the seventh still cancels it.
        let mikvah = hefsek.add_days(8);
        if cancelled_by_next(mikvah.abs() - 1) {
            continue;
        }
        push(mikvah, TaharaEventKind::Mikvah);
    }

    events
}
