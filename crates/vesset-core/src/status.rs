//! The binary niddah/tahara resolver over a span of days.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vesset_calendar::HebrewDate;

use crate::entry_list::EntryList;
use crate::tahara::{TaharaEvent, TaharaEventKind};

/// The status of a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NiddahStatus {
    /// From an observed onset until immersion.
    Niddah,
    /// The default state, restored by the mikvah.
    Tahara,
}

/// One status-changing event on the merged timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusEvent {
    Entry,
    Mikvah,
}

/// Resolves the status of arbitrary days from the entry log and the
/// mikvah events.
///
/// Every entry opens a niddah span on its date; every mikvah event closes
/// one on its date. The timeline merges both, chronologically; other
/// tahara milestones (hefsek, bedikas) do not change the status. When an
/// entry and a mikvah land on the same day the entry wins.
pub struct StatusCalculator {
    /// `(abs day, event)` pairs, sorted by day with entries after mikvahs
    /// so the entry prevails on a shared day.
    events: Vec<(i64, StatusEvent)>,
}

impl StatusCalculator {
    /// Build the merged timeline from a log and its tahara events.
    pub fn new(list: &EntryList, tahara_events: &[TaharaEvent]) -> Self {
        let mut events: Vec<(i64, StatusEvent)> = list
            .iter()
            .map(|e| (e.abs(), StatusEvent::Entry))
            .chain(
                tahara_events
                    .iter()
                    .filter(|e| e.kind == TaharaEventKind::Mikvah)
                    .map(|e| (e.date.abs(), StatusEvent::Mikvah)),
            )
            .collect();
        events.sort_by_key(|&(abs, event)| (abs, event == StatusEvent::Entry));
        Self { events }
    }

    /// The status of each queried day, keyed by absolute day number.
    ///
    /// The first day inherits from the last event strictly before it
    /// (tahara when there is none); later days carry forward, flipped by
    /// any event falling on them.
    pub fn statuses(&self, days: &[HebrewDate]) -> BTreeMap<i64, NiddahStatus> {
        let mut map = BTreeMap::new();
        let Some(first) = days.first() else {
            return map;
        };

        let mut current = self
            .events
            .iter()
            .take_while(|&&(abs, _)| abs < first.abs())
            .last()
            .map_or(NiddahStatus::Tahara, |&(_, event)| status_after(event));

        for day in days {
            for &(_, event) in self.events.iter().filter(|&&(abs, _)| abs == day.abs()) {
                current = status_after(event);
            }
            map.insert(day.abs(), current);
        }
        map
    }
}

const fn status_after(event: StatusEvent) -> NiddahStatus {
    match event {
        StatusEvent::Entry => NiddahStatus::Niddah,
        StatusEvent::Mikvah => NiddahStatus::Tahara,
    }
}
