//! Flagged-date projection: the half-days that require restriction.
//!
//! [`FlaggedDatesGenerator`] combines the entry log, the active kavuahs
//! and the halachic settings into a chronological list of
//! [`ProblemOnah`]s, each carrying every reason that flags it. The
//! projection is a pure derived value: recomputed on demand, never
//! persisted, total over any log/kavuah/settings combination.

use std::collections::BTreeMap;

use tracing::debug;

use vesset_calendar::HebrewDate;

use crate::entry::EffectiveEntry;
use crate::entry_list::EntryList;
use crate::kavuah::{Kavuah, KavuahKind};
use crate::onah::Onah;
use crate::settings::Settings;

/// One reason flagging one onah.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemFlag {
    /// The flagged half-day.
    pub onah: Onah,
    /// Why it is flagged.
    pub description: String,
}

impl ProblemFlag {
    /// A flag for the given onah.
    pub const fn new(onah: Onah, description: String) -> Self {
        Self { onah, description }
    }

    /// Same onah and same description.
    pub fn is_same_prob(&self, other: &Self) -> bool {
        self.onah.is_same_onah(&other.onah) && self.description == other.description
    }
}

/// All the problems of a single onah, merged from individual flags.
///
/// `flags` preserves the order the reasons were generated in; equality
/// treats it as a set.
#[derive(Debug, Clone)]
pub struct ProblemOnah {
    /// The flagged half-day.
    pub onah: Onah,
    /// One human-readable line per reason.
    pub flags: Vec<String>,
}

impl ProblemOnah {
    /// A problem onah with the given reasons.
    pub const fn new(onah: Onah, flags: Vec<String>) -> Self {
        Self { onah, flags }
    }

    /// Same onah and the same set of reasons, in any order.
    pub fn is_same_prob(&self, other: &Self) -> bool {
        self.onah.is_same_onah(&other.onah)
            && self.flags.len() == other.flags.len()
            && self.flags.iter().all(|f| other.flags.contains(f))
    }

    /// The problems of the given list that fall on the given date.
    pub fn probs_for_date<'a>(
        date: HebrewDate,
        probs: &'a [Self],
    ) -> Vec<&'a Self> {
        probs
            .iter()
            .filter(|p| p.onah.date.abs() == date.abs())
            .collect()
    }
}

impl PartialEq for ProblemOnah {
    fn eq(&self, other: &Self) -> bool {
        self.is_same_prob(other)
    }
}

impl Eq for ProblemOnah {}

impl std::fmt::Display for ProblemOnah {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "The {} is the:", self.onah)?;
        for flag in &self.flags {
            write!(f, "\n  \u{25ba}  {flag}")?;
        }
        Ok(())
    }
}

/// Projects the restriction calendar from a log, the kavuahs and the
/// settings.
pub struct FlaggedDatesGenerator<'a> {
    list: &'a EntryList,
    kavuahs: &'a [Kavuah],
    settings: &'a Settings,
}

impl<'a> FlaggedDatesGenerator<'a> {
    /// A generator over the given log, kavuahs and settings.
    pub const fn new(list: &'a EntryList, kavuahs: &'a [Kavuah], settings: &'a Settings) -> Self {
        Self {
            list,
            kavuahs,
            settings,
        }
    }

    /// Every flagged half-day, chronologically, merged by onah.
    ///
    /// An empty log yields an empty list. Kavuah projections run from
    /// each kavuah's anchor through the warning horizon (the last entry
    /// plus `number_months_ahead_to_warn` months); non-positive pattern
    /// steps end their projection rather than looping.
    pub fn problem_onahs(&self) -> Vec<ProblemOnah> {
        let effective = self.list.effective();
        let Some(last) = effective.last() else {
            return Vec::new();
        };
        // A century of warnings is plenty; the cap keeps the walk bounded.
        let months = i32::try_from(self.settings.number_months_ahead_to_warn.min(1200)).unwrap_or(1200);
        let horizon = last.date().add_months(months);

        let mut flags = Vec::new();
        self.onah_beinonis_flags(last, &effective, &mut flags);
        self.kavuah_flags(last, &effective, horizon, &mut flags);

        if self.settings.show_ohr_zeruah {
            let preceding: Vec<ProblemFlag> = flags
                .iter()
                .map(|f| {
                    ProblemFlag::new(
                        f.onah.previous(),
                        format!("Ohr Zeruah of: {}", f.description),
                    )
                })
                .collect();
            flags.extend(preceding);
        }

        if self.settings.no_probs_after_entry {
            flags.retain(|f| {
                let gap = f.onah.date.abs() - last.abs();
                !(1..=7).contains(&gap)
            });
        }

        debug!(count = flags.len(), "flagged dates projected");
        merge_flags(flags)
    }

    /// The baseline flags off the last entry: the 30th day (and 31st when
    /// configured), the yom haflaga, and retained longer haflagas. All of
    /// it is cancelled by an active cancelling kavuah.
    fn onah_beinonis_flags(
        &self,
        last: &EffectiveEntry,
        effective: &[EffectiveEntry],
        out: &mut Vec<ProblemFlag>,
    ) {
        let cancelled = self
            .kavuahs
            .iter()
            .any(|k| k.active && !k.ignored && k.cancels_onah_beinonis);
        if cancelled {
            return;
        }

        let night_day = last.night_day();
        let thirtieth = Onah::new(last.date().add_days(29), night_day);
        self.push_beinonis(thirtieth, "Thirtieth Day (Onah Beinonis)", out);

        if self.settings.keep_thirty_one {
            let thirty_first = Onah::new(last.date().add_days(30), night_day);
            self.push_beinonis(thirty_first, "Thirty-First Day (Onah Beinonis)", out);
        }

        if last.haflaga > 1 {
            out.push(ProblemFlag::new(
                Onah::new(last.date().add_days(last.haflaga - 1), night_day),
                format!("Yom Haflaga ({} days)", last.haflaga),
            ));
        }

        if self.settings.keep_longer_haflagah {
            let mut longer: Vec<i64> = effective
                .iter()
                .map(|e| e.haflaga)
                .filter(|&h| h > last.haflaga.max(1))
                .collect();
            longer.sort_unstable();
            longer.dedup();
            for h in longer {
                out.push(ProblemFlag::new(
                    Onah::new(last.date().add_days(h - 1), night_day),
                    format!("Yom Haflaga of a previous longer interval ({h} days)"),
                ));
            }
        }
    }

    /// An onah-beinonis flag; both halves of the day when the 24-hour
    /// stringency is set.
    fn push_beinonis(&self, onah: Onah, description: &str, out: &mut Vec<ProblemFlag>) {
        out.push(ProblemFlag::new(onah, description.to_owned()));
        if self.settings.onah_beinonis_24_hours {
            out.push(ProblemFlag::new(
                Onah::new(onah.date, onah.night_day.invert()),
                description.to_owned(),
            ));
        }
    }

    /// Theoretical occurrences of every active kavuah through the horizon.
    fn kavuah_flags(
        &self,
        last: &EffectiveEntry,
        effective: &[EffectiveEntry],
        horizon: HebrewDate,
        out: &mut Vec<ProblemFlag>,
    ) {
        for kavuah in self.kavuahs.iter().filter(|k| k.active && !k.ignored) {
            let description = format!("Kavuah of {kavuah}");
            let night_day = kavuah.setting_onah.night_day;
            match kavuah.kind {
                KavuahKind::Haflagah { interval }
                | KavuahKind::HaflagaMaayanPasuach { interval } => {
                    if interval <= 1 {
                        continue;
                    }
                    let mut date = last.date();
                    loop {
                        date = date.add_days(interval - 1);
                        if date.abs() > horizon.abs() {
                            break;
                        }
                        out.push(ProblemFlag::new(
                            Onah::new(date, night_day),
                            description.clone(),
                        ));
                    }
                }
                KavuahKind::DilugHaflaga { step } => {
                    let anchor = effective
                        .iter()
                        .find(|e| e.onah().is_same_onah(&kavuah.setting_onah));
                    let Some(anchor) = anchor else { continue };
                    let mut haflaga = anchor.haflaga;
                    let mut date = last.date();
                    loop {
                        haflaga += step;
                        if haflaga <= 1 {
                            break;
                        }
                        date = date.add_days(haflaga - 1);
                        if date.abs() > horizon.abs() {
                            break;
                        }
                        out.push(ProblemFlag::new(
                            Onah::new(date, night_day),
                            description.clone(),
                        ));
                    }
                }
                KavuahKind::HaflagaOnahs { onah_interval } => {
                    if onah_interval <= 0 {
                        continue;
                    }
                    let mut onah = last.onah();
                    loop {
                        onah = onah.add_onahs(onah_interval);
                        if onah.date.abs() > horizon.abs() {
                            break;
                        }
                        out.push(ProblemFlag::new(onah, description.clone()));
                    }
                }
                KavuahKind::DayOfMonth { .. }
                | KavuahKind::DayOfMonthMaayanPasuach { .. }
                | KavuahKind::DayOfWeek { .. }
                | KavuahKind::Sirug { .. }
                | KavuahKind::DilugDayOfMonth { .. } => {
                    for onah in kavuah
                        .independent_iterations(horizon, self.settings)
                        .into_iter()
                        .filter(|o| o.date.abs() <= horizon.abs())
                    {
                        out.push(ProblemFlag::new(onah, description.clone()));
                    }
                }
            }
        }
    }
}

/// Merge individual flags into per-onah problems, chronologically.
fn merge_flags(flags: Vec<ProblemFlag>) -> Vec<ProblemOnah> {
    let mut by_onah: BTreeMap<Onah, Vec<String>> = BTreeMap::new();
    for flag in flags {
        let reasons = by_onah.entry(flag.onah).or_default();
        if !reasons.contains(&flag.description) {
            reasons.push(flag.description);
        }
    }
    by_onah
        .into_iter()
        .map(|(onah, flags)| ProblemOnah::new(onah, flags))
        .collect()
}
