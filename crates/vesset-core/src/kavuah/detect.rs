//! Kavuah pattern detection over the effective entry list.
//!
//! A single forward scan with a trailing window of up to four entries. The
//! independent families that anchor to the calendar (day-of-month,
//! day-of-week, dilug day-of-month) are probed per entry against the whole
//! list; the interval families (Haflagah, Dilug Haflaga, Haflaga of Onahs)
//! and Sirug fire off the trailing window once it is deep enough.
//!
//! Unless `kavuah_diff_onahs` is set, a pattern only counts when its
//! entries share a night/day portion.

use tracing::debug;

use crate::entry::EffectiveEntry;
use crate::entry_list::EntryList;
use crate::kavuah::{Kavuah, KavuahKind};
use crate::settings::Settings;

/// A detected pattern together with the entries that establish it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KavuahSuggestion {
    /// The kavuah the entries support, anchored at the last of them.
    pub kavuah: Kavuah,
    /// The establishing entries, chronological.
    pub entries: Vec<EffectiveEntry>,
}

/// All patterns the effective list supports, including ones already set.
///
/// `existing` is consulted only to suppress dilug day-of-month suggestions
/// on days already covered by an active plain day-of-month kavuah; it does
/// not filter the output (see [`possible_new_kavuahs`] for that).
pub fn kavuah_suggestions(
    effective: &[EffectiveEntry],
    existing: &[Kavuah],
    settings: &Settings,
) -> Vec<KavuahSuggestion> {
    let mut suggestions = Vec::new();
    let mut window: Vec<&EffectiveEntry> = Vec::new();

    for entry in effective.iter().filter(|e| !e.entry.ignore_for_kavuah) {
        day_of_month_suggestion(entry, effective, settings, &mut suggestions);
        day_of_week_suggestions(entry, effective, settings, &mut suggestions);

        let covered = existing.iter().any(|k| {
            k.active && matches!(k.kind, KavuahKind::DayOfMonth { day } if day == entry.day())
        });
        if !covered {
            dilug_day_of_month_suggestion(entry, effective, settings, &mut suggestions);
        }

        window.push(entry);
        if window.len() > 4 {
            window.remove(0);
        }

        if window.len() >= 3
            && (settings.kavuah_diff_onahs
                || (window[0].night_day() == window[1].night_day()
                    && window[1].night_day() == window[2].night_day()))
        {
            sirug_suggestion(&window[window.len() - 3..], &mut suggestions);
        }

        if window.len() == 4 {
            if settings.kavuah_diff_onahs
                || (window[1].night_day() == window[2].night_day()
                    && window[2].night_day() == window[3].night_day())
            {
                haflagah_suggestion(&window, &mut suggestions);
                dilug_haflagah_suggestion(&window, &mut suggestions);
            }
            if settings.haflaga_of_onahs && window[1].night_day() != window[2].night_day() {
                haflaga_onahs_suggestion(&window, &mut suggestions);
            }
        }
    }

    for suggestion in &suggestions {
        debug!(kavuah = %suggestion.kavuah, "pattern detected");
    }
    suggestions
}

/// Detected patterns not already present as an active kavuah.
pub fn possible_new_kavuahs(
    effective: &[EffectiveEntry],
    existing: &[Kavuah],
    settings: &Settings,
) -> Vec<KavuahSuggestion> {
    let active: Vec<&Kavuah> = existing.iter().filter(|k| k.active).collect();
    kavuah_suggestions(effective, existing, settings)
        .into_iter()
        .filter(|s| !active.iter().any(|k| k.matches_kavuah(&s.kavuah)))
        .collect()
}

/// Night/day portions agree, or the settings allow mixed-portion patterns.
fn portion_agrees(a: &EffectiveEntry, b: &EffectiveEntry, settings: &Settings) -> bool {
    settings.kavuah_diff_onahs || a.night_day() == b.night_day()
}

/// Entries on the same day of the month in each of the next two months.
fn day_of_month_suggestion(
    entry: &EffectiveEntry,
    effective: &[EffectiveEntry],
    settings: &Settings,
    out: &mut Vec<KavuahSuggestion>,
) {
    let next_month = entry.date().add_months(1);
    let third_month = next_month.add_months(1);

    let second = effective
        .iter()
        .find(|en| portion_agrees(en, entry, settings) && en.abs() == next_month.abs());
    let Some(second) = second else { return };

    let third = effective
        .iter()
        .find(|en| portion_agrees(en, entry, settings) && en.abs() == third_month.abs());
    if let Some(third) = third {
        out.push(KavuahSuggestion {
            kavuah: Kavuah::new(
                KavuahKind::DayOfMonth {
                    day: third_month.day(),
                },
                third.onah(),
            ),
            entries: vec![entry.clone(), second.clone(), third.clone()],
        });
    }
}

/// Entries whose day of the month steps by a constant in each of the next
/// two months.
fn dilug_day_of_month_suggestion(
    entry: &EffectiveEntry,
    effective: &[EffectiveEntry],
    settings: &Settings,
    out: &mut Vec<KavuahSuggestion>,
) {
    let next_month = entry.date().add_months(1);
    let second = effective.iter().find(|en| {
        portion_agrees(en, entry, settings)
            && en.day() != next_month.day()
            && en.date().month() == next_month.month()
            && en.date().year() == next_month.year()
    });
    let Some(second) = second else { return };

    let third_month = entry.date().add_months(2);
    let step = i64::from(second.day()) - i64::from(entry.day());
    let third = effective.iter().find(|en| {
        portion_agrees(en, entry, settings)
            && i64::from(en.day()) - i64::from(second.day()) == step
            && en.date().month() == third_month.month()
            && en.date().year() == third_month.year()
    });
    if let Some(third) = third {
        out.push(KavuahSuggestion {
            kavuah: Kavuah::new(KavuahKind::DilugDayOfMonth { step }, third.onah()),
            entries: vec![entry.clone(), second.clone(), third.clone()],
        });
    }
}

/// Three entries on the same weekday at an even day gap. Each later
/// same-weekday entry opens a candidate interval, so one entry can seed
/// several suggestions.
fn day_of_week_suggestions(
    entry: &EffectiveEntry,
    effective: &[EffectiveEntry],
    settings: &Settings,
    out: &mut Vec<KavuahSuggestion>,
) {
    for first in effective.iter().filter(|e| {
        portion_agrees(e, entry, settings)
            && e.abs() > entry.abs()
            && e.day_of_week() == entry.day_of_week()
    }) {
        let interval = entry.date().diff_days(&first.date());
        let next_date = first.date().add_days(interval);
        if entry.day_of_week() != next_date.day_of_week() {
            continue;
        }
        let second = effective
            .iter()
            .find(|en| portion_agrees(en, entry, settings) && en.abs() == next_date.abs());
        if let Some(second) = second {
            out.push(KavuahSuggestion {
                kavuah: Kavuah::new(
                    KavuahKind::DayOfWeek {
                        interval_days: interval,
                    },
                    second.onah(),
                ),
                entries: vec![entry.clone(), first.clone(), second.clone()],
            });
        }
    }
}

/// Three entries on the same day of the month, more than one month apart at
/// an even month gap.
fn sirug_suggestion(three: &[&EffectiveEntry], out: &mut Vec<KavuahSuggestion>) {
    let month_diff = three[0].date().diff_months(&three[1].date());
    if month_diff > 1
        && three[0].day() == three[1].day()
        && three[1].day() == three[2].day()
        && three[1].date().diff_months(&three[2].date()) == month_diff
    {
        out.push(KavuahSuggestion {
            kavuah: Kavuah::new(
                KavuahKind::Sirug {
                    month_interval: month_diff,
                },
                three[2].onah(),
            ),
            entries: three.iter().map(|e| (*e).clone()).collect(),
        });
    }
}

/// Four entries whose last three haflagas are equal.
fn haflagah_suggestion(four: &[&EffectiveEntry], out: &mut Vec<KavuahSuggestion>) {
    if four[1].haflaga == four[2].haflaga && four[2].haflaga == four[3].haflaga {
        out.push(KavuahSuggestion {
            kavuah: Kavuah::new(
                KavuahKind::Haflagah {
                    interval: four[3].haflaga,
                },
                four[3].onah(),
            ),
            entries: four.iter().map(|e| (*e).clone()).collect(),
        });
    }
}

/// Four entries whose haflaga changes by the same nonzero step twice.
fn dilug_haflagah_suggestion(four: &[&EffectiveEntry], out: &mut Vec<KavuahSuggestion>) {
    let step = four[3].haflaga - four[2].haflaga;
    if step != 0 && step == four[2].haflaga - four[1].haflaga {
        out.push(KavuahSuggestion {
            kavuah: Kavuah::new(KavuahKind::DilugHaflaga { step }, four[3].onah()),
            entries: four.iter().map(|e| (*e).clone()).collect(),
        });
    }
}

/// Four entries at an equal half-day interval.
fn haflaga_onahs_suggestion(four: &[&EffectiveEntry], out: &mut Vec<KavuahSuggestion>) {
    let onahs = four[0].onah_differential(four[1]);
    if four[1].onah_differential(four[2]) == onahs && four[2].onah_differential(four[3]) == onahs {
        out.push(KavuahSuggestion {
            kavuah: Kavuah::new(
                KavuahKind::HaflagaOnahs {
                    onah_interval: onahs,
                },
                four[3].onah(),
            ),
            entries: four.iter().map(|e| (*e).clone()).collect(),
        });
    }
}

/// Kavuahs the given new entry shows to be broken.
///
/// An independent kavuah is broken when none of its last three theoretical
/// occurrences up to the entry's date carries an entry. A dependent kavuah
/// is broken when none of the three entries surrounding the new one fits
/// its pattern.
pub fn find_broken_kavuahs<'a>(
    entry: &EffectiveEntry,
    kavuahs: &'a [Kavuah],
    list: &EntryList,
    settings: &Settings,
) -> Vec<&'a Kavuah> {
    let effective = list.effective();
    let mut broken = independent_brokens(entry, kavuahs, &effective, settings);
    broken.extend(dependent_brokens(entry, kavuahs, &effective, settings));
    for kavuah in &broken {
        debug!(kavuah = %kavuah, "kavuah broken");
    }
    broken
}

fn independent_brokens<'a>(
    entry: &EffectiveEntry,
    kavuahs: &'a [Kavuah],
    effective: &[EffectiveEntry],
    settings: &Settings,
) -> Vec<&'a Kavuah> {
    kavuahs
        .iter()
        .filter(|k| {
            k.active
                && !k.ignored
                && k.kind.is_independent()
                && k.setting_onah.date.abs() < entry.abs()
        })
        .filter(|k| {
            let iterations = k.independent_iterations(entry.date(), settings);
            let last3 = &iterations[iterations.len().saturating_sub(3)..];
            last3.len() == 3
                && !last3
                    .iter()
                    .any(|onah| effective.iter().any(|e| e.onah().is_same_onah(onah)))
        })
        .collect()
}

fn dependent_brokens<'a>(
    entry: &EffectiveEntry,
    kavuahs: &'a [Kavuah],
    effective: &[EffectiveEntry],
    settings: &Settings,
) -> Vec<&'a Kavuah> {
    let Some(index) = effective
        .iter()
        .position(|e| e.onah().is_same_onah(&entry.onah()))
    else {
        return Vec::new();
    };
    if index < 2 {
        return Vec::new();
    }
    let surrounding = &effective[index - 2..=index];
    kavuahs
        .iter()
        .filter(|k| {
            k.active
                && !k.ignored
                && !k.kind.is_independent()
                && surrounding
                    .iter()
                    .all(|e| e.abs() > k.setting_onah.date.abs())
        })
        .filter(|k| {
            !surrounding
                .iter()
                .any(|e| k.is_entry_in_pattern(e, effective, settings))
        })
        .collect()
}

/// Inactive kavuahs whose pattern the given new entry falls back onto.
pub fn find_reawakened_kavuahs<'a>(
    entry: &EffectiveEntry,
    kavuahs: &'a [Kavuah],
    list: &EntryList,
    settings: &Settings,
) -> Vec<&'a Kavuah> {
    let effective = list.effective();
    kavuahs
        .iter()
        .filter(|k| !k.active && !k.ignored && k.setting_onah.date.abs() < entry.abs())
        .filter(|k| k.is_entry_in_pattern(entry, &effective, settings))
        .collect()
}

/// Cancelling dependent kavuahs the given new entry does not fit; the
/// caller should warn before restoring the Onah Beinonis baseline.
pub fn find_out_of_pattern<'a>(
    entry: &EffectiveEntry,
    kavuahs: &'a [Kavuah],
    list: &EntryList,
    settings: &Settings,
) -> Vec<&'a Kavuah> {
    let effective = list.effective();
    kavuahs
        .iter()
        .filter(|k| {
            k.cancels_onah_beinonis
                && k.active
                && !k.ignored
                && !k.kind.is_independent()
                && k.setting_onah.date.abs() < entry.abs()
        })
        .filter(|k| !k.is_entry_in_pattern(entry, &effective, settings))
        .collect()
}
