//! End-to-end kavuah detection scenarios over realistic entry logs.

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use vesset_calendar::{HebrewDate, IYAR, NISSAN, SIVAN, TAMUZ};
use vesset_core::{
    kavuah_suggestions, possible_new_kavuahs, Entry, EntryList, Kavuah, KavuahKind, NightDay,
    Onah, Settings,
};

fn day_entry(year: i32, month: u8, day: u8) -> Entry {
    Entry::new(Onah::new(
        HebrewDate::new(year, month, day).unwrap(),
        NightDay::Day,
    ))
}

#[test]
fn three_observations_on_the_fifteenth_set_a_day_of_month_kavuah() {
    let list = EntryList::from_entries([
        day_entry(5785, NISSAN, 15),
        day_entry(5785, IYAR, 15),
        day_entry(5785, SIVAN, 15),
    ]);
    let effective = list.effective();
    let suggestions = kavuah_suggestions(&effective, &[], &Settings::default());

    assert_eq!(suggestions.len(), 1);
    let suggestion = &suggestions[0];
    assert_eq!(suggestion.kavuah.kind, KavuahKind::DayOfMonth { day: 15 });
    assert!(suggestion
        .kavuah
        .setting_onah
        .is_same_onah(&Onah::new(
            HebrewDate::new(5785, SIVAN, 15).unwrap(),
            NightDay::Day
        )));
    assert_eq!(suggestion.entries.len(), 3);
    assert!(suggestion.kavuah.active);
}

#[test]
fn four_observations_thirty_days_apart_set_a_haflagah_kavuah() {
    // 1 Nissan + 29-day steps lands on 30 Nissan, 29 Iyar and 29 Sivan.
    // Stepping 30 Nissan one month clamps to 29 Iyar, so the same log also
    // carries a day-of-month pattern on the 29th alongside the haflagah.
    let start = HebrewDate::new(5785, NISSAN, 1).unwrap();
    let list = EntryList::from_entries(
        (0..4).map(|i| Entry::new(Onah::new(start.add_days(29 * i), NightDay::Day))),
    );
    let effective = list.effective();
    let suggestions = kavuah_suggestions(&effective, &[], &Settings::default());

    assert_eq!(suggestions.len(), 2);

    let haflagah = suggestions
        .iter()
        .find(|s| matches!(s.kavuah.kind, KavuahKind::Haflagah { .. }))
        .unwrap();
    assert_eq!(haflagah.kavuah.kind, KavuahKind::Haflagah { interval: 30 });
    assert_eq!(haflagah.entries.len(), 4);

    let clamped = suggestions
        .iter()
        .find(|s| matches!(s.kavuah.kind, KavuahKind::DayOfMonth { .. }))
        .unwrap();
    assert_eq!(clamped.kavuah.kind, KavuahKind::DayOfMonth { day: 29 });
    assert!(clamped.kavuah.setting_onah.is_same_onah(&Onah::new(
        HebrewDate::new(5785, SIVAN, 29).unwrap(),
        NightDay::Day
    )));
}

#[test]
fn three_equal_intervals_are_not_enough_for_haflagah() {
    // The interval families need four entries: three intervals.
    let start = HebrewDate::new(5785, NISSAN, 1).unwrap();
    let list = EntryList::from_entries(
        (0..3).map(|i| Entry::new(Onah::new(start.add_days(29 * i), NightDay::Day))),
    );
    let effective = list.effective();
    let suggestions = kavuah_suggestions(&effective, &[], &Settings::default());
    assert!(suggestions.is_empty());
}

#[test]
fn an_already_set_kavuah_is_not_suggested_again() {
    let list = EntryList::from_entries([
        day_entry(5785, NISSAN, 15),
        day_entry(5785, IYAR, 15),
        day_entry(5785, SIVAN, 15),
    ]);
    let effective = list.effective();
    let set = Kavuah::new(
        KavuahKind::DayOfMonth { day: 15 },
        Onah::new(HebrewDate::new(5785, SIVAN, 15).unwrap(), NightDay::Day),
    );

    let fresh = possible_new_kavuahs(&effective, std::slice::from_ref(&set), &Settings::default());
    assert!(fresh.is_empty());

    // An inactive copy no longer suppresses the suggestion.
    let mut dormant = set;
    dormant.active = false;
    let fresh = possible_new_kavuahs(&effective, &[dormant], &Settings::default());
    assert_eq!(fresh.len(), 1);
}

#[test]
fn a_mixed_portion_log_needs_the_leniency_toggle() {
    let night = Entry::new(Onah::new(
        HebrewDate::new(5785, IYAR, 15).unwrap(),
        NightDay::Night,
    ));
    let list = EntryList::from_entries([
        day_entry(5785, NISSAN, 15),
        night,
        day_entry(5785, SIVAN, 15),
    ]);
    let effective = list.effective();

    assert!(kavuah_suggestions(&effective, &[], &Settings::default()).is_empty());

    let lenient = Settings {
        kavuah_diff_onahs: true,
        ..Settings::default()
    };
    let suggestions = kavuah_suggestions(&effective, &[], &lenient);
    assert!(suggestions
        .iter()
        .any(|s| s.kavuah.kind == KavuahKind::DayOfMonth { day: 15 }));
}

#[test]
fn an_interloping_entry_does_not_break_a_day_of_month_pattern() {
    // Independent patterns survive unrelated entries in between.
    let list = EntryList::from_entries([
        day_entry(5785, NISSAN, 15),
        day_entry(5785, IYAR, 3),
        day_entry(5785, IYAR, 15),
        day_entry(5785, SIVAN, 15),
    ]);
    let effective = list.effective();
    let suggestions = kavuah_suggestions(&effective, &[], &Settings::default());
    assert!(suggestions
        .iter()
        .any(|s| s.kavuah.kind == KavuahKind::DayOfMonth { day: 15 }));
}

#[test]
fn entries_marked_ignore_for_kavuah_seed_no_patterns() {
    let mut first = day_entry(5785, NISSAN, 15);
    first.ignore_for_kavuah = true;
    let list = EntryList::from_entries([
        first,
        day_entry(5785, IYAR, 15),
        day_entry(5785, SIVAN, 15),
    ]);
    let effective = list.effective();
    let suggestions = kavuah_suggestions(&effective, &[], &Settings::default());
    assert!(!suggestions
        .iter()
        .any(|s| s.kavuah.kind == KavuahKind::DayOfMonth { day: 15 }));
}

#[test]
fn a_sirug_pattern_needs_a_gap_of_more_than_one_month() {
    // Nissan, Sivan, Av of the same year on the same day: a two-month gap.
    let list = EntryList::from_entries([
        day_entry(5785, NISSAN, 10),
        day_entry(5785, SIVAN, 10),
        day_entry(5785, vesset_calendar::AV, 10),
    ]);
    let effective = list.effective();
    let suggestions = kavuah_suggestions(&effective, &[], &Settings::default());
    assert!(suggestions
        .iter()
        .any(|s| s.kavuah.kind == KavuahKind::Sirug { month_interval: 2 }));
}

#[test]
fn detection_and_projection_agree_on_the_next_occurrence() {
    let list = EntryList::from_entries([
        day_entry(5785, NISSAN, 15),
        day_entry(5785, IYAR, 15),
        day_entry(5785, SIVAN, 15),
    ]);
    let effective = list.effective();
    let suggestions = kavuah_suggestions(&effective, &[], &Settings::default());
    let kavuah = suggestions[0].kavuah.clone();

    let probs = list.problem_onahs(std::slice::from_ref(&kavuah), &Settings::default());
    let next = Onah::new(HebrewDate::new(5785, TAMUZ, 15).unwrap(), NightDay::Day);
    assert!(probs.iter().any(|p| {
        p.onah.is_same_onah(&next) && p.flags.iter().any(|f| f.contains("Jewish Month"))
    }));
}
