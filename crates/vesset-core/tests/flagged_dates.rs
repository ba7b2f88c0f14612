//! End-to-end flagged-date projection scenarios, including the stringency
//! toggles and the projector's totality over degenerate inputs.

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use vesset_calendar::{HebrewDate, IYAR, NISSAN, SIVAN, TAMUZ};
use vesset_core::{
    Entry, EntryList, Kavuah, KavuahKind, NightDay, Onah, ProblemOnah, Settings,
};

fn day_entry(year: i32, month: u8, day: u8) -> Entry {
    Entry::new(Onah::new(
        HebrewDate::new(year, month, day).unwrap(),
        NightDay::Day,
    ))
}

#[test]
fn an_empty_log_projects_nothing() {
    let list = EntryList::new();
    assert!(list.problem_onahs(&[], &Settings::default()).is_empty());

    let kavuah = Kavuah::new(
        KavuahKind::Haflagah { interval: 30 },
        Onah::new(HebrewDate::new(5785, NISSAN, 1).unwrap(), NightDay::Day),
    );
    assert!(list.problem_onahs(&[kavuah], &Settings::default()).is_empty());
}

#[test]
fn the_baseline_flags_the_thirtieth_day_and_the_yom_haflaga() {
    let start = HebrewDate::new(5785, NISSAN, 1).unwrap();
    let list = EntryList::from_entries([
        Entry::new(Onah::new(start, NightDay::Day)),
        Entry::new(Onah::new(start.add_days(24), NightDay::Day)),
    ]);
    let probs = list.problem_onahs(&[], &Settings::default());
    let last = start.add_days(24);

    // 30th and 31st days plus the 25-day yom haflaga.
    assert_eq!(probs.len(), 3);
    assert!(probs
        .iter()
        .any(|p| p.onah.date.abs() == last.add_days(24).abs()
            && p.flags.iter().any(|f| f.contains("Yom Haflaga"))));
    assert!(probs
        .iter()
        .any(|p| p.onah.date.abs() == last.add_days(29).abs()
            && p.flags.iter().any(|f| f.contains("Thirtieth"))));
    assert!(probs
        .iter()
        .any(|p| p.onah.date.abs() == last.add_days(30).abs()
            && p.flags.iter().any(|f| f.contains("Thirty-First"))));
}

#[test]
fn day_31_can_be_waived() {
    let list = EntryList::from_entries([day_entry(5785, NISSAN, 1)]);
    let settings = Settings {
        keep_thirty_one: false,
        ..Settings::default()
    };
    let probs = list.problem_onahs(&[], &settings);
    assert_eq!(probs.len(), 1);
    assert!(probs[0].flags[0].contains("Thirtieth"));
}

#[test]
fn a_persisted_day_of_month_kavuah_flags_the_next_month() {
    let list = EntryList::from_entries([
        day_entry(5785, NISSAN, 15),
        day_entry(5785, IYAR, 15),
        day_entry(5785, SIVAN, 15),
    ]);
    let kavuah = Kavuah::new(
        KavuahKind::DayOfMonth { day: 15 },
        Onah::new(HebrewDate::new(5785, SIVAN, 15).unwrap(), NightDay::Day),
    );
    let probs = list.problem_onahs(std::slice::from_ref(&kavuah), &Settings::default());

    let next = HebrewDate::new(5785, TAMUZ, 15).unwrap();
    let on_next = ProblemOnah::probs_for_date(next, &probs);
    assert_eq!(on_next.len(), 1);
    assert_eq!(on_next[0].onah.night_day, NightDay::Day);
    assert!(on_next[0]
        .flags
        .iter()
        .any(|f| f.contains("day of the Jewish Month")));
}

#[test]
fn an_ignored_kavuah_projects_nothing() {
    let list = EntryList::from_entries([day_entry(5785, SIVAN, 15)]);
    let mut kavuah = Kavuah::new(
        KavuahKind::DayOfMonth { day: 15 },
        Onah::new(HebrewDate::new(5785, SIVAN, 15).unwrap(), NightDay::Day),
    );
    kavuah.ignored = true;
    kavuah.cancels_onah_beinonis = true;

    let probs = list.problem_onahs(std::slice::from_ref(&kavuah), &Settings::default());
    // The ignored kavuah neither projects nor cancels the baseline.
    assert!(!probs.iter().any(|p| p.flags.iter().any(|f| f.contains("Kavuah"))));
    assert!(probs
        .iter()
        .any(|p| p.flags.iter().any(|f| f.contains("Onah Beinonis"))));
}

#[test]
fn the_warning_window_bounds_kavuah_projections() {
    let list = EntryList::from_entries([day_entry(5785, NISSAN, 15)]);
    let kavuah = Kavuah::new(
        KavuahKind::DayOfMonth { day: 15 },
        Onah::new(HebrewDate::new(5785, NISSAN, 15).unwrap(), NightDay::Day),
    );
    let narrow = Settings {
        number_months_ahead_to_warn: 2,
        ..Settings::default()
    };
    let wide = Settings {
        number_months_ahead_to_warn: 6,
        ..Settings::default()
    };

    let narrow_kavuah_flags = list
        .problem_onahs(std::slice::from_ref(&kavuah), &narrow)
        .iter()
        .filter(|p| p.flags.iter().any(|f| f.contains("Kavuah")))
        .count();
    let wide_kavuah_flags = list
        .problem_onahs(std::slice::from_ref(&kavuah), &wide)
        .iter()
        .filter(|p| p.flags.iter().any(|f| f.contains("Kavuah")))
        .count();

    assert_eq!(narrow_kavuah_flags, 2);
    assert_eq!(wide_kavuah_flags, 6);
}

#[test]
fn ohr_zeruah_precedes_every_flag() {
    let list = EntryList::from_entries([day_entry(5785, NISSAN, 1)]);
    let settings = Settings {
        show_ohr_zeruah: true,
        ..Settings::default()
    };
    let probs = list.problem_onahs(&[], &settings);

    // Each of the two baseline day-time flags gains its preceding
    // night-time onah.
    assert_eq!(probs.len(), 4);
    for pair in probs.chunks(2) {
        assert_eq!(pair[0].onah.night_day, NightDay::Night);
        assert_eq!(pair[1].onah.night_day, NightDay::Day);
        assert_eq!(pair[0].onah.date.abs(), pair[1].onah.date.abs());
    }
}

#[test]
fn problem_equality_ignores_reason_order() {
    let onah = Onah::new(HebrewDate::new(5785, NISSAN, 15).unwrap(), NightDay::Day);
    let a = ProblemOnah::new(onah, vec!["first".into(), "second".into()]);
    let b = ProblemOnah::new(onah, vec!["second".into(), "first".into()]);
    let c = ProblemOnah::new(onah, vec!["first".into()]);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn degenerate_patterns_terminate() {
    let anchor = Onah::new(HebrewDate::new(5785, NISSAN, 1).unwrap(), NightDay::Day);
    let list = EntryList::from_entries([day_entry(5785, NISSAN, 1)]);
    let kavuahs = vec![
        Kavuah::new(KavuahKind::Haflagah { interval: 0 }, anchor),
        Kavuah::new(KavuahKind::Haflagah { interval: 1 }, anchor),
        Kavuah::new(KavuahKind::DilugHaflaga { step: -40 }, anchor),
        Kavuah::new(KavuahKind::HaflagaOnahs { onah_interval: -3 }, anchor),
        Kavuah::new(KavuahKind::Sirug { month_interval: -1 }, anchor),
        Kavuah::new(KavuahKind::DayOfWeek { interval_days: 0 }, anchor),
    ];
    // Must return, not loop: only the baseline flags come back.
    let probs = list.problem_onahs(&kavuahs, &Settings::default());
    assert_eq!(probs.len(), 2);
}
