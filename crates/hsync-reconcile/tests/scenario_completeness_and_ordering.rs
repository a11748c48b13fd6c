//! Every local holiday of the window is in exactly one list; each list is
//! year-block ascending and date ascending inside a block; remote dates are
//! never re-submitted.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use hsync_calendar::{Country, Holiday, HolidaySource, NationalCalendar};
use hsync_reconcile::{ReconcileSettings, Reconciler};
use hsync_store::InMemoryHolidayStore;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn assert_ascending(list: &[Holiday]) {
    for w in list.windows(2) {
        assert!(w[0].date < w[1].date, "{} !< {}", w[0], w[1]);
    }
}

#[test]
fn scenario_partition_is_complete_disjoint_and_ordered() {
    // Some holidays already present, plus a remote-only record that has no local twin.
    let store = InMemoryHolidayStore::new()
        .with_record(d(2024, 1, 1), "Nytårsdag")
        .with_record(d(2024, 12, 25), "Juledag")
        .with_record(d(2025, 4, 20), "Påskedag")
        .with_record(d(2026, 7, 1), "Company day");

    let r = Reconciler::new(&store, NationalCalendar::new(), ReconcileSettings::default())
        .run("dk", 2024, 3)
        .unwrap();

    let cal = NationalCalendar::new();
    let mut expected: Vec<Holiday> = Vec::new();
    for y in 2024..=2026 {
        expected.extend(cal.holidays(Country::parse("dk").unwrap(), y).unwrap());
    }

    let mut seen: Vec<Holiday> = r.added.iter().chain(r.existing.iter()).cloned().collect();
    seen.sort();
    assert_eq!(seen, expected, "every holiday exactly once");

    let added: BTreeSet<NaiveDate> = r.added.iter().map(|h| h.date).collect();
    let existing: BTreeSet<NaiveDate> = r.existing.iter().map(|h| h.date).collect();
    assert!(added.is_disjoint(&existing));

    assert_eq!(
        existing,
        [d(2024, 1, 1), d(2024, 12, 25), d(2025, 4, 20)].into_iter().collect()
    );

    // No create for a date that was already stored.
    for w in store.writes() {
        assert!(!existing.contains(&w.date), "re-submitted {}", w.date);
    }

    assert_ascending(&r.added);
    assert_ascending(&r.existing);
    assert!(r.added.iter().all(|h| (2024..=2026).contains(&h.date.year())));
}
