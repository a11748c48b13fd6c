use hsync_calendar::NationalCalendar;
use hsync_reconcile::{ReconcileSettings, Reconciler};
use hsync_store::InMemoryHolidayStore;

#[test]
fn scenario_second_run_adds_nothing() {
    let store = InMemoryHolidayStore::new();
    let rec = Reconciler::new(&store, NationalCalendar::new(), ReconcileSettings::default());

    let first = rec.run("dk", 2025, 3).unwrap();
    assert!(!first.added.is_empty());
    assert!(first.existing.is_empty());
    let writes_after_first = store.writes().len();
    assert_eq!(writes_after_first, first.added.len());

    let second = rec.run("dk", 2025, 3).unwrap();
    assert!(second.added.is_empty(), "second run added {:?}", second.added);
    assert_eq!(second.existing, first.added);
    assert_eq!(store.writes().len(), writes_after_first, "no new create calls");
}
