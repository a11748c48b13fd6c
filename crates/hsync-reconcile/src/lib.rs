//! hsync-reconcile
//!
//! Holiday reconciliation: make a remote holiday scheme contain the national
//! holidays of a country for a window of years, without duplicates.
//!
//! - Remote is ground truth for "already there" (date equality only).
//! - Missing holidays are created one by one, full-day and FLOATING.
//! - Refused creates are reported in `failed`, never silently counted as added.
//! - Fully sequential; no retries; first transport failure aborts.
//!
//! [`plan_year`] is the pure core. [`Reconciler`] drives it over a year window
//! against any [`HolidayStore`] / [`HolidaySource`]. [`reconcile`] is the
//! one-call entry point against the live Tempo API; [`reconcile_at`] and
//! [`reconcile_with`] take the endpoint or the collaborators explicitly.

mod engine;
mod types;

pub use engine::{plan_year, year_window, Reconciler};
pub use types::*;

pub use hsync_calendar::{Country, Holiday, HolidaySource, NationalCalendar};
pub use hsync_store::{HolidayStore, TempoHolidayStore, DEFAULT_BASE_URL};

use chrono::{Datelike, Local};

/// Country synced when none is configured.
pub const DEFAULT_COUNTRY: &str = "dk";
/// Years synced when none are configured, the current one included.
pub const DEFAULT_YEAR_COUNT: u32 = 10;

/// Sync the national calendar of `country_code` into Tempo holiday scheme
/// `store_target_id`, from the current calendar year for `year_count` years.
///
/// `store_credentials` is the Tempo API bearer token.
pub fn reconcile(
    store_credentials: &str,
    store_target_id: &str,
    country_code: &str,
    year_count: u32,
) -> Result<ReconciliationResult, ReconcileError> {
    reconcile_at(
        DEFAULT_BASE_URL,
        store_credentials,
        store_target_id,
        country_code,
        year_count,
    )
}

/// [`reconcile`] against a Tempo API rooted at `base_url`.
pub fn reconcile_at(
    base_url: &str,
    store_credentials: &str,
    store_target_id: &str,
    country_code: &str,
    year_count: u32,
) -> Result<ReconciliationResult, ReconcileError> {
    let store = TempoHolidayStore::builder(store_credentials, store_target_id)
        .base_url(base_url)
        .build()
        .map_err(ReconcileError::Setup)?;
    reconcile_with(
        store,
        NationalCalendar::new(),
        ReconcileSettings::default(),
        country_code,
        year_count,
    )
}

/// Window starting at the current calendar year, any store and source.
pub fn reconcile_with<S: HolidayStore, L: HolidaySource>(
    store: S,
    source: L,
    settings: ReconcileSettings,
    country_code: &str,
    year_count: u32,
) -> Result<ReconciliationResult, ReconcileError> {
    Reconciler::new(store, source, settings).run(country_code, current_year(), year_count)
}

/// Local calendar year at call time.
pub fn current_year() -> i32 {
    Local::now().year()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_years_fails_before_any_request() {
        // Nothing listens on the default URL in tests; the window check comes first.
        assert_eq!(
            reconcile("tok", "7", DEFAULT_COUNTRY, 0),
            Err(ReconcileError::InvalidYearCount(0))
        );
    }

    #[test]
    fn empty_token_is_a_setup_error() {
        assert!(matches!(
            reconcile("", "7", DEFAULT_COUNTRY, DEFAULT_YEAR_COUNT),
            Err(ReconcileError::Setup(_))
        ));
    }

    #[test]
    fn unsupported_country_fails_before_any_request() {
        assert!(matches!(
            reconcile("tok", "7", "zz", 1),
            Err(ReconcileError::Calendar(_))
        ));
    }
}
