use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use chrono::NaiveDate;
use hsync_calendar::{merge_same_day, Country, Holiday, HolidaySource};
use hsync_store::{HolidayStore, NewHoliday, RemoteHoliday, WriteOutcome};
use tracing::{debug, info, warn};

use crate::{FailedHoliday, ReconcileError, ReconcileSettings, ReconciliationResult, YearPlan};

/// `start ..= start + count - 1`. Rejects an empty or overflowing window.
pub fn year_window(start_year: i32, year_count: u32) -> Result<RangeInclusive<i32>, ReconcileError> {
    let span = year_count
        .checked_sub(1)
        .and_then(|n| i32::try_from(n).ok())
        .ok_or(ReconcileError::InvalidYearCount(year_count))?;
    let end = start_year
        .checked_add(span)
        .ok_or(ReconcileError::InvalidYearCount(year_count))?;
    Ok(start_year..=end)
}

/// Deterministic classification of one year:
/// - only local holidays dated in `year` are considered
/// - a local holiday whose date equals any remote record's date => existing
/// - everything else => missing
///
/// Dates are compared as dates; names are not compared, so a remote record
/// with a different spelling still blocks a duplicate.
pub fn plan_year(year: i32, local: &[Holiday], remote: &[RemoteHoliday]) -> YearPlan {
    let remote_dates: BTreeSet<NaiveDate> = remote.iter().map(|r| r.date).collect();

    let mut in_year: Vec<Holiday> = local.iter().filter(|h| h.year() == year).cloned().collect();
    in_year.sort();

    let (existing, missing): (Vec<Holiday>, Vec<Holiday>) = merge_same_day(in_year)
        .into_iter()
        .partition(|h| remote_dates.contains(&h.date));

    YearPlan {
        year,
        existing,
        missing,
    }
}

/// Sequential, year-windowed reconciler.
///
/// One store read per year, one store create per missing holiday, in order.
/// No retries: the first transport failure aborts the run.
#[derive(Debug)]
pub struct Reconciler<S, L> {
    store: S,
    source: L,
    settings: ReconcileSettings,
}

impl<S: HolidayStore, L: HolidaySource> Reconciler<S, L> {
    pub fn new(store: S, source: L, settings: ReconcileSettings) -> Self {
        Self {
            store,
            source,
            settings,
        }
    }

    /// Reconcile `country_code` for `year_count` years starting at `start_year`.
    ///
    /// The local calendar for the whole window is resolved before the first
    /// network call, so an unsupported country never reaches the store.
    pub fn run(
        &self,
        country_code: &str,
        start_year: i32,
        year_count: u32,
    ) -> Result<ReconciliationResult, ReconcileError> {
        let years = year_window(start_year, year_count)?;
        let country = Country::parse(country_code)?;

        let local: Vec<(i32, Vec<Holiday>)> = years
            .map(|year| self.source.holidays(country, year).map(|hs| (year, hs)))
            .collect::<Result<_, _>>()?;

        info!(
            store = self.store.name(),
            %country,
            start_year,
            year_count,
            dry_run = self.settings.dry_run,
            "reconcile start"
        );

        let mut result = ReconciliationResult::new(self.settings.dry_run);
        for (year, holidays) in local {
            let remote = self
                .store
                .fetch_year(year)
                .map_err(|source| ReconcileError::Read { year, source })?;

            for r in &remote {
                debug!(year, date = %r.date, name = %r.name, "already in scheme");
            }

            let plan = plan_year(year, &holidays, &remote);
            info!(
                year,
                remote = remote.len(),
                existing = plan.existing.len(),
                missing = plan.missing.len(),
                "year planned"
            );
            self.apply(plan, &mut result)?;
        }

        info!(
            added = result.added.len(),
            existing = result.existing.len(),
            failed = result.failed.len(),
            "reconcile done"
        );
        Ok(result)
    }

    fn apply(&self, plan: YearPlan, result: &mut ReconciliationResult) -> Result<(), ReconcileError> {
        for h in &plan.existing {
            info!(date = %h.date, name = %h.name, "already there, not added");
        }
        result.existing.extend(plan.existing);

        for h in plan.missing {
            if self.settings.dry_run {
                info!(date = %h.date, name = %h.name, "would add (dry run)");
                result.added.push(h);
                continue;
            }

            let record = NewHoliday::floating(h.date, h.name.clone(), self.settings.description.clone());
            let outcome = self
                .store
                .create(&record)
                .map_err(|source| ReconcileError::Write {
                    date: h.date,
                    source,
                })?;

            match outcome {
                WriteOutcome::Created => {
                    info!(date = %h.date, name = %h.name, "added");
                    result.added.push(h);
                }
                WriteOutcome::Rejected { status, message } => {
                    warn!(date = %h.date, name = %h.name, status, %message, "create rejected");
                    result.failed.push(FailedHoliday {
                        date: h.date,
                        name: h.name,
                        status,
                        message,
                    });
                }
            }
        }
        Ok(())
    }
}
