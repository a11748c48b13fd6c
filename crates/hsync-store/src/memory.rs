//! Deterministic in-memory holiday store.
//!
//! - Reads return the records of the requested year in insertion order.
//! - Creates persist immediately, so a second reconcile sees them.
//! - Rejections and read failures are scripted explicitly; no randomness.
//! - Every call is recorded for assertions.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{Datelike, NaiveDate};

use crate::{HolidayStore, NewHoliday, RemoteHoliday, StoreError, WriteOutcome};

#[derive(Debug, Default)]
struct State {
    records: BTreeMap<i32, Vec<RemoteHoliday>>,
    reject: BTreeMap<NaiveDate, u16>,
    fail_reads_from: Option<i32>,
    reads: Vec<i32>,
    writes: Vec<NewHoliday>,
}

#[derive(Debug, Default)]
pub struct InMemoryHolidayStore {
    state: Mutex<State>,
}

impl InMemoryHolidayStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing remote record.
    pub fn with_record(self, date: NaiveDate, name: impl Into<String>) -> Self {
        self.lock()
            .records
            .entry(date.year())
            .or_default()
            .push(RemoteHoliday::new(date, name));
        self
    }

    /// Creates for `date` answer with `status` and are not persisted.
    pub fn reject_date(self, date: NaiveDate, status: u16) -> Self {
        self.lock().reject.insert(date, status);
        self
    }

    /// Reads of `year` and later fail with a transport error.
    pub fn fail_reads_from(self, year: i32) -> Self {
        self.lock().fail_reads_from = Some(year);
        self
    }

    /// Years read so far, in call order.
    pub fn reads(&self) -> Vec<i32> {
        self.lock().reads.clone()
    }

    /// Create payloads received so far, in call order (rejected ones included).
    pub fn writes(&self) -> Vec<NewHoliday> {
        self.lock().writes.clone()
    }

    /// Stored records of `year`.
    pub fn records(&self, year: i32) -> Vec<RemoteHoliday> {
        self.lock().records.get(&year).cloned().unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panicked test thread must not hide the recorded calls.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl HolidayStore for InMemoryHolidayStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn fetch_year(&self, year: i32) -> Result<Vec<RemoteHoliday>, StoreError> {
        let mut st = self.lock();
        st.reads.push(year);
        if st.fail_reads_from.is_some_and(|from| year >= from) {
            return Err(StoreError::Transport(format!(
                "scripted read failure for year {year}"
            )));
        }
        Ok(st.records.get(&year).cloned().unwrap_or_default())
    }

    fn create(&self, holiday: &NewHoliday) -> Result<WriteOutcome, StoreError> {
        let mut st = self.lock();
        st.writes.push(holiday.clone());

        if let Some(status) = st.reject.get(&holiday.date).copied() {
            return Ok(WriteOutcome::Rejected {
                status,
                message: format!("scripted rejection for {}", holiday.date),
            });
        }

        let mut record = RemoteHoliday::new(holiday.date, holiday.name.clone());
        record.extra.insert(
            "description".to_string(),
            serde_json::Value::String(holiday.description.clone()),
        );
        record.extra.insert(
            "durationSeconds".to_string(),
            serde_json::Value::from(holiday.duration_seconds),
        );
        st.records.entry(holiday.date.year()).or_default().push(record);
        Ok(WriteOutcome::Created)
    }
}
