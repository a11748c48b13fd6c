//! hsync-store
//!
//! Remote holiday store boundary: wire types, the [`HolidayStore`] trait and its
//! two implementations.
//!
//! - [`TempoHolidayStore`]: blocking HTTP adapter for a Tempo holiday scheme.
//! - [`InMemoryHolidayStore`]: deterministic store for tests and dry runs.
//!
//! The store never decides what to write; callers (the reconciler) do.

mod memory;
mod tempo;

pub use memory::InMemoryHolidayStore;
pub use tempo::{TempoHolidayStore, TempoHolidayStoreBuilder, DEFAULT_BASE_URL};

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A full working day, the only duration this tool writes.
pub const FULL_DAY_SECONDS: u32 = 86_400;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// A holiday record as stored remotely.
///
/// `date` must be `YYYY-MM-DD`; anything else fails decoding rather than
/// silently comparing unequal. Store-internal fields are kept opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteHoliday {
    pub date: NaiveDate,
    pub name: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl RemoteHoliday {
    pub fn new(date: NaiveDate, name: impl Into<String>) -> Self {
        Self {
            date,
            name: name.into(),
            extra: BTreeMap::new(),
        }
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

/// `GET .../holidays?year=Y` response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct HolidayListResponse {
    pub results: Vec<RemoteHoliday>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HolidayType {
    /// Tied to the scheme's recurring policy.
    Fixed,
    /// A standalone dated entry; everything this tool imports.
    Floating,
}

/// Body of `POST .../holidays`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHoliday {
    pub date: NaiveDate,
    pub description: String,
    #[serde(rename = "durationSeconds")]
    pub duration_seconds: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: HolidayType,
}

impl NewHoliday {
    /// Full-day floating holiday.
    pub fn floating(date: NaiveDate, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            date,
            description: description.into(),
            duration_seconds: FULL_DAY_SECONDS,
            name: name.into(),
            kind: HolidayType::Floating,
        }
    }
}

/// What happened to a create call that reached the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    /// The store answered with a non-success status.
    Rejected { status: u16, message: String },
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Network or transport failure.
    Transport(String),
    /// The store answered a read with a non-success status.
    Api { code: Option<u16>, message: String },
    /// A response payload could not be decoded.
    Decode(String),
    /// Missing or invalid adapter configuration (token, scheme id, base url).
    Config(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Transport(msg) => write!(f, "transport error: {msg}"),
            StoreError::Api {
                code: Some(c),
                message,
            } => write!(f, "store api error code={c}: {message}"),
            StoreError::Api {
                code: None,
                message,
            } => write!(f, "store api error: {message}"),
            StoreError::Decode(msg) => write!(f, "decode error: {msg}"),
            StoreError::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

// ---------------------------------------------------------------------------
// Store trait
// ---------------------------------------------------------------------------

/// Remote holiday collection for one scheme.
///
/// Object-safe so callers can hold a `Box<dyn HolidayStore>`.
pub trait HolidayStore: Send + Sync {
    /// Human-readable adapter name (e.g. `"tempo"`).
    fn name(&self) -> &'static str;

    /// All records of `year`. One read per call.
    fn fetch_year(&self, year: i32) -> Result<Vec<RemoteHoliday>, StoreError>;

    /// Persist one record. `Err` only for transport-level failures; a store
    /// that answers but refuses yields `Ok(WriteOutcome::Rejected { .. })`.
    fn create(&self, holiday: &NewHoliday) -> Result<WriteOutcome, StoreError>;
}

impl<T: HolidayStore + ?Sized> HolidayStore for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn fetch_year(&self, year: i32) -> Result<Vec<RemoteHoliday>, StoreError> {
        (**self).fetch_year(year)
    }

    fn create(&self, holiday: &NewHoliday) -> Result<WriteOutcome, StoreError> {
        (**self).create(holiday)
    }
}

impl<T: HolidayStore + ?Sized> HolidayStore for &T {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn fetch_year(&self, year: i32) -> Result<Vec<RemoteHoliday>, StoreError> {
        (**self).fetch_year(year)
    }

    fn create(&self, holiday: &NewHoliday) -> Result<WriteOutcome, StoreError> {
        (**self).create(holiday)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
