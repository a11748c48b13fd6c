use std::fmt;

use chrono::NaiveDate;
use hsync_calendar::{CalendarError, Holiday};
use hsync_store::StoreError;
use serde::{Deserialize, Serialize};

/// Provenance text written into every record this tool creates.
pub const DEFAULT_DESCRIPTION: &str = "Autoimported with holiday-sync";

/// Knobs that do not change what gets compared, only what gets written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconcileSettings {
    /// `description` field of created records.
    pub description: String,
    /// Classify only; never call the store's create.
    pub dry_run: bool,
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            description: DEFAULT_DESCRIPTION.to_string(),
            dry_run: false,
        }
    }
}

/// Pure classification of one year. Both lists are date-ascending.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct YearPlan {
    pub year: i32,
    /// Local holidays whose date is already stored remotely.
    pub existing: Vec<Holiday>,
    /// Local holidays to create.
    pub missing: Vec<Holiday>,
}

/// A create the store answered with a non-success status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedHoliday {
    pub date: NaiveDate,
    pub name: String,
    pub status: u16,
    pub message: String,
}

/// Outcome of one reconcile run.
///
/// Order: ascending year blocks, ascending date within a block.
/// Every local holiday of the window lands in exactly one of the three lists.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    pub added: Vec<Holiday>,
    pub existing: Vec<Holiday>,
    pub failed: Vec<FailedHoliday>,
    /// `true` when `added` lists what would have been created.
    pub dry_run: bool,
}

impl ReconciliationResult {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    /// No write was refused.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.added.len() + self.existing.len() + self.failed.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    /// `year_count` must be at least 1 and the window must fit in `i32`.
    InvalidYearCount(u32),
    /// Local holiday source refused the country.
    Calendar(CalendarError),
    /// The store adapter could not be constructed.
    Setup(StoreError),
    /// Reading `year` failed; later years were not touched.
    Read { year: i32, source: StoreError },
    /// Creating the holiday on `date` failed at transport level.
    Write { date: NaiveDate, source: StoreError },
}

impl fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileError::InvalidYearCount(n) => {
                write!(f, "invalid year count {n}: must be a positive number of years")
            }
            ReconcileError::Calendar(e) => write!(f, "holiday source: {e}"),
            ReconcileError::Setup(e) => write!(f, "store setup: {e}"),
            ReconcileError::Read { year, source } => {
                write!(f, "reading remote holidays for {year}: {source}")
            }
            ReconcileError::Write { date, source } => {
                write!(f, "creating remote holiday {date}: {source}")
            }
        }
    }
}

impl std::error::Error for ReconcileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReconcileError::InvalidYearCount(_) => None,
            ReconcileError::Calendar(e) => Some(e),
            ReconcileError::Setup(e) => Some(e),
            ReconcileError::Read { source, .. } => Some(source),
            ReconcileError::Write { source, .. } => Some(source),
        }
    }
}

impl From<CalendarError> for ReconcileError {
    fn from(e: CalendarError) -> Self {
        ReconcileError::Calendar(e)
    }
}
