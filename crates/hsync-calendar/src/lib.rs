//! hsync-calendar
//!
//! Local holiday source: which public holidays a country observes in a given year.
//!
//! Deterministic. No IO, no wall-clock.
//!
//! The reconciler only sees the [`HolidaySource`] trait. [`NationalCalendar`]
//! serves the public holidays published by the `holidays` crate;
//! [`StaticHolidaySource`] serves an explicit table (tests, one-off imports).

mod national;

pub use national::NationalCalendar;

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Holiday
// ---------------------------------------------------------------------------

/// One dated public holiday.
///
/// Ordering is (date, name) so sorted output is date-ascending.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
}

impl Holiday {
    pub fn new(date: NaiveDate, name: impl Into<String>) -> Self {
        Self {
            date,
            name: name.into(),
        }
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

impl fmt::Display for Holiday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.date, self.name)
    }
}

/// Collapse holidays sharing a date into one entry, names joined by `"; "`.
///
/// Input must be sorted. Keeps the one-holiday-per-date contract of
/// [`HolidaySource`] when two observances coincide (e.g. Whit Monday on a
/// fixed national day).
pub fn merge_same_day(sorted: Vec<Holiday>) -> Vec<Holiday> {
    let mut out: Vec<Holiday> = Vec::with_capacity(sorted.len());
    for h in sorted {
        match out.last_mut() {
            Some(prev) if prev.date == h.date => {
                prev.name.push_str("; ");
                prev.name.push_str(&h.name);
            }
            _ => out.push(h),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Country
// ---------------------------------------------------------------------------

/// ISO 3166-1 alpha-2 country code, stored lowercase.
///
/// Parsing checks the shape only; whether a calendar exists for the country
/// is up to the [`HolidaySource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Country([u8; 2]);

impl Country {
    /// Accepts two ASCII letters, case-insensitive, surrounding whitespace ignored.
    pub fn parse(s: &str) -> Result<Self, CalendarError> {
        let t = s.trim();
        match t.as_bytes() {
            [a, b] if a.is_ascii_alphabetic() && b.is_ascii_alphabetic() => {
                Ok(Country([a.to_ascii_lowercase(), b.to_ascii_lowercase()]))
            }
            _ => Err(CalendarError::UnsupportedCountry(t.to_string())),
        }
    }

    pub fn code(&self) -> &str {
        // Only ever built from two ASCII letters.
        std::str::from_utf8(&self.0).unwrap_or("??")
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// Not a country code, or no calendar is known for it.
    UnsupportedCountry(String),
}

impl fmt::Display for CalendarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarError::UnsupportedCountry(code) => write!(
                f,
                "unsupported country '{}'. expected an ISO 3166-1 alpha-2 code with a national calendar",
                code
            ),
        }
    }
}

impl std::error::Error for CalendarError {}

// ---------------------------------------------------------------------------
// Source trait
// ---------------------------------------------------------------------------

/// Where the reconciler gets the holidays it wants to exist remotely.
///
/// Implementations return the holidays of `year` only, sorted by date, at most
/// one per date.
pub trait HolidaySource: Send + Sync {
    fn holidays(&self, country: Country, year: i32) -> Result<Vec<Holiday>, CalendarError>;
}

impl<T: HolidaySource + ?Sized> HolidaySource for Box<T> {
    fn holidays(&self, country: Country, year: i32) -> Result<Vec<Holiday>, CalendarError> {
        (**self).holidays(country, year)
    }
}

// ---------------------------------------------------------------------------
// Static table source
// ---------------------------------------------------------------------------

/// Holiday source backed by an explicit table.
///
/// A country with no rows is unsupported, matching how a real source rejects
/// countries it has no calendar for.
#[derive(Clone, Debug, Default)]
pub struct StaticHolidaySource {
    table: BTreeMap<Country, Vec<Holiday>>,
}

impl StaticHolidaySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, country: Country, date: NaiveDate, name: impl Into<String>) -> Self {
        self.insert(country, Holiday::new(date, name));
        self
    }

    pub fn insert(&mut self, country: Country, holiday: Holiday) {
        self.table.entry(country).or_default().push(holiday);
    }
}

impl HolidaySource for StaticHolidaySource {
    fn holidays(&self, country: Country, year: i32) -> Result<Vec<Holiday>, CalendarError> {
        let rows = self
            .table
            .get(&country)
            .ok_or_else(|| CalendarError::UnsupportedCountry(country.to_string()))?;

        let mut out: Vec<Holiday> = rows.iter().filter(|h| h.year() == year).cloned().collect();
        out.sort();
        Ok(merge_same_day(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn dk() -> Country {
        Country::parse("dk").unwrap()
    }

    #[test]
    fn country_parse() {
        assert_eq!(Country::parse(" DK ").unwrap(), dk());
        assert_eq!(Country::parse("Us").unwrap().code(), "us");
        assert!(Country::parse("dnk").is_err());
        assert!(Country::parse("d1").is_err());
        assert!(Country::parse("").is_err());
    }

    #[test]
    fn malformed_country_message_names_the_input() {
        let err = Country::parse("denmark").unwrap_err();
        assert!(err.to_string().starts_with("unsupported country 'denmark'"));
    }

    #[test]
    fn holiday_orders_by_date_first() {
        let a = Holiday::new(d(2024, 12, 25), "A");
        let b = Holiday::new(d(2024, 1, 1), "Z");
        let mut v = vec![a.clone(), b.clone()];
        v.sort();
        assert_eq!(v, vec![b, a]);
    }

    #[test]
    fn holiday_display() {
        let h = Holiday::new(d(2024, 1, 1), "New Year");
        assert_eq!(h.to_string(), "2024-01-01: New Year");
    }

    #[test]
    fn static_source_filters_by_year_and_sorts() {
        let src = StaticHolidaySource::new()
            .with(dk(), d(2024, 12, 25), "Christmas")
            .with(dk(), d(2025, 1, 1), "New Year")
            .with(dk(), d(2024, 1, 1), "New Year");

        let got = src.holidays(dk(), 2024).unwrap();
        assert_eq!(
            got,
            vec![
                Holiday::new(d(2024, 1, 1), "New Year"),
                Holiday::new(d(2024, 12, 25), "Christmas"),
            ]
        );
    }

    #[test]
    fn static_source_rejects_unknown_country() {
        let src = StaticHolidaySource::new().with(dk(), d(2024, 1, 1), "New Year");
        assert_eq!(
            src.holidays(Country::parse("se").unwrap(), 2024),
            Err(CalendarError::UnsupportedCountry("se".to_string()))
        );
    }
}
