//! National calendars from the `holidays` crate (python-holidays data).
//!
//! Lowercase ISO 3166-1 alpha-2 codes are mapped onto `holidays::Country`.
//! A code without a mapping is unsupported.

use chrono::{Datelike, NaiveDate};
use holidays::Country as Region;

use crate::{merge_same_day, CalendarError, Country, Holiday, HolidaySource};

/// Public holidays of a country as published by the `holidays` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct NationalCalendar;

impl NationalCalendar {
    pub fn new() -> Self {
        Self
    }

    pub fn supports(&self, country: Country) -> bool {
        region(country).is_some()
    }
}

impl HolidaySource for NationalCalendar {
    fn holidays(&self, country: Country, year: i32) -> Result<Vec<Holiday>, CalendarError> {
        let region =
            region(country).ok_or_else(|| CalendarError::UnsupportedCountry(country.to_string()))?;
        let Some(first) = NaiveDate::from_ymd_opt(year, 1, 1) else {
            return Ok(Vec::new());
        };

        let mut out: Vec<Holiday> = Vec::new();
        for day in first.iter_days().take_while(|d| d.year() == year) {
            if !holidays::is_holiday(region, day) {
                continue;
            }
            out.extend(
                holidays::get_holidays(region, day)
                    .skip_while(|h| h.date < day)
                    .take_while(|h| h.date == day)
                    .map(|h| Holiday::new(h.date, h.name.to_string())),
            );
        }
        out.sort();
        Ok(merge_same_day(out))
    }
}

fn region(country: Country) -> Option<Region> {
    let r = match country.code() {
        "ar" => Region::AR,
        "at" => Region::AT,
        "au" => Region::AU,
        "be" => Region::BE,
        "bg" => Region::BG,
        "br" => Region::BR,
        "ca" => Region::CA,
        "ch" => Region::CH,
        "cl" => Region::CL,
        "cz" => Region::CZ,
        "de" => Region::DE,
        "dk" => Region::DK,
        "ee" => Region::EE,
        "es" => Region::ES,
        "fi" => Region::FI,
        "fr" => Region::FR,
        "gb" => Region::GB,
        "gr" => Region::GR,
        "hr" => Region::HR,
        "hu" => Region::HU,
        "ie" => Region::IE,
        "in" => Region::IN,
        "is" => Region::IS,
        "it" => Region::IT,
        "jp" => Region::JP,
        "kr" => Region::KR,
        "lt" => Region::LT,
        "lu" => Region::LU,
        "lv" => Region::LV,
        "mx" => Region::MX,
        "nl" => Region::NL,
        "no" => Region::NO,
        "nz" => Region::NZ,
        "pl" => Region::PL,
        "pt" => Region::PT,
        "ro" => Region::RO,
        "se" => Region::SE,
        "si" => Region::SI,
        "sk" => Region::SK,
        "us" => Region::US,
        "za" => Region::ZA,
        _ => return None,
    };
    Some(r)
}
