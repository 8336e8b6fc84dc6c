mod config;
mod consts;
mod convert;
mod model;
mod prelude;
mod range;
mod session;
#[cfg(test)]
mod test_utils;
mod types;
mod validate;

pub use config::{ConfigError, WidgetConfig};
pub use consts::*;
pub use convert::{ConversionError, convert_to, to_gregorian, to_jalali};
pub use model::SegmentedDateModel;
pub use range::{DateRange, RangeError, is_within_range};
pub use session::{Caret, Effect, InputEvent, InputSession, NavKey, SessionState};
pub use types::{ErrorKey, ErrorTag, Field, ValidationErrorSet};
pub use validate::{check_date, days_in_month, is_leap_year, is_valid_date, matches_month_pattern};

use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::ops::RangeInclusive;

/// The calendar a widget instance types and displays dates in.
/// Selected once at construction and never changed for the life of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarSystem {
    /// Solar Hijri calendar
    #[default]
    #[display(fmt = "jalali")]
    #[serde(alias = "persian", alias = "fa")]
    Jalali,
    /// Proleptic Gregorian calendar
    #[display(fmt = "gregorian")]
    #[serde(alias = "en")]
    Gregorian,
}

impl CalendarSystem {
    /// Maps a stored language preference to the calendar it implies.
    /// `"fa"` selects Jalali; every other tag selects Gregorian.
    pub fn from_language(tag: &str) -> Self {
        if tag.trim().eq_ignore_ascii_case("fa") {
            Self::Jalali
        } else {
            Self::Gregorian
        }
    }

    /// Years a date in this system may carry and still be converted.
    pub const fn supported_years(self) -> RangeInclusive<u16> {
        match self {
            Self::Jalali => 1..=MAX_JALALI_YEAR,
            Self::Gregorian => 1..=MAX_YEAR,
        }
    }
}

/// A year/month/day triple tagged with its calendar system.
///
/// Construction performs no validation: in-progress input such as month `13`
/// or day `0` is representable and only rejected by [`is_valid_date`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "{year:04}/{month:02}/{day:02}")]
pub struct CalendarDate {
    pub system: CalendarSystem,
    pub year:   u16,
    pub month:  u8,
    pub day:    u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid {system} year: {year}")]
    InvalidYear { system: CalendarSystem, year: u16 },
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { month: u8, day: u8, year: u16 },
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

impl CalendarDate {
    pub const fn new(system: CalendarSystem, year: u16, month: u8, day: u8) -> Self {
        Self {
            system,
            year,
            month,
            day,
        }
    }

    pub const fn jalali(year: u16, month: u8, day: u8) -> Self {
        Self::new(CalendarSystem::Jalali, year, month, day)
    }

    pub const fn gregorian(year: u16, month: u8, day: u8) -> Self {
        Self::new(CalendarSystem::Gregorian, year, month, day)
    }

    /// Returns (year, month, day), the order dates compare in
    pub const fn to_columns(&self) -> (u16, u8, u8) {
        (self.year, self.month, self.day)
    }

    pub fn is_valid(&self) -> bool {
        is_valid_date(*self)
    }

    /// Parses the canonical `YYYY/MM/DD` form as a date in `system`.
    ///
    /// Unlike the segmented fields, this rejects dates that are not valid in
    /// `system`. Shorter components (`1400/1/5`) are accepted.
    ///
    /// # Errors
    /// Returns `ParseError` for malformed text or an invalid calendar date.
    pub fn parse(system: CalendarSystem, s: &str) -> Result<Self, ParseError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let parts: Vec<&str> = trimmed.split(DATE_SEPARATOR).map(str::trim).collect();
        let [year, month, day] = parts.as_slice() else {
            return Err(ParseError::InvalidFormat(format!(
                "Expected 2 {} separators, found {}",
                DATE_SEPARATOR,
                parts.len() - 1
            )));
        };

        let date = Self::new(
            system,
            parse_component(year)?,
            parse_component(month)?,
            parse_component(day)?,
        );
        check_date(date)
    }
}

/// Parses an all-ASCII-digit component
fn parse_component<T: std::str::FromStr>(s: &str) -> Result<T, ParseError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidFormat(s.to_owned()));
    }
    s.parse::<T>()
        .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
}

impl PartialOrd for CalendarDate {
    /// Dates from different calendar systems are unordered; convert first.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        (self.system == other.system).then(|| self.to_columns().cmp(&other.to_columns()))
    }
}
